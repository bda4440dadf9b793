//! Recursive-descent parser for marker expressions.
//!
//! Grammar, loosest first:
//!   expr   := term ("or" term)*
//!   term   := factor ("and" factor)*
//!   factor := "(" expr ")" | atom
//!   atom   := operand op operand
//!   operand := variable | string-literal

use anyhow::{bail, Result};

use super::lexer::{Token, TokenKind};
use super::{Atom, CompareOp, Marker, Operand, Variable};

pub fn parse(tokens: &[Token]) -> Result<Marker> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if let Some(tok) = parser.peek() {
        bail!("column {}: unexpected trailing input", tok.column);
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn expr(&mut self) -> Result<Marker> {
        let mut lhs = self.term()?;
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Or)) {
            self.advance();
            let rhs = self.term()?;
            lhs = Marker::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Marker> {
        let mut lhs = self.factor()?;
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::And)) {
            self.advance();
            let rhs = self.factor()?;
            lhs = Marker::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Marker> {
        let open_column = match self.peek() {
            Some(t) if matches!(t.kind, TokenKind::LParen) => Some(t.column),
            _ => None,
        };
        if let Some(column) = open_column {
            self.advance();
            let inner = self.expr()?;
            match self.advance().map(|t| &t.kind) {
                Some(TokenKind::RParen) => Ok(inner),
                _ => bail!("column {}: unclosed parenthesis", column),
            }
        } else {
            Ok(Marker::Atom(self.atom()?))
        }
    }

    fn atom(&mut self) -> Result<Atom> {
        let lhs = self.operand()?;
        let op = self.compare_op()?;
        let rhs = self.operand()?;
        Ok(Atom { lhs, op, rhs })
    }

    fn operand(&mut self) -> Result<Operand> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Ident(name),
                column,
            }) => match Variable::from_name(name) {
                Some(var) => Ok(Operand::Variable(var)),
                None => bail!("column {}: unknown marker variable '{}'", column, name),
            },
            Some(Token {
                kind: TokenKind::Literal(s),
                ..
            }) => Ok(Operand::Literal(s.clone())),
            Some(tok) => bail!(
                "column {}: expected a marker variable or quoted string",
                tok.column
            ),
            None => bail!("unexpected end of marker expression"),
        }
    }

    fn compare_op(&mut self) -> Result<CompareOp> {
        match self.advance() {
            Some(Token { kind, column }) => match kind {
                TokenKind::Lt => Ok(CompareOp::Lt),
                TokenKind::Le => Ok(CompareOp::Le),
                TokenKind::Gt => Ok(CompareOp::Gt),
                TokenKind::Ge => Ok(CompareOp::Ge),
                TokenKind::Eq => Ok(CompareOp::Eq),
                TokenKind::Ne => Ok(CompareOp::Ne),
                TokenKind::Compatible => Ok(CompareOp::Compatible),
                TokenKind::Arbitrary => Ok(CompareOp::Arbitrary),
                TokenKind::In => Ok(CompareOp::In),
                TokenKind::Not => match self.advance().map(|t| &t.kind) {
                    Some(TokenKind::In) => Ok(CompareOp::NotIn),
                    _ => bail!("column {}: expected 'in' after 'not'", column),
                },
                _ => bail!("column {}: expected a comparison operator", column),
            },
            None => bail!("unexpected end of marker expression; expected an operator"),
        }
    }
}
