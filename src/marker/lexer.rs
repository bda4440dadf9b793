//! Marker tokenizer.

use anyhow::{bail, Result};

/// A token plus the 1-based column it started at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare identifier (marker variable, or the keywords handled below).
    Ident(String),
    /// Single- or double-quoted string literal, quotes stripped.
    Literal(String),
    LParen,
    RParen,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Compatible,
    Arbitrary,
    And,
    Or,
    In,
    Not,
}

/// Tokenize a marker expression, tracking columns for error reports.
pub fn lex(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let column = i + 1;
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                tokens.push(Token { kind: TokenKind::LParen, column });
                i += 1;
            }
            ')' => {
                tokens.push(Token { kind: TokenKind::RParen, column });
                i += 1;
            }
            '\'' | '"' => {
                let quote = c;
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end] != quote {
                    end += 1;
                }
                if end == chars.len() {
                    bail!("column {}: unterminated string literal", column);
                }
                let literal: String = chars[start..end].iter().collect();
                tokens.push(Token {
                    kind: TokenKind::Literal(literal),
                    column,
                });
                i = end + 1;
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Le, column });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Lt, column });
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Ge, column });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Gt, column });
                    i += 1;
                }
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') && chars.get(i + 2) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Arbitrary, column });
                    i += 3;
                } else if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Eq, column });
                    i += 2;
                } else {
                    bail!("column {}: expected '==' or '===', found lone '='", column);
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Ne, column });
                    i += 2;
                } else {
                    bail!("column {}: expected '!=', found lone '!'", column);
                }
            }
            '~' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Compatible, column });
                    i += 2;
                } else {
                    bail!("column {}: expected '~=', found lone '~'", column);
                }
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let kind = match word.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "in" => TokenKind::In,
                    "not" => TokenKind::Not,
                    _ => TokenKind::Ident(word),
                };
                tokens.push(Token { kind, column });
            }
            _ => bail!("column {}: unexpected character '{}'", column, c),
        }
    }

    Ok(tokens)
}
