//! Config validation for `reqmark config --validate`.

use crate::config::Config;
use crate::marker::Variable;
use crate::version::Version;

/// A problem found in the merged configuration. None of these stop a
/// command from running; `config --validate` reports them all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check the merged config for keys and values that cannot work.
pub fn validate(config: &Config) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if Version::parse(&config.python_version).is_err() {
        issues.push(ConfigIssue {
            field: "python_version".to_string(),
            message: format!("'{}' is not a valid version", config.python_version),
        });
    }

    match url::Url::parse(&config.index_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => issues.push(ConfigIssue {
            field: "index_url".to_string(),
            message: format!("scheme '{}' is not http(s)", url.scheme()),
        }),
        Err(e) => issues.push(ConfigIssue {
            field: "index_url".to_string(),
            message: format!("'{}' is not a valid URL: {}", config.index_url, e),
        }),
    }

    for key in config.env.keys() {
        if Variable::from_name(key).is_none() {
            issues.push(ConfigIssue {
                field: "env".to_string(),
                message: format!("unknown marker variable '{}'", key),
            });
        }
    }

    for (profile, table) in &config.profiles {
        for key in table.keys() {
            if Variable::from_name(key).is_none() {
                issues.push(ConfigIssue {
                    field: format!("profiles.{}", profile),
                    message: format!("unknown marker variable '{}'", key),
                });
            }
        }
    }

    issues
}
