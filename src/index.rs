//! Package-index client for the `outdated` command.
//!
//! Talks to a PyPI-compatible JSON API: `GET {base}/{name}/json` returns
//! a document whose `info.version` field is the latest release.

use anyhow::{anyhow, bail, Context, Result};
use std::time::Duration;
use ureq::Agent;
use url::Url;

use crate::name::PackageName;
use crate::version::Version;

/// Default index endpoint.
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

pub struct IndexClient {
    agent: Agent,
    base: Url,
}

impl IndexClient {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid index URL '{}'", base))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("index URL must be http(s): {}", base);
        }
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(15))
            .build();
        Ok(IndexClient { agent, base })
    }

    /// Fetch the latest version of a package from the index.
    pub fn latest_version(&self, name: &PackageName) -> Result<Version> {
        let url = format!(
            "{}/{}/json",
            self.base.as_str().trim_end_matches('/'),
            name.canonical()
        );

        let response = match self.agent.get(&url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(404, _)) => {
                bail!("package '{}' not found on index", name)
            }
            Err(ureq::Error::Status(code, _)) => {
                bail!("index returned status {} for '{}'", code, name)
            }
            Err(e) => return Err(anyhow!(e)).context(format!("request to {} failed", url)),
        };

        let body = response
            .into_string()
            .with_context(|| format!("failed to read index response for '{}'", name))?;
        parse_latest(&body).with_context(|| format!("unexpected index response for '{}'", name))
    }
}

/// Extract `info.version` from an index JSON document. Split out so it
/// is testable from fixtures without network access.
pub fn parse_latest(body: &str) -> Result<Version> {
    let doc: serde_json::Value =
        serde_json::from_str(body).context("index response is not valid JSON")?;
    let version = doc
        .get("info")
        .and_then(|info| info.get("version"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("index response has no info.version field"))?;
    Version::parse(version)
}
