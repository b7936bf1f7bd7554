use crate::{ProfileError, DEFAULT_HOST};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Base URL all task paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host(Url);

impl Host {
    pub fn parse(base_url: &str) -> Result<Self, ProfileError> {
        let invalid = |reason: String| ProfileError::InvalidHost {
            host: base_url.to_string(),
            reason,
        };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme `{other}`"))),
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query strings and fragments are not allowed".to_string()));
        }

        Ok(Self(url))
    }

    /// Append `path` to the host.
    ///
    /// Any path prefix on the host is kept: `http://h/app` joined with `/about` gives
    /// `http://h/app/about`.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.0.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The host without the trailing slash `Url` normalization adds.
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    pub(crate) fn default_host() -> Result<Self, ProfileError> {
        Self::parse(DEFAULT_HOST)
    }
}

impl FromStr for Host {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
