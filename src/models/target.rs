use url::Url;

use crate::error::{CheckError, Result};

/// Plaintext HTTP endpoint requested through every proxy under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    url: String,
    host: String,
    port: u16,
    path_and_query: String,
}

impl ProbeTarget {
    /// Parse and validate a target URL. Only `http` is accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())?;

        if url.scheme() != "http" {
            return Err(CheckError::InvalidConfig(format!(
                "validation target must be plain http, got scheme '{}'",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| CheckError::InvalidConfig("validation target must include a host".into()))?;
        // SOCKS5 takes bare IPv6 literals
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host)
            .to_string();

        let port = url.port_or_known_default().unwrap_or(80);

        let mut path_and_query = url.path().to_string();
        if path_and_query.is_empty() {
            path_and_query.push('/');
        }
        if let Some(query) = url.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        Ok(Self {
            url: url.to_string(),
            host,
            port,
            path_and_query,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    /// Value for the `Host` header
    pub fn authority(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        if self.port == 80 {
            host
        } else {
            format!("{}:{}", host, self.port)
        }
    }
}
