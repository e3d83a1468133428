use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;
use url::Url;
use crate::error::{Result, VarExplorerError};

/// Default request timeout for annotation services.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// An HTTP client that only allows requests to approved annotation hosts.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let domains = [
            "api.genohub.org",   // FAVOR
            "favor.genohub.org", // FAVOR (legacy host)
            "gtexportal.org",    // GTEx v2 API
            "localhost",
            "127.0.0.1",
        ];
        let allowlist = domains.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("varexplorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Allows the host of `base_url`, e.g. a self-hosted mirror from config.
    pub fn allow_url_host(&mut self, base_url: &str) -> Result<()> {
        let parsed = Url::parse(base_url)
            .map_err(|e| VarExplorerError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        match parsed.host_str() {
            Some(host) => {
                self.allow_domain(host);
                Ok(())
            }
            None => Err(VarExplorerError::Config(format!("Base URL has no host: {}", base_url))),
        }
    }

    /// Validates if a URL is permitted under the current allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed domain
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// GET request builder for an allowlisted URL.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder> {
        if !self.is_allowed(url) {
            warn!(url, "Blocked request to host outside the allowlist");
            return Err(VarExplorerError::Security(format!(
                "Domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://api.genohub.org/v1/rsids/rs429358"));
        assert!(client.is_allowed("https://gtexportal.org/api/v2/dataset/variant"));
        assert!(!client.is_allowed("https://example.com/"));
        assert!(!client.is_allowed("not a url"));
    }

    #[test]
    fn test_subdomain_allowed() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://www.gtexportal.org/api/v2"));
    }

    #[test]
    fn test_blocked_get_is_security_error() {
        let client = SandboxClient::new().unwrap();
        let err = client.get("https://evil.test/steal").unwrap_err();
        assert!(matches!(err, VarExplorerError::Security(_)));
    }

    #[test]
    fn test_allow_url_host() {
        let mut client = SandboxClient::new().unwrap();
        client.allow_url_host("https://favor.mirror.internal/v1").unwrap();
        assert!(client.is_allowed("https://favor.mirror.internal/v1/rsids/rs7412"));
        assert!(client.allow_url_host("::not-a-url").is_err());
    }
}
