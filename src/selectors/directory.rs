//! Remote signature directory client.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::{ResolverError, SelectorResolver};

const DEFAULT_ENDPOINT: &str = "https://www.4byte.directory/api/v1/signatures/";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Errors loading a resolver configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read resolver config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid configuration JSON
    #[error("Failed to parse resolver config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for [`SignatureDirectory`]. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Directory endpoint, queried with `?hex_signature=0x<selector>`
    pub endpoint: String,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent sent with each request
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("evmlens/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ResolverConfig {
    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn query_url(&self, selector: [u8; 4]) -> String {
        format!("{}?hex_signature=0x{}", self.endpoint, hex::encode(selector))
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryRecord {
    text_signature: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    results: Vec<DirectoryRecord>,
}

/// Blocking client for a 4byte-style signature directory.
pub struct SignatureDirectory {
    agent: ureq::Agent,
    config: ResolverConfig,
}

impl SignatureDirectory {
    /// Create a client; every request is bounded by `config.timeout_ms`.
    pub fn new(config: ResolverConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build();
        Self { agent, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl SelectorResolver for SignatureDirectory {
    fn lookup(&self, selector: [u8; 4]) -> Result<Vec<String>, ResolverError> {
        let url = self.config.query_url(selector);
        log::debug!("Querying signature directory: {}", url);

        let response = self.agent.get(&url).call().map_err(|error| match error {
            ureq::Error::Status(status, _) => ResolverError::Status(status),
            ureq::Error::Transport(transport) => ResolverError::Transport(transport.to_string()),
        })?;

        signatures_from(response.into_reader())
    }
}

/// Text signatures listed in a directory response body, in directory order.
fn signatures_from(reader: impl Read) -> Result<Vec<String>, ResolverError> {
    let body: DirectoryResponse = serde_json::from_reader(reader)?;
    Ok(body.results.into_iter().map(|r| r.text_signature).collect())
}

impl std::fmt::Debug for SignatureDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureDirectory")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.user_agent.starts_with("evmlens/"));
    }

    #[test]
    fn test_query_url() {
        let config = ResolverConfig::default();
        assert_eq!(
            config.query_url([0xa9, 0x05, 0x9c, 0xbb]),
            "https://www.4byte.directory/api/v1/signatures/?hex_signature=0xa9059cbb"
        );
    }

    #[test]
    fn test_config_from_file_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"endpoint": "http://localhost:8080/sigs", "timeout_ms": 250}}"#).unwrap();

        let config = ResolverConfig::from_file(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/sigs");
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.user_agent, ResolverConfig::default().user_agent);
    }

    #[test]
    fn test_config_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(ResolverConfig::from_file(file.path()), Err(ConfigError::Parse(_))));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(ResolverConfig::from_file(missing), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 1, "text_signature": "transfer(address,uint256)", "hex_signature": "0xa9059cbb"},
                {"id": 2, "text_signature": "many_msg_babbage(bytes1)", "hex_signature": "0xa9059cbb"}
            ]
        }"#;
        let sigs = signatures_from(body.as_bytes()).unwrap();
        assert_eq!(sigs, vec!["transfer(address,uint256)", "many_msg_babbage(bytes1)"]);

        assert!(signatures_from(&br#"{"count": 0}"#[..]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_response_is_a_body_error() {
        for body in ["<html>rate limited</html>", r#"{"results": [{"id": 1}]}"#, ""] {
            assert!(
                matches!(signatures_from(body.as_bytes()), Err(ResolverError::Body(_))),
                "{:?} should not decode",
                body
            );
        }
    }

    #[test]
    fn test_unreachable_directory_is_a_transport_error() {
        let directory = SignatureDirectory::new(ResolverConfig {
            endpoint: "http://127.0.0.1:1/".to_string(),
            timeout_ms: 200,
            ..ResolverConfig::default()
        });
        assert!(matches!(
            directory.lookup([0, 0, 0, 1]),
            Err(ResolverError::Transport(_))
        ));
    }
}
