// Cached OAuth token sets

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// A cached OAuth token set, matching the on-disk tokens file shape.
///
/// A token set is usable only while its `error` field is absent or blank;
/// one carrying a non-blank error is never attached to a client and never
/// written back to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Error reported by the authorization server, if any.
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Creation time, stored as unix seconds.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// True when the `error` field is absent or contains only whitespace.
    pub fn is_usable(&self) -> bool {
        match &self.error {
            None => true,
            Some(error) => error.trim().is_empty(),
        }
    }

    /// Read a token set from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|error| LoadError::from_io(path, error))?;

        serde_json::from_str(&contents).map_err(|error| LoadError::invalid(path, error))
    }

    /// Serialize back to the tokens file so later calls can skip
    /// re-authorization.
    pub fn persist(&self, path: &Path) -> Result<(), LoadError> {
        let json =
            serde_json::to_string(self).map_err(|error| LoadError::invalid(path, error))?;

        fs::write(path, json).map_err(|error| LoadError::from_io(path, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> TokenSet {
        TokenSet {
            access_token: Some("ya29.sample-access".to_string()),
            refresh_token: Some("1//sample-refresh".to_string()),
            error: None,
            scope: Some("https://www.googleapis.com/auth/drive".to_string()),
            token_type: Some("Bearer".to_string()),
            created: Some(Utc.timestamp_opt(1_650_000_000, 0).unwrap()),
        }
    }

    #[test]
    fn test_usable_without_error() {
        assert!(sample().is_usable());
    }

    #[test]
    fn test_usable_with_blank_error() {
        let mut tokens = sample();
        tokens.error = Some(String::new());
        assert!(tokens.is_usable());

        tokens.error = Some("   ".to_string());
        assert!(tokens.is_usable());
    }

    #[test]
    fn test_unusable_with_error() {
        let mut tokens = sample();
        tokens.error = Some("invalid_grant".to_string());
        assert!(!tokens.is_usable());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let tokens = sample();
        tokens.persist(&path).unwrap();

        let reloaded = TokenSet::from_file(&path).unwrap();
        assert_eq!(reloaded, tokens);
    }

    #[test]
    fn test_created_serialized_as_unix_seconds() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["created"], serde_json::json!(1_650_000_000));
        assert_eq!(json["access_token"], serde_json::json!("ya29.sample-access"));
        assert_eq!(json["token_type"], serde_json::json!("Bearer"));
    }

    #[test]
    fn test_partial_file_deserializes() {
        let tokens: TokenSet =
            serde_json::from_str(r#"{"access_token": "only-this"}"#).unwrap();

        assert_eq!(tokens.access_token.as_deref(), Some("only-this"));
        assert_eq!(tokens.refresh_token, None);
        assert_eq!(tokens.created, None);
        assert!(tokens.is_usable());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TokenSet::from_file(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "not json at all").unwrap();

        let result = TokenSet::from_file(&path);
        assert!(matches!(result, Err(LoadError::InvalidStructure { .. })));
    }
}
