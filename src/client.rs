// Client construction shared by the strategies

use std::path::Path;

use crate::credentials::{Credential, ScopedCredential};
use crate::tokens::TokenSet;

/// The resolved output of an authorization attempt: the application name
/// plus the authenticated transport initializer. Callers hand this to
/// their service client and own its lifetime; this crate never inspects it
/// again after construction.
#[derive(Debug, Clone)]
pub struct ClientInitializer {
    application_name: String,
    credentials: Option<ScopedCredential>,
    access_token: Option<TokenSet>,
}

impl ClientInitializer {
    fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            credentials: None,
            access_token: None,
        }
    }

    pub(crate) fn with_credentials(
        application_name: impl Into<String>,
        credentials: ScopedCredential,
    ) -> Self {
        let mut client = Self::new(application_name);
        client.credentials = Some(credentials);
        client
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// The scoped credential acting as the transport initializer, when the
    /// resolving strategy loaded one.
    pub fn credentials(&self) -> Option<&ScopedCredential> {
        self.credentials.as_ref()
    }

    /// The cached token set attached by the token file strategy.
    pub fn access_token(&self) -> Option<&TokenSet> {
        self.access_token.as_ref()
    }
}

/// Build a client shell for the named application.
///
/// When `credentials_required`, an empty or missing credentials path fails
/// the attempt outright, and a load failure is logged and swallowed; the
/// result is unresolved either way.
pub(crate) fn build_client(
    credentials_path: Option<&Path>,
    name: &str,
    scopes: &[String],
    credentials_required: bool,
) -> Option<ClientInitializer> {
    let path = credentials_path.filter(|p| !p.as_os_str().is_empty());
    let exists = path.is_some_and(|p| p.exists());

    if credentials_required && !exists {
        tracing::warn!("Credentials not found");
        return None;
    }

    let mut client = ClientInitializer::new(name);

    if credentials_required {
        let path = path?;

        match Credential::from_file(path) {
            Ok(credential) => {
                client.credentials = Some(credential.with_scopes(scopes.iter().cloned()));
            }
            Err(error) => {
                tracing::error!(
                    "Failed to load credentials from {}: {}",
                    path.display(),
                    error
                );
                return None;
            }
        }
    }

    Some(client)
}

/// Attach a token set to a built client, writing the tokens back to the
/// tokens file so the next call can skip re-authorization.
///
/// A token set carrying a non-blank `error` is treated as absent: nothing
/// is attached and nothing is written.
pub(crate) fn attach_token(
    mut client: ClientInitializer,
    tokens: TokenSet,
    tokens_path: Option<&Path>,
) -> Option<ClientInitializer> {
    if !tokens.is_usable() {
        tracing::warn!("Error key exists in tokens");
        return None;
    }

    if let Some(path) = tokens_path.filter(|p| !p.as_os_str().is_empty()) {
        if let Err(error) = tokens.persist(path) {
            tracing::error!("Failed to persist tokens to {}: {}", path.display(), error);
            return None;
        }
    }

    client.access_token = Some(tokens);
    Some(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const INSTALLED_CLIENT_JSON: &str = r#"{
        "installed": {
            "client_id": "1234.apps.googleusercontent.com",
            "client_secret": "shhh"
        }
    }"#;

    fn scopes() -> Vec<String> {
        vec!["https://www.googleapis.com/auth/drive".to_string()]
    }

    #[test]
    fn test_required_credentials_missing_path() {
        assert!(build_client(None, "Uploader", &scopes(), true).is_none());
        assert!(build_client(Some(Path::new("")), "Uploader", &scopes(), true).is_none());
    }

    #[test]
    fn test_required_credentials_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(build_client(Some(&path), "Uploader", &scopes(), true).is_none());
    }

    #[test]
    fn test_required_credentials_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{").unwrap();

        assert!(build_client(Some(&path), "Uploader", &scopes(), true).is_none());
    }

    #[test]
    fn test_shell_without_required_credentials() {
        let client = build_client(None, "Uploader", &scopes(), false).unwrap();
        assert_eq!(client.application_name(), "Uploader");
        assert!(client.credentials().is_none());
        assert!(client.access_token().is_none());
    }

    #[test]
    fn test_build_with_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, INSTALLED_CLIENT_JSON).unwrap();

        let client = build_client(Some(&path), "Uploader", &scopes(), true).unwrap();
        assert_eq!(client.application_name(), "Uploader");

        let credentials = client.credentials().unwrap();
        assert_eq!(credentials.scopes(), scopes().as_slice());
    }

    #[test]
    fn test_attach_rejects_token_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let tokens_path = dir.path().join("tokens.json");

        let client = build_client(None, "Uploader", &scopes(), false).unwrap();
        let tokens = TokenSet {
            access_token: Some("ya29.stale".to_string()),
            refresh_token: None,
            error: Some("invalid_grant".to_string()),
            scope: None,
            token_type: None,
            created: None,
        };

        assert!(attach_token(client, tokens, Some(&tokens_path)).is_none());
        // An unusable token set must never be persisted.
        assert!(!tokens_path.exists());
    }

    #[test]
    fn test_attach_persists_usable_token() {
        let dir = tempfile::tempdir().unwrap();
        let tokens_path = dir.path().join("tokens.json");

        let client = build_client(None, "Uploader", &scopes(), false).unwrap();
        let tokens = TokenSet {
            access_token: Some("ya29.fresh".to_string()),
            refresh_token: Some("1//refresh".to_string()),
            error: None,
            scope: None,
            token_type: Some("Bearer".to_string()),
            created: None,
        };

        let client = attach_token(client, tokens.clone(), Some(&tokens_path)).unwrap();
        assert_eq!(client.access_token(), Some(&tokens));

        let written = TokenSet::from_file(&tokens_path).unwrap();
        assert_eq!(written, tokens);
    }
}
