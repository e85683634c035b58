// Mode dispatch and the credential resolution strategies
//
// Each strategy is a self-contained attempt that yields a client or
// nothing; failure never aborts the chain. The dispatcher runs the
// strategy set for the requested mode, and the final fallback adds at most
// one interactive or redirect attempt on top.

use std::env;
use std::path::Path;

use url::Url;

use crate::client::{self, ClientInitializer};
use crate::credentials::{Credential, APPLICATION_CREDENTIALS_VAR};
use crate::mode::Mode;
use crate::session;
use crate::tokens::TokenSet;

/// Fixed fallback tokens file checked in the working directory when no
/// explicit tokens path resolves.
const LOCAL_TOKENS_FILE: &str = "token.json";

/// Resolves credentials for a named application.
///
/// Carries the identity and prompting default so call sites do not have to
/// repeat them; each method delegates to the free function of the same
/// name. The identity is fixed once an authorization call begins.
#[derive(Debug, Clone)]
pub struct Authorizer {
    name: String,
    scopes: Vec<String>,
    prompt_user: bool,
}

impl Authorizer {
    pub fn new<I, S>(name: impl Into<String>, scopes: I, prompt_user: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            prompt_user,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested scopes, in insertion order.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn prompt_user(&self) -> bool {
        self.prompt_user
    }

    /// Resolve a client for the stored identity. See [`authorize`].
    pub fn authorize(
        &self,
        mode: Mode,
        credentials_path: Option<&Path>,
        service_account_path: Option<&Path>,
        tokens_path: Option<&Path>,
        redirect_url: Option<&Url>,
    ) -> Option<ClientInitializer> {
        authorize(
            mode,
            credentials_path,
            service_account_path,
            tokens_path,
            &self.name,
            &self.scopes,
            redirect_url,
            self.prompt_user,
        )
    }

    /// See [`authorize_oauth`].
    pub fn authorize_oauth(
        &self,
        credentials_path: Option<&Path>,
        redirect_url: Option<&Url>,
    ) -> Option<ClientInitializer> {
        authorize_oauth(credentials_path, &self.name, &self.scopes, redirect_url)
    }

    /// See [`authorize_service_account`].
    pub fn authorize_service_account(
        &self,
        service_account_path: Option<&Path>,
    ) -> Option<ClientInitializer> {
        authorize_service_account(service_account_path, &self.name, &self.scopes)
    }

    /// See [`authorize_token`].
    pub fn authorize_token(
        &self,
        credentials_path: Option<&Path>,
        tokens_path: Option<&Path>,
    ) -> Option<ClientInitializer> {
        authorize_token(credentials_path, tokens_path, &self.name, &self.scopes)
    }

    /// See [`request_authorization`].
    pub fn request_authorization(
        &self,
        credentials_path: Option<&Path>,
        tokens_path: Option<&Path>,
    ) -> Option<ClientInitializer> {
        request_authorization(credentials_path, tokens_path, &self.name, &self.scopes)
    }
}

/// Resolve credentials for the named application.
///
/// Runs the strategy set for `mode`, then the final fallback: when still
/// unresolved and `prompt_user` is set, one extra interactive attempt at a
/// terminal, or one redirect attempt otherwise. Every failure along the
/// way is logged and swallowed; `None` is the single failure signal.
#[allow(clippy::too_many_arguments)]
pub fn authorize(
    mode: Mode,
    credentials_path: Option<&Path>,
    service_account_path: Option<&Path>,
    tokens_path: Option<&Path>,
    name: &str,
    scopes: &[String],
    redirect_url: Option<&Url>,
    prompt_user: bool,
) -> Option<ClientInitializer> {
    let client = authorize_by_mode(
        mode,
        credentials_path,
        service_account_path,
        tokens_path,
        name,
        scopes,
        redirect_url,
        prompt_user,
    );

    final_fallback(
        client,
        credentials_path,
        tokens_path,
        name,
        scopes,
        redirect_url,
        prompt_user,
    )
}

/// Headless redirect authorization.
///
/// The concrete redirect exchange belongs to the embedding application; at
/// this layer the attempt always yields nothing.
pub fn authorize_oauth(
    _credentials_path: Option<&Path>,
    _name: &str,
    _scopes: &[String],
    _redirect_url: Option<&Url>,
) -> Option<ClientInitializer> {
    None
}

/// Authorize with a service account.
///
/// Loads the key from `service_account_path` when it names an existing
/// file, otherwise from the file named by `GOOGLE_APPLICATION_CREDENTIALS`
/// when that variable is set. Service accounts are self-contained, so no
/// credentials file is involved. Load failures are logged and swallowed.
pub fn authorize_service_account(
    service_account_path: Option<&Path>,
    name: &str,
    scopes: &[String],
) -> Option<ClientInitializer> {
    let mut credential = None;

    let explicit = service_account_path
        .filter(|path| !path.as_os_str().is_empty())
        .filter(|path| path.exists());

    if let Some(path) = explicit {
        match Credential::from_file(path) {
            Ok(loaded) => credential = Some(loaded),
            Err(error) => {
                tracing::error!(
                    "Failed to load service account from {}: {}",
                    path.display(),
                    error
                );
            }
        }
    } else if env::var_os(APPLICATION_CREDENTIALS_VAR).is_some() {
        match Credential::application_default() {
            Ok(loaded) => credential = Some(loaded),
            Err(error) => {
                tracing::error!("Failed to load application default credentials: {}", error);
            }
        }
    }

    match credential {
        None => {
            tracing::warn!("Service account credentials not set");
            None
        }
        Some(credential) => {
            let scoped = credential.with_scopes(scopes.iter().cloned());
            Some(ClientInitializer::with_credentials(name, scoped))
        }
    }
}

/// Authorize from a cached token file.
///
/// Reads the explicit tokens file, falling back to `token.json` in the
/// working directory, then builds a client from the credentials file
/// (which is required for this strategy) and attaches the token set,
/// writing it back through to the tokens path.
pub fn authorize_token(
    credentials_path: Option<&Path>,
    tokens_path: Option<&Path>,
    name: &str,
    scopes: &[String],
) -> Option<ClientInitializer> {
    let access_token = authorize_token_file(tokens_path).or_else(authorize_token_local)?;

    let client = client::build_client(credentials_path, name, scopes, true)?;

    client::attach_token(client, access_token, tokens_path)
}

/// Prompt the user for authorization at the terminal.
///
/// Outside an interactive session this warns and yields nothing. Inside
/// one it builds the client from the required credentials file; the
/// consent-code exchange on top of it (display the URL, read the code,
/// trade it for a token set and persist it) is owned by the embedding
/// application, see [`session::prompt_for_authorization_code`].
pub fn request_authorization(
    credentials_path: Option<&Path>,
    _tokens_path: Option<&Path>,
    name: &str,
    scopes: &[String],
) -> Option<ClientInitializer> {
    if !session::is_interactive() {
        tracing::warn!("Requesting user authorization only works at the command line");
        return None;
    }

    client::build_client(credentials_path, name, scopes, true)
}

#[allow(clippy::too_many_arguments)]
fn authorize_by_mode(
    mode: Mode,
    credentials_path: Option<&Path>,
    service_account_path: Option<&Path>,
    tokens_path: Option<&Path>,
    name: &str,
    scopes: &[String],
    redirect_url: Option<&Url>,
    prompt_user: bool,
) -> Option<ClientInitializer> {
    match mode {
        Mode::Discover => {
            let client = authorize_token(credentials_path, tokens_path, name, scopes)
                .or_else(|| authorize_service_account(service_account_path, name, scopes));

            match client {
                Some(client) => Some(client),
                None if prompt_user => {
                    request_authorization(credentials_path, tokens_path, name, scopes)
                }
                // Leave the rest to the final fallback.
                None => None,
            }
        }
        Mode::OAuth => authorize_oauth(credentials_path, name, scopes, redirect_url),
        Mode::Request => request_authorization(credentials_path, tokens_path, name, scopes),
        Mode::ServiceAccount => authorize_service_account(service_account_path, name, scopes),
        Mode::Token => authorize_token(credentials_path, tokens_path, name, scopes),
        Mode::None => None,
    }
}

/// Last resort after mode dispatch: at most one extra attempt, and only
/// when still unresolved with prompting allowed. Interactive sessions get
/// the terminal request, everything else the redirect path.
fn final_fallback(
    client: Option<ClientInitializer>,
    credentials_path: Option<&Path>,
    tokens_path: Option<&Path>,
    name: &str,
    scopes: &[String],
    redirect_url: Option<&Url>,
    prompt_user: bool,
) -> Option<ClientInitializer> {
    if client.is_some() || !prompt_user {
        return client;
    }

    if session::is_interactive() {
        request_authorization(credentials_path, tokens_path, name, scopes)
    } else {
        authorize_oauth(credentials_path, name, scopes, redirect_url)
    }
}

/// Last chance attempt against the fixed file name in the working
/// directory.
fn authorize_token_local() -> Option<TokenSet> {
    authorize_token_file(Some(Path::new(LOCAL_TOKENS_FILE)))
}

fn authorize_token_file(tokens_path: Option<&Path>) -> Option<TokenSet> {
    let path = tokens_path.filter(|path| !path.as_os_str().is_empty());

    match path {
        Some(path) if path.exists() => match TokenSet::from_file(path) {
            Ok(tokens) => Some(tokens),
            Err(error) => {
                tracing::error!("Failed to read token file {}: {}", path.display(), error);
                None
            }
        },
        _ => {
            tracing::warn!(
                "Token file doesn't exist - {}",
                path.map(|p| p.display().to_string()).unwrap_or_default()
            );
            None
        }
    }
}
