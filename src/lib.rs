//! Credential resolution for Google API clients.
//!
//! Resolves, in priority order, the credentials needed to call an API on
//! behalf of a named application: a cached token file, a service account
//! file (or the `GOOGLE_APPLICATION_CREDENTIALS` environment variable),
//! and interactive consent at the terminal as a last resort. The result is
//! a [`ClientInitializer`] carrying the application name and the scoped
//! credentials acting as transport initializer; `None` is the uniform
//! failure signal for every strategy and for the whole resolution.
//!
//! ```no_run
//! use google_api_authorizer::{authorize, Mode};
//! use std::path::Path;
//!
//! let scopes = vec!["https://www.googleapis.com/auth/drive".to_string()];
//!
//! let client = authorize(
//!     Mode::Discover,
//!     Some(Path::new("credentials.json")),
//!     Some(Path::new("service-account.json")),
//!     Some(Path::new("tokens.json")),
//!     "Drive File Uploader",
//!     &scopes,
//!     None,
//!     true,
//! );
//! ```
//!
//! Resolution is synchronous with blocking file I/O and takes no locks:
//! two callers racing to resolve the same token file will both read it and
//! the last writer wins. This is a known limitation, kept deliberately so
//! the observable behavior stays simple.

pub mod authorizer;
pub mod client;
pub mod credentials;
pub mod error;
pub mod mode;
pub mod session;
pub mod tokens;

pub use authorizer::{
    authorize, authorize_oauth, authorize_service_account, authorize_token,
    request_authorization, Authorizer,
};
pub use client::ClientInitializer;
pub use credentials::{ClientSecret, Credential, ScopedCredential, ServiceAccountKey};
pub use error::LoadError;
pub use mode::Mode;
pub use tokens::TokenSet;
