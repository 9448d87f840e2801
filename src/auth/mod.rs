//! OAuth authentication and token management.
//!
//! This module handles:
//! - Credential storage in a mode-0600 JSON file
//! - The authorization-code and refresh-token flows
//! - Token staleness checks and transparent refresh

mod oauth;
mod storage;

pub use oauth::{OAuthClient, OAuthConfig, LAUNCHPAD_URL, STALE_MARGIN_SECS};
pub use storage::{Credential, TokenStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "Basecamp OAuth credentials not found.\n\
         Please set BASECAMP_CLIENT_ID and BASECAMP_CLIENT_SECRET environment variables.\n\
         \n\
         To get these credentials:\n\
         1. Go to https://launchpad.37signals.com/integrations\n\
         2. Register a new integration\n\
         3. Set the redirect URI to: http://localhost\n\
         4. Copy the Client ID and Client Secret"
    )]
    MissingCredentials,
    #[error("no authorization code entered")]
    MissingCode,
    #[error("no refresh token available")]
    MissingRefreshToken,
    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("no authentication token available")]
    NoToken,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to persist credential: {0}")]
    Storage(#[from] std::io::Error),
    #[error("prompt error: {0}")]
    Prompt(std::io::Error),
}
