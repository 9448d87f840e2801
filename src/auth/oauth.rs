//! OAuth2 token lifecycle against the Launchpad authorization server.
//!
//! Owns the authorization-code and refresh-token exchanges and decides when
//! a stored token is stale. Callers go through [`OAuthClient::valid_token`]
//! to get a token that is valid right now.

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::storage::{Credential, TokenStore};
use super::AuthError;
use crate::prompt::Prompter;

/// Default authorization server.
pub const LAUNCHPAD_URL: &str = "https://launchpad.37signals.com";

/// Refresh this many seconds before actual expiry, to absorb clock skew and
/// in-flight request latency.
pub const STALE_MARGIN_SECS: i64 = 300;

/// OAuth client identity, normally taken from the environment.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Authorization server base URL. Overridable for tests.
    pub base_url: String,
}

impl OAuthConfig {
    /// Build the config from `BASECAMP_CLIENT_ID`, `BASECAMP_CLIENT_SECRET`
    /// and `BASECAMP_REDIRECT_URI`.
    pub fn from_env() -> Result<Self, AuthError> {
        let client_id = std::env::var("BASECAMP_CLIENT_ID").ok();
        let client_secret = std::env::var("BASECAMP_CLIENT_SECRET").ok();
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Ok(Self {
                    client_id,
                    client_secret,
                    redirect_uri: std::env::var("BASECAMP_REDIRECT_URI")
                        .unwrap_or_else(|_| "http://localhost".to_string()),
                    base_url: LAUNCHPAD_URL.to_string(),
                })
            }
            _ => Err(AuthError::MissingCredentials),
        }
    }
}

/// Token response from the authorization server.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    7200
}

/// OAuth2 authentication manager.
pub struct OAuthClient {
    config: OAuthConfig,
    store: TokenStore,
    http: reqwest::Client,
}

impl OAuthClient {
    /// Create a new auth client over the given store.
    pub fn new(config: OAuthConfig, store: TokenStore) -> Self {
        Self {
            config,
            store,
            http: reqwest::Client::new(),
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// The browser-facing authorization URL.
    pub fn authorize_url(&self) -> String {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/authorization/new", self.config.base_url),
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("type", "web_server"),
            ],
        )
        .expect("static authorization URL is valid");
        url.to_string()
    }

    /// Get a token valid right now, refreshing a stale one when possible.
    ///
    /// Returns `None` when there is no stored credential, or when the stored
    /// one is stale and cannot be refreshed — the caller should fall back to
    /// an interactive login.
    pub async fn valid_token(&self) -> Option<Credential> {
        let cred = self.store.load()?;
        if !cred.expires_within(STALE_MARGIN_SECS) {
            return Some(cred);
        }
        debug!(remaining = cred.remaining(), "access token stale");
        match self.refresh(&cred).await {
            Ok(refreshed) => Some(refreshed),
            Err(e) => {
                // Degrades to "not authenticated" on purpose; the cause is
                // only visible here.
                warn!(error = %e, "token refresh failed, re-authentication required");
                None
            }
        }
    }

    /// Complete the interactive authorization-code flow.
    ///
    /// The caller has already shown the authorization URL to the user; this
    /// reads the pasted code (or full redirect URL) via the prompter,
    /// exchanges it, and persists the resulting credential.
    pub async fn login(&self, prompter: &dyn Prompter) -> Result<Credential, AuthError> {
        let input = prompter
            .read_line("Paste the authorization code or the entire redirect URL")
            .map_err(AuthError::Prompt)?;
        let code = extract_code(&input).ok_or(AuthError::MissingCode)?;

        info!("exchanging authorization code for access token");
        let response = self
            .exchange(&[
                ("type", "web_server"),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("code", &code),
                ("redirect_uri", &self.config.redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .await?;

        let cred = Credential {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            obtained_at: Utc::now().timestamp(),
            expires_in: response.expires_in,
        };
        self.store.save(&cred)?;
        Ok(cred)
    }

    /// Exchange the refresh token for a new access token and persist it.
    ///
    /// A response omitting `refresh_token` carries the prior one forward;
    /// the provider may omit an unchanged refresh token.
    pub async fn refresh(&self, credential: &Credential) -> Result<Credential, AuthError> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or(AuthError::MissingRefreshToken)?;

        let response = self
            .exchange(&[
                ("type", "refresh"),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .await?;

        let cred = Credential {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .or_else(|| credential.refresh_token.clone()),
            obtained_at: Utc::now().timestamp(),
            expires_in: response.expires_in,
        };
        self.store.save(&cred)?;
        debug!("access token refreshed");
        Ok(cred)
    }

    async fn exchange(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(format!("{}/authorization/token", self.config.base_url))
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint { status, body });
        }
        Ok(response.json().await?)
    }
}

/// Pull the authorization code out of user input, which may be the bare code
/// or the full redirect URL.
fn extract_code(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Some((_, query)) = input.split_once('?') {
        return query
            .split('&')
            .find_map(|pair| pair.strip_prefix("code="))
            .filter(|code| !code.is_empty())
            .map(str::to_string);
    }
    Some(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> OAuthConfig {
        OAuthConfig {
            client_id: "client-id".into(),
            client_secret: "client-secret".into(),
            redirect_uri: "http://localhost".into(),
            base_url,
        }
    }

    fn client(base_url: String) -> (TempDir, OAuthClient) {
        let tmp = TempDir::new().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        (tmp, OAuthClient::new(config(base_url), store))
    }

    fn credential(obtained_at: i64) -> Credential {
        Credential {
            access_token: "old-access".into(),
            refresh_token: Some("old-refresh".into()),
            obtained_at,
            expires_in: 7200,
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env() {
        std::env::set_var("BASECAMP_CLIENT_ID", "env-id");
        std::env::set_var("BASECAMP_CLIENT_SECRET", "env-secret");
        std::env::remove_var("BASECAMP_REDIRECT_URI");
        let config = OAuthConfig::from_env().unwrap();
        std::env::remove_var("BASECAMP_CLIENT_ID");
        std::env::remove_var("BASECAMP_CLIENT_SECRET");
        assert_eq!(config.client_id, "env-id");
        assert_eq!(config.client_secret, "env-secret");
        assert_eq!(config.redirect_uri, "http://localhost");
        assert_eq!(config.base_url, LAUNCHPAD_URL);
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env_requires_client_identity() {
        std::env::remove_var("BASECAMP_CLIENT_ID");
        std::env::remove_var("BASECAMP_CLIENT_SECRET");
        assert!(matches!(
            OAuthConfig::from_env(),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_extract_code_from_redirect_url() {
        assert_eq!(
            extract_code("http://localhost?code=ABC123&state=xyz").as_deref(),
            Some("ABC123")
        );
        assert_eq!(
            extract_code("http://localhost?state=xyz&code=ABC123").as_deref(),
            Some("ABC123")
        );
    }

    #[test]
    fn test_extract_code_from_bare_code() {
        assert_eq!(extract_code("  ABC123  ").as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_extract_code_rejects_missing_code() {
        assert_eq!(extract_code(""), None);
        assert_eq!(extract_code("   "), None);
        assert_eq!(extract_code("http://localhost?state=xyz"), None);
        assert_eq!(extract_code("http://localhost?code=&state=xyz"), None);
    }

    #[test]
    fn test_authorize_url() {
        let (_tmp, client) = client("https://launchpad.example".into());
        let url = client.authorize_url();
        assert!(url.starts_with("https://launchpad.example/authorization/new?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("type=web_server"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost"));
    }

    #[tokio::test]
    async fn test_valid_token_returns_fresh_credential_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let (_tmp, client) = client(server.uri());
        let fresh = credential(Utc::now().timestamp());
        client.store().save(&fresh).unwrap();

        assert_eq!(client.valid_token().await, Some(fresh));
    }

    #[tokio::test]
    async fn test_valid_token_refreshes_stale_credential_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authorization/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=old-refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access",
                "refresh_token": "new-refresh",
                "expires_in": 7200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (_tmp, client) = client(server.uri());
        // 200 seconds remaining: inside the 5-minute margin
        let before = Utc::now().timestamp();
        client.store().save(&credential(before - 7000)).unwrap();

        let cred = client.valid_token().await.unwrap();
        assert_eq!(cred.access_token, "new-access");
        assert_eq!(cred.refresh_token.as_deref(), Some("new-refresh"));
        assert!(cred.obtained_at >= before);

        // The refreshed credential was persisted
        assert_eq!(client.store().load().unwrap(), cred);
    }

    #[tokio::test]
    async fn test_refresh_carries_forward_omitted_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authorization/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-access",
                "expires_in": 7200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (_tmp, client) = client(server.uri());
        let cred = client
            .refresh(&credential(Utc::now().timestamp() - 7000))
            .await
            .unwrap();
        assert_eq!(cred.refresh_token.as_deref(), Some("old-refresh"));
        assert_eq!(
            client.store().load().unwrap().refresh_token.as_deref(),
            Some("old-refresh")
        );
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_fails() {
        let (_tmp, client) = client("http://127.0.0.1:9".into());
        let cred = Credential {
            refresh_token: None,
            ..credential(0)
        };
        assert!(matches!(
            client.refresh(&cred).await,
            Err(AuthError::MissingRefreshToken)
        ));
    }

    #[tokio::test]
    async fn test_valid_token_degrades_to_none_on_failed_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("revoked"))
            .expect(1)
            .mount(&server)
            .await;

        let (_tmp, client) = client(server.uri());
        client.store().save(&credential(0)).unwrap();
        assert_eq!(client.valid_token().await, None);
    }

    #[tokio::test]
    async fn test_valid_token_none_without_stored_credential() {
        let (_tmp, client) = client("http://127.0.0.1:9".into());
        assert_eq!(client.valid_token().await, None);
    }

    #[tokio::test]
    async fn test_login_exchanges_extracted_code_and_persists() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authorization/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=ABC123"))
            .and(body_string_contains("type=web_server"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-access",
                "refresh_token": "fresh-refresh",
                "expires_in": 1209600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (_tmp, client) = client(server.uri());
        let prompter = ScriptedPrompter::new(["http://localhost?code=ABC123&state=xyz"]);
        let cred = client.login(&prompter).await.unwrap();
        assert_eq!(cred.access_token, "fresh-access");
        assert_eq!(cred.expires_in, 1209600);
        assert_eq!(client.store().load().unwrap(), cred);
    }

    #[tokio::test]
    async fn test_login_rejects_empty_code() {
        let (_tmp, client) = client("http://127.0.0.1:9".into());
        let prompter = ScriptedPrompter::new([""]);
        assert!(matches!(
            client.login(&prompter).await,
            Err(AuthError::MissingCode)
        ));
    }

    #[tokio::test]
    async fn test_login_surfaces_token_endpoint_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid code"))
            .mount(&server)
            .await;

        let (_tmp, client) = client(server.uri());
        let prompter = ScriptedPrompter::new(["ABC123"]);
        match client.login(&prompter).await {
            Err(AuthError::TokenEndpoint { status, body }) => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(body, "invalid code");
            }
            other => panic!("expected TokenEndpoint error, got {other:?}"),
        }
    }
}
