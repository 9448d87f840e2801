//! Shared command context: authentication, settings, prompting.

pub mod commands;

use anyhow::Result;
use tracing::info;

use crate::api::{Account, ApiClient, Project};
use crate::auth::{AuthError, Credential, OAuthClient, OAuthConfig, TokenStore};
use crate::config::{Paths, Settings};
use crate::prompt::{Prompter, StdinPrompter};

/// State threaded through every command: the auth client, local settings
/// and the prompt provider.
pub struct Context {
    oauth: OAuthClient,
    pub settings: Settings,
    prompter: Box<dyn Prompter>,
}

impl Context {
    pub fn new() -> Result<Self, AuthError> {
        let paths = Paths::new();
        let config = OAuthConfig::from_env()?;
        let store = TokenStore::new(paths.token_file());
        Ok(Self {
            oauth: OAuthClient::new(config, store),
            settings: Settings::load(paths.settings_file()),
            prompter: Box::new(StdinPrompter),
        })
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    /// Run the interactive authorization flow from scratch.
    pub async fn login(&self) -> Result<Credential, AuthError> {
        let url = self.oauth.authorize_url();
        println!("\n=== Basecamp OAuth2 Authorization ===");
        println!("Opening browser to authorize: {url}");
        if webbrowser::open(&url).is_err() {
            println!("Couldn't open a browser automatically; copy and paste the URL above.");
        }
        println!("\nAfter authorizing, you'll be redirected to a URL like:");
        println!("{}?code=AUTHORIZATION_CODE", self.oauth.redirect_uri());
        println!();

        let credential = self.oauth.login(self.prompter.as_ref()).await?;
        info!("authentication successful");
        println!("✓ Authentication successful!");
        Ok(credential)
    }

    /// Get an API client backed by a currently-valid token, falling back to
    /// interactive login when there is none.
    pub async fn ensure_auth(&self) -> Result<ApiClient> {
        let credential = match self.oauth.valid_token().await {
            Some(credential) => credential,
            None => {
                println!("No valid authentication found. Please log in.");
                self.login().await?
            }
        };
        Ok(ApiClient::new(Some(credential)))
    }

    /// Resolve the account to operate on: explicit flag, then the stored
    /// default, then an interactive pick.
    pub async fn resolve_account(
        &self,
        api: &ApiClient,
        flag: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(id) = flag {
            return Ok(Some(id.to_string()));
        }
        if let Some(id) = &self.settings.default_account_id {
            return Ok(Some(id.clone()));
        }
        self.select_account(api).await
    }

    /// Interactive account selection. Skips the prompt when only one
    /// Basecamp account exists.
    pub async fn select_account(&self, api: &ApiClient) -> Result<Option<String>> {
        let authorization = api.get_identity().await?;
        let accounts: Vec<&Account> = authorization
            .accounts
            .iter()
            .filter(|a| a.is_basecamp())
            .collect();

        match accounts.len() {
            0 => {
                println!("No Basecamp accounts found");
                Ok(None)
            }
            1 => Ok(Some(accounts[0].id.to_string())),
            _ => {
                let options: Vec<String> = accounts
                    .iter()
                    .map(|a| {
                        let default = if self.settings.default_account_id.as_deref()
                            == Some(a.id.to_string().as_str())
                        {
                            " (current default)"
                        } else {
                            ""
                        };
                        format!("{} (ID: {}){}", a.name, a.id, default)
                    })
                    .collect();
                let choice = self.prompter.choose_one("Select account", &options)?;
                Ok(Some(accounts[choice].id.to_string()))
            }
        }
    }

    /// Resolve the project to operate on: explicit flag, then the stored
    /// default, then an interactive pick.
    pub async fn resolve_project(
        &self,
        api: &ApiClient,
        account_id: &str,
        flag: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(id) = flag {
            return Ok(Some(id.to_string()));
        }
        if let Some(id) = &self.settings.default_project_id {
            return Ok(Some(id.clone()));
        }
        self.select_project(api, account_id).await
    }

    /// Interactive project selection over the full (paginated) project list.
    pub async fn select_project(
        &self,
        api: &ApiClient,
        account_id: &str,
    ) -> Result<Option<String>> {
        let projects = api.get_projects(account_id, true).await?;
        if projects.is_empty() {
            println!("No projects found");
            return Ok(None);
        }

        let options: Vec<String> = projects
            .iter()
            .map(|p| match &p.description {
                Some(desc) if !desc.is_empty() => format!("{}\n   {}", p.name, desc),
                _ => p.name.clone(),
            })
            .collect();
        let choice = self.prompter.choose_one("Select project", &options)?;
        Ok(Some(projects[choice].id.to_string()))
    }

    /// Match a project by case-insensitive name fragment, first page only.
    /// Ambiguous or missing matches are reported and yield `None`.
    pub async fn match_project_by_name(
        &self,
        api: &ApiClient,
        account_id: &str,
        name: &str,
    ) -> Result<Option<Project>> {
        let projects = api.get_projects(account_id, false).await?;
        let needle = name.to_lowercase();
        let mut matches: Vec<Project> = projects
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();

        match matches.len() {
            0 => {
                println!("No project found matching '{name}'");
                Ok(None)
            }
            1 => Ok(Some(matches.remove(0))),
            _ => {
                println!("Multiple projects match '{name}':");
                for p in &matches {
                    println!("  - {} (ID: {})", p.name, p.id);
                }
                Ok(None)
            }
        }
    }
}
