//! Authenticated HTTP client with cursor pagination.
//!
//! Collections are fetched page by page, following the `Link: ...;
//! rel="next"` continuation header with a short pause between requests to
//! stay inside the provider's rate limit (roughly 50 requests per 10
//! seconds).

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE, LINK, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use super::models::*;
use super::ApiError;
use crate::auth::{AuthError, Credential, LAUNCHPAD_URL};

const BASE_URL: &str = "https://3.basecampapi.com";
const USER_AGENT_STR: &str = concat!("bc4-cli/", env!("CARGO_PKG_VERSION"));

/// Pause between paginated requests.
const PAGE_DELAY: Duration = Duration::from_millis(200);

/// Client for the Basecamp resource API.
///
/// All calls are strictly sequential; the client never issues concurrent
/// requests.
pub struct ApiClient {
    credential: Option<Credential>,
    http: reqwest::Client,
    base_url: String,
    launchpad_url: String,
}

impl ApiClient {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential,
            http: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            launchpad_url: LAUNCHPAD_URL.to_string(),
        }
    }

    /// Point the client at a different API host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Point the identity lookup at a different host. Used by tests.
    pub fn with_launchpad_url(mut self, launchpad_url: impl Into<String>) -> Self {
        self.launchpad_url = launchpad_url.into();
        self
    }

    /// Build an authenticated request. The token check happens here, not at
    /// construction, so an unauthenticated client only fails when used.
    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, AuthError> {
        let credential = self.credential.as_ref().ok_or(AuthError::NoToken)?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(&credential.access_token)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_STR)))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    /// Fetch one resource.
    pub async fn get_resource<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        trace!(url, "GET");
        let response = self.request(Method::GET, url)?.send().await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// Create one resource from a JSON body.
    pub async fn create_resource<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        trace!(url, "POST");
        let response = self.request(Method::POST, url)?.json(body).send().await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    /// Fetch a collection, following `rel="next"` continuations when
    /// `page_all` is set.
    ///
    /// Stops on the first empty page regardless of `page_all`; records are
    /// returned in encounter order.
    pub async fn get_collection<T: DeserializeOwned>(
        &self,
        url: &str,
        page_all: bool,
    ) -> Result<Vec<T>, ApiError> {
        let mut records = Vec::new();
        let mut page = 1u32;
        let separator = if url.contains('?') { '&' } else { '?' };

        loop {
            let page_url = format!("{url}{separator}page={page}");
            trace!(url = %page_url, "GET");
            let response = self.request(Method::GET, &page_url)?.send().await?;
            let response = Self::check_status(response).await?;

            let has_next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .is_some_and(has_next_link);

            let page_records: Vec<T> = response.json().await?;
            if page_records.is_empty() {
                break;
            }
            records.extend(page_records);

            if !page_all || !has_next {
                break;
            }
            page += 1;
            tokio::time::sleep(PAGE_DELAY).await;
        }

        debug!(url, pages = page, records = records.len(), "collection fetched");
        Ok(records)
    }

    /// User identity plus the accounts it can reach.
    pub async fn get_identity(&self) -> Result<Authorization, ApiError> {
        self.get_resource(&format!("{}/authorization.json", self.launchpad_url))
            .await
    }

    pub async fn get_projects(
        &self,
        account_id: &str,
        page_all: bool,
    ) -> Result<Vec<Project>, ApiError> {
        self.get_collection(
            &format!("{}/{account_id}/projects.json", self.base_url),
            page_all,
        )
        .await
    }

    pub async fn get_project(
        &self,
        account_id: &str,
        project_id: &str,
    ) -> Result<Project, ApiError> {
        self.get_resource(&format!(
            "{}/{account_id}/projects/{project_id}.json",
            self.base_url
        ))
        .await
    }

    /// Find a tool's id on the project dock. Performed fresh on every call;
    /// dock contents can change between invocations.
    async fn dock_tool_id(
        &self,
        account_id: &str,
        project_id: &str,
        tool: &'static str,
    ) -> Result<i64, ApiError> {
        let project = self.get_project(account_id, project_id).await?;
        project
            .dock
            .iter()
            .find(|entry| entry.name == tool)
            .map(|entry| entry.id)
            .ok_or(ApiError::ToolNotEnabled { tool })
    }

    pub async fn get_todoset_id(
        &self,
        account_id: &str,
        project_id: &str,
    ) -> Result<i64, ApiError> {
        self.dock_tool_id(account_id, project_id, "todoset").await
    }

    pub async fn get_message_board_id(
        &self,
        account_id: &str,
        project_id: &str,
    ) -> Result<i64, ApiError> {
        self.dock_tool_id(account_id, project_id, "message_board")
            .await
    }

    pub async fn get_campfire_id(
        &self,
        account_id: &str,
        project_id: &str,
    ) -> Result<i64, ApiError> {
        self.dock_tool_id(account_id, project_id, "chat").await
    }

    pub async fn get_todolists(
        &self,
        account_id: &str,
        project_id: &str,
        todoset_id: i64,
    ) -> Result<Vec<TodoList>, ApiError> {
        self.get_collection(
            &format!(
                "{}/{account_id}/buckets/{project_id}/todosets/{todoset_id}/todolists.json",
                self.base_url
            ),
            true,
        )
        .await
    }

    pub async fn create_todolist(
        &self,
        account_id: &str,
        project_id: &str,
        todoset_id: i64,
        name: &str,
        description: &str,
    ) -> Result<TodoList, ApiError> {
        let body = NewTodoList {
            name: name.to_string(),
            description: wrap_rich_text(description),
        };
        self.create_resource(
            &format!(
                "{}/{account_id}/buckets/{project_id}/todosets/{todoset_id}/todolists.json",
                self.base_url
            ),
            &body,
        )
        .await
    }

    pub async fn get_todos(
        &self,
        account_id: &str,
        project_id: &str,
        todolist_id: i64,
    ) -> Result<Vec<Todo>, ApiError> {
        self.get_collection(
            &format!(
                "{}/{account_id}/buckets/{project_id}/todolists/{todolist_id}/todos.json",
                self.base_url
            ),
            true,
        )
        .await
    }

    pub async fn create_todo(
        &self,
        account_id: &str,
        project_id: &str,
        todolist_id: i64,
        content: &str,
        description: &str,
    ) -> Result<Todo, ApiError> {
        let body = NewTodo {
            content: content.to_string(),
            description: description.to_string(),
        };
        self.create_resource(
            &format!(
                "{}/{account_id}/buckets/{project_id}/todolists/{todolist_id}/todos.json",
                self.base_url
            ),
            &body,
        )
        .await
    }

    /// Post to the project's message board, resolving the board id first.
    pub async fn post_message(
        &self,
        account_id: &str,
        project_id: &str,
        subject: &str,
        content: &str,
    ) -> Result<Message, ApiError> {
        let board_id = self.get_message_board_id(account_id, project_id).await?;
        let body = NewMessage {
            subject: subject.to_string(),
            content: wrap_rich_text(content),
        };
        self.create_resource(
            &format!(
                "{}/{account_id}/buckets/{project_id}/message_boards/{board_id}/messages.json",
                self.base_url
            ),
            &body,
        )
        .await
    }

    /// Post a chat line to the project's campfire, resolving its id first.
    pub async fn post_campfire_line(
        &self,
        account_id: &str,
        project_id: &str,
        content: &str,
    ) -> Result<CampfireLine, ApiError> {
        let campfire_id = self.get_campfire_id(account_id, project_id).await?;
        let body = NewCampfireLine {
            content: content.to_string(),
        };
        self.create_resource(
            &format!(
                "{}/{account_id}/buckets/{project_id}/chats/{campfire_id}/lines.json",
                self.base_url
            ),
            &body,
        )
        .await
    }
}

/// The API expects rich-text fields as HTML.
fn wrap_rich_text(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<div>{text}</div>")
    }
}

/// Check a `Link` header for a `rel="next"` relation.
/// Example: `<https://3.basecampapi.com/1/projects.json?page=2>; rel="next"`
fn has_next_link(header: &str) -> bool {
    header
        .split(',')
        .any(|link| link.contains(r#"rel="next""#))
}
