//! Basecamp resource API client.

mod client;
mod models;

pub use client::ApiClient;
pub use models::{
    Account, Authorization, CampfireLine, DockEntry, Identity, Message, NewCampfireLine,
    NewMessage, NewTodo, NewTodoList, Project, Todo, TodoList,
};

use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response from the resource API.
    #[error("API error: {body} (status: {status})")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The project's dock has no entry for the requested tool, i.e. the
    /// feature is not enabled on that project.
    #[error("no {tool} found for this project")]
    ToolNotEnabled { tool: &'static str },
}
