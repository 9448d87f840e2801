//! Typed records for the Basecamp resource API.
//!
//! Payloads are decoded into these records at the HTTP boundary so schema
//! drift surfaces there rather than deep in command logic. Unknown fields
//! are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response of the Launchpad identity endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Authorization {
    pub identity: Identity,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub product: String,
    pub href: Option<String>,
}

impl Account {
    /// Launchpad lists every 37signals product; only Basecamp accounts
    /// are usable here.
    pub fn is_basecamp(&self) -> bool {
        matches!(self.product.as_str(), "bc3" | "bc4")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dock: Vec<DockEntry>,
}

/// One enabled-integration entry on a project's dock.
#[derive(Debug, Clone, Deserialize)]
pub struct DockEntry {
    pub id: i64,
    pub name: String,
    pub title: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TodoList {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: i64,
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CampfireLine {
    pub id: i64,
    #[serde(default)]
    pub content: String,
}

/// Creation payloads.
#[derive(Debug, Serialize)]
pub struct NewTodoList {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct NewTodo {
    pub content: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct NewMessage {
    pub subject: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NewCampfireLine {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_product_filter() {
        let mut account = Account {
            id: 1,
            name: "Acme".into(),
            product: "bc4".into(),
            href: None,
        };
        assert!(account.is_basecamp());
        account.product = "bc3".into();
        assert!(account.is_basecamp());
        account.product = "campfire".into();
        assert!(!account.is_basecamp());
    }

    #[test]
    fn test_project_decodes_with_dock() {
        let project: Project = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "Launch",
                "description": null,
                "created_at": "2026-01-05T10:00:00.000Z",
                "status": "active",
                "dock": [
                    {"id": 7, "name": "todoset", "title": "To-dos", "enabled": true},
                    {"id": 8, "name": "chat", "title": "Campfire", "enabled": false}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(project.id, 42);
        assert_eq!(project.dock.len(), 2);
        assert_eq!(project.dock[0].name, "todoset");
        assert!(!project.dock[1].enabled);
    }

    #[test]
    fn test_project_dock_defaults_empty() {
        let project: Project =
            serde_json::from_str(r#"{"id": 1, "name": "Bare"}"#).unwrap();
        assert!(project.dock.is_empty());
        assert!(project.created_at.is_none());
    }
}
