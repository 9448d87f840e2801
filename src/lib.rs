//! bc4 library
//!
//! Core pieces of the Basecamp command-line client: OAuth token lifecycle,
//! the paginated API client, settings, and the command implementations.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod prompt;
