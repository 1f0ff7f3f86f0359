//! Quire - a small personal wiki.
//!
//! Pages are markdown files indexed by an append-only CSV catalogue, served
//! over HTTP behind Basic auth. Requests flow through the auth gate, the
//! page-route validator and a handler, which drives the page store and the
//! markdown renderer.

pub mod auth;
pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod router;
pub mod services;
pub mod types;
pub mod utils;
pub mod validator;

// Re-export commonly used items
pub use auth::Credentials;
pub use config::{Config, ConfigError};
pub use errors::{StoreError, WikiError};
pub use logger::Logger;
pub use router::build_router;
pub use services::{MarkdownService, PageStore};
pub use types::{AppState, Catalogue, Page};
pub use validator::{PageId, PathValidator};
