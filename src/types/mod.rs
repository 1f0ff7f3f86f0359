use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::Credentials;
use crate::components::TemplateComponent;
use crate::config::Config;
use crate::errors::StoreError;
use crate::services::{MarkdownService, PageStore};
use crate::validator::PathValidator;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PageStore>,
    pub markdown: Arc<MarkdownService>,
    pub validator: Arc<PathValidator>,
    pub templates: Arc<TemplateComponent>,
    pub credentials: Arc<Credentials>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    /// Build every shared component once, at startup.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store = PageStore::open(config.pages_dir.clone(), config.meta_file.clone())?;
        Ok(Self {
            store: Arc::new(store),
            markdown: Arc::new(MarkdownService::new()),
            validator: Arc::new(PathValidator::new()),
            templates: Arc::new(TemplateComponent::load(&config.static_dir)),
            credentials: Arc::new(Credentials::new(&config.username, &config.password)),
            static_dir: Arc::new(config.static_dir.clone()),
        })
    }
}

/// A wiki page. Catalogue stubs carry no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub display_title: String,
    pub page_path: PathBuf,
    pub body: Option<Vec<u8>>,
}

impl Page {
    /// Catalogue entry without its body
    pub fn stub(id: &str, page_path: PathBuf, display_title: &str) -> Self {
        Self {
            id: id.to_string(),
            display_title: display_title.to_string(),
            page_path,
            body: None,
        }
    }

    /// Empty page used to pre-fill the edit form for an id with no content yet
    pub fn blank(id: &str) -> Self {
        Self::stub(id, PathBuf::new(), "")
    }

    /// Label shown to readers; falls back to the id when no title was given.
    pub fn title(&self) -> &str {
        if self.display_title.trim().is_empty() {
            &self.id
        } else {
            &self.display_title
        }
    }

    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Catalogue records in insertion order
pub type Catalogue = Vec<Page>;
