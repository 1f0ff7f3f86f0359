pub mod markdown_service;
pub mod page_store;

pub use markdown_service::MarkdownService;
pub use page_store::PageStore;
