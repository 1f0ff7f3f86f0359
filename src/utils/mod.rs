use std::path::{Component, Path};

use rand::distributions::{Alphanumeric, DistString};
use time::OffsetDateTime;

use crate::errors::WikiError;

const PAGE_ID_LEN: usize = 32;

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Fresh candidate id for a new page. Always passes route validation.
pub fn generate_page_id() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), PAGE_ID_LEN)
}

/// Generate last modified metadata HTML
pub fn last_modified_html(path: &Path) -> String {
    let Ok(mtime) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return String::new();
    };
    let formatted = OffsetDateTime::from(mtime).format(&time::format_description::well_known::Rfc3339);
    match formatted {
        Ok(s) => format!("<p class=\"meta\">Last modified: {}</p>", escape_html(&s)),
        Err(_) => String::new(),
    }
}

/// Normalize request path
pub fn normalize_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Reject any path that could climb out of its base directory
pub fn ensure_safe_path(req_path: &str) -> Result<(), WikiError> {
    for comp in Path::new(req_path).components() {
        match comp {
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(WikiError::InvalidPath);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Determine content type for a file based on its extension
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase()) {
        Some(ref ext) if ext == "html" || ext == "htm" => "text/html; charset=utf-8",
        Some(ref ext) if ext == "css" => "text/css; charset=utf-8",
        Some(ref ext) if ext == "js" => "application/javascript; charset=utf-8",
        Some(ref ext) if ext == "json" => "application/json; charset=utf-8",
        Some(ref ext) if ext == "svg" => "image/svg+xml",
        Some(ref ext) if ext == "png" => "image/png",
        Some(ref ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ref ext) if ext == "gif" => "image/gif",
        Some(ref ext) if ext == "ico" => "image/x-icon",
        Some(ref ext) if ext == "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_alphanumeric_and_distinct() {
        let a = generate_page_id();
        let b = generate_page_id();
        assert_eq!(a.len(), PAGE_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn normalizes_and_guards_paths() {
        assert_eq!(normalize_path("/css//./site.css/"), "css/site.css");
        assert!(ensure_safe_path("css/site.css").is_ok());
        assert!(matches!(ensure_safe_path("../meta/meta.csv"), Err(WikiError::InvalidPath)));
        assert!(matches!(ensure_safe_path("css/../../x"), Err(WikiError::InvalidPath)));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for(Path::new("a/site.CSS")), "text/css; charset=utf-8");
        assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
    }
}
