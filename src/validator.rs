use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use regex::Regex;

use crate::errors::WikiError;
use crate::types::AppState;

const PAGE_ROUTE: &str = r"^/(edit|save|view)/.*";
const VALID_PAGE_ROUTE: &str = r"^/(edit|save|view)/([a-zA-Z0-9]+)$";

/// Syntactic validation of page routes. Compiled once at startup.
pub struct PathValidator {
    page_route: Regex,
    valid_page_route: Regex,
}

impl PathValidator {
    pub fn new() -> Self {
        Self {
            page_route: Regex::new(PAGE_ROUTE).expect("page route pattern compiles"),
            valid_page_route: Regex::new(VALID_PAGE_ROUTE).expect("valid page route pattern compiles"),
        }
    }

    /// Pull the page id out of `/view/<id>`, `/edit/<id>` or `/save/<id>`.
    ///
    /// Ids are one or more ASCII alphanumerics. No I/O, no catalogue lookup.
    pub fn extract_id(&self, path: &str) -> Result<String, WikiError> {
        if let Some(id) = self.valid_page_route.captures(path).and_then(|caps| caps.get(2)) {
            return Ok(id.as_str().to_string());
        }

        match self.page_route.captures(path).and_then(|caps| caps.get(1)) {
            Some(verb) => Err(WikiError::Validation { verb: verb.as_str().to_string() }),
            None => {
                log::error!("Page id extraction called for unrouted path '{}'", path);
                Err(WikiError::UnroutablePath(path.to_string()))
            }
        }
    }
}

impl Default for PathValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Extractor yielding the validated page id of the current request.
#[derive(Debug, Clone)]
pub struct PageId(pub String);

#[async_trait]
impl FromRequestParts<AppState> for PageId {
    type Rejection = WikiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.validator.extract_id(parts.uri.path()).map(PageId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verb_of(result: Result<String, WikiError>) -> String {
        match result {
            Err(WikiError::Validation { verb }) => verb,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn extracts_alphanumeric_ids() {
        let validator = PathValidator::new();
        assert_eq!(validator.extract_id("/view/Hello123").unwrap(), "Hello123");
        assert_eq!(validator.extract_id("/edit/a").unwrap(), "a");
        assert_eq!(validator.extract_id("/save/ABCxyz09").unwrap(), "ABCxyz09");
    }

    #[test]
    fn rejects_bad_ids_naming_the_verb() {
        let validator = PathValidator::new();
        assert_eq!(verb_of(validator.extract_id("/view/bad path")), "view");
        assert_eq!(verb_of(validator.extract_id("/view/")), "view");
        assert_eq!(verb_of(validator.extract_id("/edit/nested/page")), "edit");
        assert_eq!(verb_of(validator.extract_id("/save/dash-ed")), "save");
        assert_eq!(verb_of(validator.extract_id("/view/%2E%2E")), "view");
    }

    #[test]
    fn validation_message_names_expected_shape() {
        let err = PathValidator::new().extract_id("/edit/").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please provide a valid url: /edit/<page> (page ids are alphanumeric)"
        );
    }

    #[test]
    fn unknown_prefix_is_unroutable_not_a_client_error() {
        let validator = PathValidator::new();
        assert!(matches!(validator.extract_id("/delete/x"), Err(WikiError::UnroutablePath(_))));
        assert!(matches!(validator.extract_id("/"), Err(WikiError::UnroutablePath(_))));
    }
}
