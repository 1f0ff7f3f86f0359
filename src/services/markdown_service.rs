use pulldown_cmark::{html, Options, Parser};

/// Service for turning stored markdown into HTML that is safe to embed.
///
/// Rendering is two stages: a CommonMark transform, then sanitization
/// against a user-generated-content policy. Both stages always run.
pub struct MarkdownService {
    options: Options,
    sanitizer: ammonia::Builder<'static>,
}

impl MarkdownService {
    /// Create a new markdown service
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        Self {
            options,
            sanitizer: ammonia::Builder::default(),
        }
    }

    /// Render raw markdown bytes to sanitized HTML. Never fails; invalid
    /// UTF-8 is replaced and malformed markdown degrades to literal text.
    pub fn render(&self, raw: &[u8]) -> String {
        let source = String::from_utf8_lossy(raw);
        let mut unsafe_html = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut unsafe_html, Parser::new_ext(&source, self.options));
        self.sanitizer.clean(&unsafe_html).to_string()
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_survives() {
        let html = MarkdownService::new().render(b"# Title\n\nSome **bold** and `code`.\n\n- one\n- two\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<code>code</code>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn script_tags_are_stripped() {
        let html = MarkdownService::new().render(b"before\n\n<script>alert(1)</script>\n\nafter");
        assert!(!html.to_lowercase().contains("<script"));
        assert!(html.contains("before"));
        assert!(html.contains("after"));
    }

    #[test]
    fn inline_handlers_and_javascript_links_are_removed() {
        let service = MarkdownService::new();
        let html = service.render(b"<img src=\"x.png\" onerror=\"alert(1)\">\n\n[click](javascript:alert(1))");
        assert!(!html.contains("onerror"));
        assert!(!html.contains("javascript:"));

        let html = service.render(b"<style>body { display: none }</style>text");
        assert!(!html.contains("<style"));
    }

    #[test]
    fn tables_render() {
        let html = MarkdownService::new().render(b"| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn garbage_input_degrades_without_panicking() {
        let service = MarkdownService::new();
        let html = service.render(b"**unclosed [link( ```\n<div");
        assert!(html.contains("unclosed"));
        let html = service.render(&[0xff, 0xfe, b'o', b'k']);
        assert!(html.contains("ok"));
        assert_eq!(service.render(b""), "");
    }
}
