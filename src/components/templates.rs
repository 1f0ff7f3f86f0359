use std::fs;
use std::path::Path;

use crate::types::Page;
use crate::utils::escape_html;

const STYLE_LINK: &str = "<link rel=\"stylesheet\" href=\"/static/css/quire.css\">";

const FALLBACK_SHELL: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"><title>{{TITLE}}</title>{{STYLE}}</head><body><nav class=\"navbar\"><a href=\"/\">Home</a></nav><main class=\"content\">{{CONTENT}}</main></body></html>";

/// Component for handling HTML template rendering.
///
/// The outer shell is read once at startup; page bodies are assembled
/// per request. Catalogue text is always escaped. Only sanitized
/// markdown output is inserted verbatim.
pub struct TemplateComponent {
    shell: String,
}

impl TemplateComponent {
    /// Create a template component using the built-in shell
    pub fn new() -> Self {
        Self { shell: FALLBACK_SHELL.to_string() }
    }

    /// Use `<static_dir>/html/base.html` as the shell when it exists
    pub fn load(static_dir: &Path) -> Self {
        let base_path = static_dir.join("html").join("base.html");
        match fs::read_to_string(&base_path) {
            Ok(shell) => {
                log::info!("Using page shell from {:?}", base_path);
                Self { shell }
            }
            Err(e) => {
                log::debug!("No page shell at {:?} ({}), using built-in shell", base_path, e);
                Self::new()
            }
        }
    }

    fn render_shell(&self, title: &str, content: &str) -> String {
        self.shell
            .replace("{{TITLE}}", &escape_html(title))
            .replace("{{STYLE}}", STYLE_LINK)
            .replace("{{CONTENT}}", content)
    }

    /// Catalogue listing with a link for starting a new page
    pub fn render_home(&self, pages: &[Page], new_id: &str) -> String {
        let mut content = String::new();
        content.push_str("<h1>Pages</h1>");
        content.push_str(&format!(
            "<p><a class=\"new-page\" href=\"/edit/{}\">New page</a></p>",
            escape_html(new_id)
        ));

        if pages.is_empty() {
            content.push_str("<p class=\"empty\">No pages yet.</p>");
        } else {
            content.push_str("<ul class=\"listing\">\n");
            for page in pages {
                content.push_str(&format!(
                    "  <li><a href=\"/view/{}\">{}</a></li>\n",
                    escape_html(&page.id),
                    escape_html(page.title())
                ));
            }
            content.push_str("</ul>\n");
        }

        self.render_shell("Wiki", &content)
    }

    /// Rendered page. `body_html` must already be sanitized.
    pub fn render_view(&self, page: &Page, body_html: &str, meta_html: &str, new_id: &str) -> String {
        let content = format!(
            "<article class=\"page\"><h1 class=\"page-title\">{title}</h1>{meta}<div class=\"page-body\">{body}</div></article>\
             <p class=\"actions\"><a href=\"/edit/{id}\">Edit</a> <a class=\"new-page\" href=\"/edit/{new_id}\">New page</a></p>",
            title = escape_html(page.title()),
            meta = meta_html,
            body = body_html,
            id = escape_html(&page.id),
            new_id = escape_html(new_id),
        );
        self.render_shell(page.title(), &content)
    }

    /// Edit form, pre-filled with whatever the page already holds
    pub fn render_edit(&self, page: &Page) -> String {
        let body = String::from_utf8_lossy(page.body_bytes());
        let content = format!(
            "<h1>Editing {heading}</h1>\
             <form method=\"POST\" action=\"/save/{id}\">\
             <p><label>Title <input type=\"text\" name=\"displayTitle\" value=\"{title}\"></label></p>\
             <p><textarea name=\"body\" rows=\"20\" cols=\"80\">{body}</textarea></p>\
             <p><input type=\"submit\" value=\"Save\"></p>\
             </form>",
            heading = escape_html(&page.id),
            id = escape_html(&page.id),
            title = escape_html(&page.display_title),
            body = escape_html(&body),
        );
        self.render_shell(&format!("Editing {}", page.id), &content)
    }
}

impl Default for TemplateComponent {
    fn default() -> Self {
        Self::new()
    }
}
