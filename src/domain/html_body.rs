/// Minimal HTML rendering of a plain text email body.
///
/// HTML-significant characters are escaped first, so user content cannot inject
/// markup, then every line break becomes a `<br>` tag. Nothing else is done:
/// no paragraphs, no link detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlBody(String);

impl HtmlBody {
    pub fn from_plain_text(text: &str) -> Self {
        Self(escape_html(text).replace('\n', "<br>"))
    }
}

impl AsRef<str> for HtmlBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// `&` has to go first, otherwise the other entities get escaped twice
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
