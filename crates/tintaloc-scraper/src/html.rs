//! Internal HTML text primitives shared by the extraction heuristics.
//!
//! Candidate pages are untrusted and frequently malformed, so everything here
//! is regex-based scanning rather than a full DOM parse. This module is
//! `pub(crate)` so [`crate::extract`] and future siblings share the same
//! low-level routines without exposing them as public API.

use regex::Regex;

/// Approximates a page's visible text: strips scripts, styles, comments and
/// tags, then collapses runs of whitespace to single spaces.
pub(crate) fn visible_text(html: &str) -> String {
    let no_scripts = Regex::new(r"(?is)<script[^>]*>.*?</script>")
        .expect("valid regex")
        .replace_all(html, " ");
    let no_styles = Regex::new(r"(?is)<style[^>]*>.*?</style>")
        .expect("valid regex")
        .replace_all(&no_scripts, " ");
    let no_comments = Regex::new(r"(?s)<!--.*?-->")
        .expect("valid regex")
        .replace_all(&no_styles, " ");
    let no_tags = Regex::new(r"(?s)<[^>]+>")
        .expect("valid regex")
        .replace_all(&no_comments, " ");
    let collapsed = Regex::new(r"\s+")
        .expect("valid regex")
        .replace_all(&no_tags, " ");
    collapsed.trim().to_owned()
}

/// Extracts the raw `<title>` text, if present.
pub(crate) fn title_text(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex");
    let raw = re.captures(html)?.get(1)?.as_str();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Extracts the `og:site_name` meta content, tolerating either attribute order.
pub(crate) fn og_site_name(html: &str) -> Option<String> {
    let property_first = Regex::new(
        r#"(?is)<meta[^>]+property\s*=\s*["']og:site_name["'][^>]*content\s*=\s*["']([^"']+)["']"#,
    )
    .expect("valid regex");
    let content_first = Regex::new(
        r#"(?is)<meta[^>]+content\s*=\s*["']([^"']+)["'][^>]*property\s*=\s*["']og:site_name["']"#,
    )
    .expect("valid regex");

    let value = property_first
        .captures(html)
        .or_else(|| content_first.captures(html))?
        .get(1)?
        .as_str()
        .trim()
        .to_owned();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Extracts the host from a URL without pulling in a URL parser.
pub(crate) fn url_host(url: &str) -> &str {
    let without_scheme = url.split("//").last().unwrap_or(url);
    without_scheme.split('/').next().unwrap_or(without_scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_text_strips_scripts_and_tags() {
        let html = r"<html><head><script>var hidden = 1;</script><style>p { color: red }</style></head><body><p>Tinta   automotiva</p><!-- note --></body></html>";
        let text = visible_text(html);
        assert_eq!(text, "Tinta automotiva");
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn title_text_handles_attributes_and_whitespace() {
        let html = "<title data-x=\"1\">\n  Loja de Tintas  \n</title>";
        assert_eq!(title_text(html).as_deref(), Some("Loja de Tintas"));
    }

    #[test]
    fn title_text_none_when_absent() {
        assert!(title_text("<html><body></body></html>").is_none());
    }

    #[test]
    fn og_site_name_both_attribute_orders() {
        let a = r#"<meta property="og:site_name" content="Tintas Reunidas">"#;
        let b = r#"<meta content="Tintas Reunidas" property="og:site_name">"#;
        assert_eq!(og_site_name(a).as_deref(), Some("Tintas Reunidas"));
        assert_eq!(og_site_name(b).as_deref(), Some("Tintas Reunidas"));
    }

    #[test]
    fn url_host_strips_scheme_and_path() {
        assert_eq!(url_host("https://www.tintas.com.br/loja/1"), "www.tintas.com.br");
        assert_eq!(url_host("http://example.com"), "example.com");
    }
}
