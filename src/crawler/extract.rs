//! Content extraction from fetched HTML
//!
//! Two independent passes over a page: one for the indexable text (title plus
//! visible body text, with non-rendering markup removed), one for outbound
//! links feeding the frontier.

use scraper::{Html, Selector};
use url::Url;

use crate::url::Canonicalizer;

/// Elements whose subtrees never contribute visible text
const SKIP_TAGS: &[&str] = &["script", "style", "noscript"];

/// Indexable content extracted from a page
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDoc {
    /// First `<title>` text, trimmed; empty if the page has none
    pub title: String,

    /// All visible text joined with single spaces, whitespace collapsed
    pub text: String,
}

/// Extracts the title and visible text from an HTML document
pub fn extract_document(html: &str) -> ExtractedDoc {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| normalize_whitespace(&element.text().collect::<String>()))
        })
        .unwrap_or_default();

    let mut raw = String::new();
    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |element| SKIP_TAGS.contains(&element.name()))
            });
            if !hidden {
                raw.push_str(text);
                raw.push(' ');
            }
        }
    }

    ExtractedDoc {
        title,
        text: normalize_whitespace(&raw),
    }
}

/// Extracts up to `limit` canonicalized outbound links in document order
///
/// Hrefs that fail canonicalization (unsupported schemes, malformed URLs) are
/// skipped and do not count toward the limit. Duplicates within a page are
/// kept; the frontier deduplicates on admission.
pub fn extract_outlinks(
    html: &str,
    base: &Url,
    canonicalizer: &Canonicalizer,
    limit: usize,
) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if links.len() >= limit {
                break;
            }
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = canonicalizer.canonicalize(base, href) {
                    links.push(url);
                }
            }
        }
    }

    links
}

/// Collapses runs of whitespace to single spaces and trims
fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn canon() -> Canonicalizer {
        Canonicalizer::default()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test Page  </title></head><body>Hello</body></html>"#;
        let doc = extract_document(html);
        assert_eq!(doc.title, "Test Page");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let html = r#"<html><head></head><body>Hello</body></html>"#;
        let doc = extract_document(html);
        assert_eq!(doc.title, "");
        assert_eq!(doc.text, "Hello");
    }

    #[test]
    fn test_title_text_included_in_body_text() {
        let html = r#"<html><head><title>Title</title></head><body>Body</body></html>"#;
        let doc = extract_document(html);
        assert_eq!(doc.text, "Title Body");
    }

    #[test]
    fn test_script_and_style_stripped() {
        let html = r#"<html><body>
            <script>var hidden = "nope";</script>
            <style>.x { color: red }</style>
            <noscript>enable javascript</noscript>
            <p>visible</p>
        </body></html>"#;
        let doc = extract_document(html);
        assert_eq!(doc.text, "visible");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let html = "<html><body><p>one\n\n  two</p>\t<p>three</p></body></html>";
        let doc = extract_document(html);
        assert_eq!(doc.text, "one two three");
    }

    #[test]
    fn test_empty_body_yields_empty_text() {
        let html = r#"<html><body><script>only()</script></body></html>"#;
        let doc = extract_document(html);
        assert_eq!(doc.text, "");
    }

    #[test]
    fn test_outlinks_in_document_order() {
        let html = r#"<html><body>
            <a href="/b">B</a>
            <a href="/a">A</a>
            <a href="https://other.com/c">C</a>
        </body></html>"#;
        let links = extract_outlinks(html, &base(), &canon(), 50);
        assert_eq!(
            links,
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://other.com/c"
            ]
        );
    }

    #[test]
    fn test_outlinks_limit_applies_after_canonicalization() {
        let html = r#"<html><body>
            <a href="mailto:no@example.com">skip</a>
            <a href="/one">1</a>
            <a href="/two">2</a>
            <a href="/three">3</a>
        </body></html>"#;
        let links = extract_outlinks(html, &base(), &canon(), 2);
        assert_eq!(links, vec!["https://example.com/one", "https://example.com/two"]);
    }

    #[test]
    fn test_outlinks_strip_tracking_params() {
        let html = r#"<html><body><a href="/x?a=1&utm_source=feed">link</a></body></html>"#;
        let links = extract_outlinks(html, &base(), &canon(), 50);
        assert_eq!(links, vec!["https://example.com/x?a=1"]);
    }

    #[test]
    fn test_duplicate_hrefs_kept() {
        let html = r#"<html><body><a href="/same">1</a><a href="/same">2</a></body></html>"#;
        let links = extract_outlinks(html, &base(), &canon(), 50);
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_no_anchors_no_links() {
        let links = extract_outlinks("<html><body>text</body></html>", &base(), &canon(), 50);
        assert!(links.is_empty());
    }
}
