//! HTML parser for extracting outbound references
//!
//! Links are read straight off html5ever's tokenizer rather than a repaired
//! tree. Tree construction clones formatting elements when it recovers from
//! misnested markup, which would make one `<a>` in the source show up twice.
//! Working on tokens, every start tag in the source yields at most one link,
//! and unclosed or misnested tags never abort a page.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Content types that are parsed as HTML
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Returns true if a Content-Type header value denotes HTML
///
/// A missing header is treated as HTML. Parameters such as `charset` are
/// ignored and the media type is compared case-insensitively.
pub fn is_html_content_type(content_type: Option<&str>) -> bool {
    let Some(value) = content_type else {
        return true;
    };

    let media_type = value.split(';').next().unwrap_or("").trim();
    if media_type.is_empty() {
        return true;
    }

    HTML_CONTENT_TYPES
        .iter()
        .any(|html| media_type.eq_ignore_ascii_case(html))
}

/// Extracts raw link strings from an HTML body in document order
///
/// # Extraction Rules
///
/// - `href` of `<a>` and `<link>`
/// - `src` of `<script>`, `<img>`, `<iframe>` and `<embed>`
/// - A tag without the attribute contributes nothing
/// - An empty attribute is returned as-is; the classifier rejects it
/// - A declared non-HTML content type yields no links
///
/// # Example
///
/// ```
/// use site_census::crawler::extract_links;
///
/// let html = r#"<a href="/page">Link</a><img src="/logo.png">"#;
/// let links = extract_links(html, Some("text/html"));
/// assert_eq!(links, vec!["/page", "/logo.png"]);
///
/// assert!(extract_links(html, Some("application/json")).is_empty());
/// ```
pub fn extract_links(body: &str, content_type: Option<&str>) -> Vec<String> {
    if !is_html_content_type(content_type) {
        return Vec::new();
    }

    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(body));

    let mut tokenizer = Tokenizer::new(LinkSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    tokenizer.sink.links
}

/// Attribute that carries the reference for a tag, if the tag carries one
fn link_attribute(tag: &str) -> Option<&'static str> {
    match tag {
        "a" | "link" => Some("href"),
        "script" | "img" | "iframe" | "embed" => Some("src"),
        _ => None,
    }
}

/// Collects reference attributes from start tags as they are tokenized
#[derive(Default)]
struct LinkSink {
    links: Vec<String>,
}

impl TokenSink for LinkSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        if tag.kind != TagKind::StartTag {
            return TokenSinkResult::Continue;
        }

        let name: &str = &tag.name;
        if let Some(attr) = link_attribute(name) {
            if let Some(value) = tag.attrs.iter().find(|a| &*a.name.local == attr) {
                self.links.push(value.value.to_string());
            }
        }

        // Markup inside these elements is text, not tags
        match name {
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" => TokenSinkResult::RawData(RawKind::Rawtext),
            "textarea" | "title" => TokenSinkResult::RawData(RawKind::Rcdata),
            _ => TokenSinkResult::Continue,
        }
    }
}
