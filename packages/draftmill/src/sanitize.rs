//! HTML output scrubbing.
//!
//! The model produces the article body as HTML and the publish host
//! renders it verbatim, so anything executable has to come out before
//! submission. This is a denylist pass over model output we mostly
//! trust, not a general-purpose sanitizer for hostile input.

use std::sync::OnceLock;

use regex::Regex;

fn script_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap())
}

fn iframe_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe>").unwrap())
}

fn object_embed_tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)</?(?:object|embed)\b[^>]*>").unwrap())
}

fn event_handlers() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Inline handler attributes: onclick="...", onload='...', onerror=bare
    RE.get_or_init(|| Regex::new(r#"(?i)\son\w+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap())
}

fn javascript_urls() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)javascript\s*:").unwrap())
}

/// Strip executable content from an HTML fragment.
///
/// Removes script and iframe blocks (with their contents), object and
/// embed tags, inline event handler attributes, and `javascript:` URL
/// schemes. Regular markup passes through untouched.
pub fn sanitize_html(html: &str) -> String {
    let out = script_blocks().replace_all(html, "");
    let out = iframe_blocks().replace_all(&out, "");
    let out = object_embed_tags().replace_all(&out, "");
    let out = event_handlers().replace_all(&out, "");
    let out = javascript_urls().replace_all(&out, "");
    out.into_owned()
}
