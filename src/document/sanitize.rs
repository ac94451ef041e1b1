//! HTML stripping and whitespace normalization for document text fields

use regex::Regex;
use std::sync::OnceLock;

fn script_pattern() -> &'static Regex {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    SCRIPT.get_or_init(|| {
        Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("static script pattern")
    })
}

fn style_pattern() -> &'static Regex {
    static STYLE: OnceLock<Regex> = OnceLock::new();
    STYLE.get_or_init(|| {
        Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("static style pattern")
    })
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static tag pattern"))
}

fn nbsp_pattern() -> &'static Regex {
    static NBSP: OnceLock<Regex> = OnceLock::new();
    // `&nbsp` is accepted without its semicolon, as browsers do
    NBSP.get_or_init(|| Regex::new(r"(?i)&nbsp;?").expect("static nbsp pattern"))
}

/// Entities decoded after markup removal. `&amp;` goes last so that
/// `&amp;lt;` decodes to the literal text `&lt;`.
const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

/// Remove HTML markup, replacing each tag with a space so adjacent blocks
/// don't fuse. Script and style bodies go first, they are never text.
pub fn strip_html_tags(text: &str) -> String {
    let cleaned = script_pattern().replace_all(text, " ");
    let cleaned = style_pattern().replace_all(&cleaned, " ");
    tag_pattern().replace_all(&cleaned, " ").into_owned()
}

/// Decode the handful of entities that show up in scraped text
pub fn decode_entities(text: &str) -> String {
    let mut decoded = nbsp_pattern().replace_all(text, " ").into_owned();
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    decoded
}

/// Collapse every whitespace run (including non-breaking spaces) to one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full sanitization pipeline applied to content and description
pub fn sanitize_text(text: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_html_tags(text)))
}
