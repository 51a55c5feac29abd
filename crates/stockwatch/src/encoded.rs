//! Parsing of encoded stock strings such as `"Carrot **x21**"`.

use regex::Regex;
use std::sync::OnceLock;

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"^(?P<name>.*?)\s*\*\*x(?P<count>\d+)\*\*\s*$").expect("static regex")
    })
}

/// Split an encoded item into `(name, count)`.
///
/// Without a `**xN**` marker the text is split at its last whitespace and
/// the trailing word is taken literally as the count.
pub fn parse_encoded(raw: &str) -> (String, String) {
    let text = raw.trim();
    if let Some(caps) = marker().captures(text) {
        return (caps["name"].to_string(), caps["count"].to_string());
    }
    match text.rsplit_once(char::is_whitespace) {
        Some((name, count)) => (name.trim_end().to_string(), count.to_string()),
        None => (text.to_string(), String::new()),
    }
}
