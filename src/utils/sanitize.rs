use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));

/// Strips markup tags and surrounding whitespace from user text.
pub fn clean(raw: &str) -> String {
    TAG.replace_all(raw, "").trim().to_string()
}
