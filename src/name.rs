//! Name canonicalization.
//!
//! Relationships between records are expressed through names, so every
//! comparison in the crate goes through [`build_full_name`]. The title-casing
//! helpers exist for display and must never be used as lookup keys.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Trims and lower-cases a single name part. Absent input yields `""`.
pub fn normalize_name_part<'a>(part: impl Into<Option<&'a str>>) -> String {
    match part.into() {
        Some(part) => part.trim().to_lowercase(),
        None => String::new(),
    }
}

/// Builds the `"first last"` key used to match parents and spouses.
///
/// Both parts are normalized and the result is trimmed, so a missing first or
/// last name does not leave a dangling space. Two empty parts give `""`.
pub fn build_full_name<'a, 'b>(
    first: impl Into<Option<&'a str>>,
    last: impl Into<Option<&'b str>>,
) -> String {
    let first = normalize_name_part(first);
    let last = normalize_name_part(last);
    format!("{} {}", first, last).trim().to_string()
}

/// `"jOHN"` becomes `"John"`.
pub fn to_title<'a>(s: impl Into<Option<&'a str>>) -> String {
    let s = match s.into() {
        Some(s) => s,
        None => return String::new(),
    };
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `("john", "doe")` becomes `"John Doe"`.
pub fn to_title_full_name<'a, 'b>(
    first: impl Into<Option<&'a str>>,
    last: impl Into<Option<&'b str>>,
) -> String {
    format!("{} {}", to_title(first), to_title(last)).trim().to_string()
}

/// Splits a free-text entry such as `"Mary Ann Smith"` into a normalized
/// `(first, last)` pair: the first token is the first name and everything
/// after it is the last name.
pub fn split_full_name(raw: &str) -> (String, String) {
    let normalized = normalize_name_part(raw);
    let mut tokens = WHITESPACE.split(&normalized).filter(|t| !t.is_empty());
    let first = tokens.next().unwrap_or_default().to_string();
    let last = tokens.collect::<Vec<_>>().join(" ");
    (first, last)
}
