//! Label to URL-safe name conversion.
//!
//! Album names are derived from their labels while the user types. The
//! result only ever contains `a-z`, `0-9` and `-`.

use std::sync::LazyLock;

use regex::Regex;

/// Whitespace as browser regexes see it: line terminators, the Zs spaces
/// and the BOM. Unlike Unicode White_Space this excludes U+0085 (NEL).
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]+",
    )
    .expect("valid whitespace regex")
});

/// Single-character form of the `WHITESPACE_RUN` class
pub(crate) fn is_browser_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{A0}' | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}

static NOT_SLUG_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("valid slug regex"));

/// Converts a label to a url friendly name.
///
/// Whitespace runs are collapsed into a single hyphen before anything is
/// stripped, so `"a !! b"` becomes `"a--b"`.
///
/// ```
/// use memo_web_core::label_to_name;
///
/// assert_eq!(label_to_name("My Album!! 2024"), "my-album-2024");
/// assert_eq!(label_to_name(""), "");
/// ```
pub fn label_to_name(label: &str) -> String {
    if label.is_empty() {
        return String::new();
    }

    let lower = label.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lower, "-");
    NOT_SLUG_CHAR.replace_all(&hyphenated, "").into_owned()
}

/// Returns true when `name` could have been produced by [`label_to_name`].
pub fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
