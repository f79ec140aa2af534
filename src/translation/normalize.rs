/*!
 * Word normalization.
 *
 * Every entry point that turns user-selected text into a vocabulary key goes
 * through `normalize_word`, so "Café!", "café" and "CAFÉ" all address the
 * same stored entry.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a word character, whitespace or a hyphen
static STRIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid normalization pattern"));

/// Strip punctuation and lowercase a word.
///
/// Word characters are Unicode-aware, so accented letters and CJK text
/// survive. May return an empty string.
pub fn normalize_word(raw: &str) -> String {
    STRIP_PATTERN.replace_all(raw, "").to_lowercase()
}

/// Reduce a locale tag to its primary language subtag (`en-US` -> `en`)
pub fn primary_language(code: &str) -> &str {
    let code = code.trim();
    code.split(['-', '_']).next().unwrap_or(code)
}
