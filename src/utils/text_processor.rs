use regex::Regex;
use std::sync::LazyLock;

use crate::config::ScriptRange;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit regex"));

/// Shortest `(...)` spans, one left-to-right pass.
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthetical regex"));

/// Replace every whitespace run (newlines included) with one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Delete every Unicode decimal digit, including the script's own numerals.
pub fn remove_digits(text: &str) -> String {
    DIGIT_RUN.replace_all(text, "").into_owned()
}

/// Delete parenthetical asides.
///
/// Nested or unbalanced parentheses are not parsed: `"a (b (c) d) e"` keeps
/// `" d) e"` after the first match consumes `"(b (c)"`.
pub fn remove_parentheticals(text: &str) -> String {
    PARENTHETICAL.replace_all(text, "").into_owned()
}

/// Keep only whitespace, sentence terminators and characters of the script.
pub fn retain_script_chars(text: &str, script: &ScriptRange, terminators: &[char]) -> String {
    text.chars()
        .filter(|&c| c.is_whitespace() || terminators.contains(&c) || script.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        let text = "  કોષ\n\n\tએકમ   છે \r\n";
        assert_eq!(collapse_whitespace(text), "કોષ એકમ છે");
    }

    #[test]
    fn test_remove_digits_includes_gujarati_numerals() {
        assert_eq!(remove_digits("પ્રકરણ 12 અને ૩૪"), "પ્રકરણ  અને ");
    }

    #[test]
    fn test_remove_parentheticals_non_greedy() {
        assert_eq!(remove_parentheticals("a (b) c (d) e"), "a  c  e");
    }

    #[test]
    fn test_remove_parentheticals_leaves_nested_residue() {
        assert_eq!(remove_parentheticals("a (b (c) d) e"), "a  d) e");
        assert_eq!(remove_parentheticals("open ( only"), "open ( only");
    }

    #[test]
    fn test_retain_script_chars() {
        let script = ScriptRange::default();
        let kept = retain_script_chars("કોષ cell. એકમ। (x) 5", &script, &['.', '।']);
        assert_eq!(kept, "કોષ . એકમ।  ");
    }
}
