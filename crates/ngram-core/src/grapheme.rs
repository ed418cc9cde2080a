//! Extended grapheme cluster helpers.
//!
//! Every length in this crate (context depth, key length, prediction width)
//! is measured in extended grapheme clusters, never in bytes or chars.

use unicode_segmentation::UnicodeSegmentation;

/// Split `text` into its grapheme clusters, in order.
pub fn graphemes(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

pub fn last_grapheme(text: &str) -> Option<&str> {
    text.graphemes(true).next_back()
}

/// Byte offset where the last `n` grapheme clusters of `text` begin.
///
/// Returns 0 when `text` has `n` or fewer clusters, and `text.len()` when
/// `n == 0`.
pub fn trailing_start(text: &str, n: usize) -> usize {
    if n == 0 {
        return text.len();
    }
    text.grapheme_indices(true)
        .nth_back(n - 1)
        .map_or(0, |(idx, _)| idx)
}

/// Whitespace and control clusters separate runs of text when counting
/// n-grams; no key ever contains one.
pub fn is_separator(cluster: &str) -> bool {
    cluster
        .chars()
        .all(|c| c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphemes_combining_marks() {
        // e + COMBINING ACUTE ACCENT is a single cluster
        assert_eq!(graphemes("cafe\u{301}"), vec!["c", "a", "f", "e\u{301}"]);
        assert_eq!(grapheme_count("cafe\u{301}"), 4);
        assert_eq!("cafe\u{301}".chars().count(), 5);
    }

    #[test]
    fn test_graphemes_cjk_and_emoji() {
        assert_eq!(graphemes("我哋"), vec!["我", "哋"]);
        // Regional indicator pair renders as one flag
        assert_eq!(grapheme_count("🇭🇰好"), 2);
        assert_eq!(last_grapheme("好🇭🇰"), Some("🇭🇰"));
    }

    #[test]
    fn test_last_grapheme_empty() {
        assert_eq!(last_grapheme(""), None);
        assert_eq!(grapheme_count(""), 0);
    }

    #[test]
    fn test_trailing_start() {
        assert_eq!(trailing_start("abcde", 2), 3);
        assert_eq!(trailing_start("abcde", 5), 0);
        assert_eq!(trailing_start("abcde", 9), 0);
        assert_eq!(trailing_start("abcde", 0), 5);
        assert_eq!(trailing_start("", 3), 0);
        // 我 and 哋 are three bytes each
        assert_eq!(trailing_start("我哋去", 2), 3);
        assert_eq!(trailing_start("xe\u{301}", 1), 1);
    }

    #[test]
    fn test_is_separator() {
        assert!(is_separator(" "));
        assert!(is_separator("\u{3000}"));
        assert!(is_separator("\r\n"));
        assert!(is_separator("\t"));
        assert!(!is_separator("a"));
        assert!(!is_separator("，"));
    }
}
