use unicode_segmentation::UnicodeSegmentation;

use crate::grapheme::trailing_start;

/// Suffixes of `context` to search, longest first.
///
/// At most `max_context_depth - 1` trailing grapheme clusters are considered,
/// since a stored key holds the context plus one predicted grapheme. Each
/// following suffix drops one leading cluster: `"abc"` yields `"abc"`,
/// `"bc"`, `"c"`.
pub fn plan_suffixes(context: &str, max_context_depth: usize) -> Vec<&str> {
    let budget = max_context_depth.saturating_sub(1);
    let start = trailing_start(context, budget);
    let window = &context[start..];

    let mut suffixes = Vec::with_capacity(budget);
    let mut rest = window;
    while !rest.is_empty() {
        suffixes.push(rest);
        rest = drop_first_grapheme(rest);
    }
    suffixes
}

fn drop_first_grapheme(s: &str) -> &str {
    s.grapheme_indices(true)
        .nth(1)
        .map_or("", |(idx, _)| &s[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_context_within_depth() {
        assert_eq!(plan_suffixes("ab", 3), vec!["ab", "b"]);
        assert_eq!(plan_suffixes("abc", 4), vec!["abc", "bc", "c"]);
    }

    #[test]
    fn test_context_longer_than_depth() {
        assert_eq!(plan_suffixes("xyzab", 3), vec!["ab", "b"]);
    }

    #[test]
    fn test_empty_context() {
        assert!(plan_suffixes("", 3).is_empty());
    }

    #[test]
    fn test_depth_one_or_zero_plans_nothing() {
        assert!(plan_suffixes("abc", 1).is_empty());
        assert!(plan_suffixes("abc", 0).is_empty());
    }

    #[test]
    fn test_depth_two_uses_last_grapheme_only() {
        assert_eq!(plan_suffixes("我哋去", 2), vec!["去"]);
    }

    #[test]
    fn test_multi_codepoint_clusters_stay_whole() {
        let ctx = "ae\u{301}🇭🇰";
        assert_eq!(plan_suffixes(ctx, 3), vec!["e\u{301}🇭🇰", "🇭🇰"]);
    }
}
