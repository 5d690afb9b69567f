/// Bounds free-text fields (titles, bodies) for notification messages.
/// Input at or under `max_chars` comes back unchanged; anything longer is
/// cut to the first `max_chars` characters with a `...` marker appended.
///
/// Counts characters, not bytes, so multi-byte text is never split
/// mid-sequence.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Strips the `refs/heads/` prefix from a git ref, leaving the bare branch
/// name. Refs with any other shape (tags, already-short names) pass through.
pub fn short_ref(git_ref: &str) -> &str {
    git_ref.strip_prefix("refs/heads/").unwrap_or(git_ref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_unchanged() {
        assert_eq!(truncate("hello", 20), "hello");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn long_input_is_cut_with_marker() {
        let out = truncate("a very long pull request title", 10);
        assert_eq!(out, "a very lon...");
        assert_eq!(out.chars().count(), 13);
    }

    #[test]
    fn truncation_is_idempotent() {
        let once = truncate("some body text that goes on and on", 12);
        assert_eq!(truncate(&once, 12), once);
    }

    #[test]
    fn multibyte_text_is_not_split() {
        // 5 chars would land mid-sequence if this counted bytes
        let out = truncate("日本語のテキスト", 4);
        assert_eq!(out, "日本語の...");
    }

    #[test]
    fn strips_branch_prefix_only() {
        assert_eq!(short_ref("refs/heads/feature-x"), "feature-x");
        assert_eq!(short_ref("refs/tags/v1.0"), "refs/tags/v1.0");
        assert_eq!(short_ref("main"), "main");
    }
}
