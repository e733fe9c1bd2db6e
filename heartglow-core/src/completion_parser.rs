//! Completion text parsing.
//!
//! The model is instructed to reply with the message text, then a line
//! containing `INSIGHTS:`, then a handful of bullet lines. This module turns
//! that raw text back into a [`GenerationResult`]. It is a best-effort text
//! protocol: when the marker is missing or the bullets are mangled, the
//! whole completion still becomes a usable message rather than an error.

use crate::types::GenerationResult;

/// Divider between the message body and the insight bullets.
pub const INSIGHTS_MARKER: &str = "INSIGHTS:";

/// Label some models prepend to the message body despite instructions.
const MESSAGE_LABEL: &str = "MESSAGE:";

/// Leading characters treated as bullets on insight lines.
const BULLET_CHARS: &[char] = &['•', '-', '*'];

/// Parse raw completion text into a message and its insights.
///
/// The text before the first case-insensitive `INSIGHTS:` is the message
/// (trimmed, with any leading `MESSAGE:` label removed). Every non-blank
/// line after the marker becomes one insight, in order, with one leading
/// bullet character stripped. Without a marker the entire trimmed text is
/// the message and `insights` is empty.
///
/// Pure and stateless; never fails.
pub fn parse_completion(raw: &str) -> GenerationResult {
    match find_ascii_case_insensitive(raw, INSIGHTS_MARKER) {
        Some(at) => {
            let message = strip_message_label(&raw[..at]).to_string();
            let insights = parse_insights(&raw[at + INSIGHTS_MARKER.len()..]);
            GenerationResult { message, insights }
        }
        None => GenerationResult {
            message: strip_message_label(raw).to_string(),
            insights: Vec::new(),
        },
    }
}

/// Trim the message segment and drop a leading `MESSAGE:` label if present.
fn strip_message_label(segment: &str) -> &str {
    let trimmed = segment.trim();
    let label_len = MESSAGE_LABEL.len();
    if trimmed.len() >= label_len && trimmed[..label_len].eq_ignore_ascii_case(MESSAGE_LABEL) {
        trimmed[label_len..].trim()
    } else {
        trimmed
    }
}

/// Split the post-marker text into insight strings: one per non-blank line,
/// bullet stripped, whitespace trimmed, order preserved. No count or content
/// validation happens here.
fn parse_insights(section: &str) -> Vec<String> {
    section
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    match line.strip_prefix(BULLET_CHARS) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Byte offset of the first occurrence of `needle` in `haystack`, ignoring
/// ASCII case. `needle` must be pure ASCII, which keeps the returned offset
/// on a char boundary regardless of what surrounds the match.
fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    debug_assert!(needle.is_ascii());
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_and_bulleted_insights() {
        let result = parse_completion("Hello world\nINSIGHTS:\n• A\n• B");
        assert_eq!(result.message, "Hello world");
        assert_eq!(result.insights, vec!["A", "B"]);
    }

    #[test]
    fn test_no_marker_yields_full_text() {
        let result = parse_completion("  Just a message with no insights.  ");
        assert_eq!(result.message, "Just a message with no insights.");
        assert!(result.insights.is_empty());
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let result = parse_completion("Hi Sam\ninsights:\n- be direct");
        assert_eq!(result.message, "Hi Sam");
        assert_eq!(result.insights, vec!["be direct"]);
    }

    #[test]
    fn test_blank_insight_section() {
        let result = parse_completion("Hi\nINSIGHTS:\n\n   \n");
        assert_eq!(result.message, "Hi");
        assert!(result.insights.is_empty());
    }

    #[test]
    fn test_message_label_stripped() {
        let result = parse_completion("MESSAGE: Hey there\nINSIGHTS:\n- A");
        assert_eq!(result.message, "Hey there");
        assert_eq!(result.insights, vec!["A"]);
    }

    #[test]
    fn test_message_label_stripped_without_marker() {
        let result = parse_completion("message: Hey there");
        assert_eq!(result.message, "Hey there");
    }

    #[test]
    fn test_dash_and_asterisk_bullets() {
        let result = parse_completion("m\nINSIGHTS:\n- first\n* second\n third");
        assert_eq!(result.insights, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_splits_on_first_marker_only() {
        let result = parse_completion("m\nINSIGHTS:\n- a\nINSIGHTS: again");
        assert_eq!(result.message, "m");
        assert_eq!(result.insights, vec!["a", "INSIGHTS: again"]);
    }

    #[test]
    fn test_marker_mid_line() {
        let result = parse_completion("Hello INSIGHTS: • A");
        assert_eq!(result.message, "Hello");
        assert_eq!(result.insights, vec!["A"]);
    }

    #[test]
    fn test_empty_input() {
        let result = parse_completion("");
        assert_eq!(result.message, "");
        assert!(result.insights.is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let result = parse_completion("Hi\r\nINSIGHTS:\r\n• A\r\n• B\r\n");
        assert_eq!(result.message, "Hi");
        assert_eq!(result.insights, vec!["A", "B"]);
    }

    #[test]
    fn test_parsing_is_idempotent_on_same_input() {
        let raw = "Hello world\nINSIGHTS:\n• A\n• B";
        assert_eq!(parse_completion(raw), parse_completion(raw));
    }

    #[test]
    fn test_insight_order_preserved() {
        let result = parse_completion("m\nINSIGHTS:\n• z\n• a\n• m");
        assert_eq!(result.insights, vec!["z", "a", "m"]);
    }
}
