use std::sync::LazyLock;

use regex::Regex;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9._-]+)").expect("valid regex"));

/// `@handle` tokens in order of first appearance, without the `@`.
///
/// A token glued to a preceding word character (`dana@example.com`) is not a
/// mention. Trailing dots are sentence punctuation, not part of the handle.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut handles: Vec<String> = Vec::new();
    for caps in MENTION.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let glued = text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if glued {
            continue;
        }
        let handle = caps[1].trim_end_matches('.');
        if !handle.is_empty() && !handles.iter().any(|h| h == handle) {
            handles.push(handle.to_string());
        }
    }
    handles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_order_without_duplicates() {
        assert_eq!(
            extract_mentions("@dana can you pair with @lee.k? cc @dana"),
            vec!["dana", "lee.k"]
        );
    }

    #[test]
    fn test_ignores_emails() {
        assert!(extract_mentions("mail dana@example.com").is_empty());
        assert_eq!(extract_mentions("(@sam_o) thanks"), vec!["sam_o"]);
    }

    #[test]
    fn test_trailing_punctuation() {
        assert_eq!(extract_mentions("Ping @jo-ann."), vec!["jo-ann"]);
        assert!(extract_mentions("just an @ sign").is_empty());
    }
}
