//! Input sanitization for clause text, field names and keyword expressions.

/// Trims surrounding whitespace; returns `None` when nothing is left.
///
/// `None` is the no-op trigger for every text-taking builder operation.
pub fn sanitize_input(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_input("  disk full \n"), Some("disk full"));
    }

    #[test]
    fn keeps_inner_whitespace() {
        assert_eq!(sanitize_input("a   b"), Some("a   b"));
    }

    #[test]
    fn empty_and_blank_are_absent() {
        assert_eq!(sanitize_input(""), None);
        assert_eq!(sanitize_input("   "), None);
        assert_eq!(sanitize_input("\t\r\n"), None);
    }
}
