//! Category naming rules and the uncategorized fallback.
//!
//! Categories double as tags on problems. Every problem belongs to at
//! least one category at all times; problems with no real category are
//! parked under the uncategorized fallback until a tag is added, and
//! return there when their last tag is removed.

use crate::defaults;

/// Slug of the fallback category that collects untagged problems.
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

/// Display name of the fallback category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Normalize a display name into its canonical slug.
///
/// Trims surrounding whitespace, lowercases, and collapses internal
/// whitespace runs into single hyphens. Applying it twice is a no-op.
///
/// # Examples
///
/// ```
/// use grind_core::tags::normalize_slug;
///
/// assert_eq!(normalize_slug("Linked List"), "linked-list");
/// assert_eq!(normalize_slug("  Dynamic   Programming "), "dynamic-programming");
/// ```
pub fn normalize_slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Validate a category name.
///
/// Rules:
/// - Non-empty after trimming
/// - At most [`defaults::TAG_NAME_MAX_LENGTH`] characters
///
/// Returns Ok(()) if valid, Err with message if invalid.
pub fn validate_tag_name(name: &str) -> std::result::Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if trimmed.len() > defaults::TAG_NAME_MAX_LENGTH {
        return Err(format!(
            "Tag name must be {} characters or less",
            defaults::TAG_NAME_MAX_LENGTH
        ));
    }
    Ok(())
}

/// Whether a slug refers to the uncategorized fallback category.
pub fn is_uncategorized(slug: &str) -> bool {
    slug == UNCATEGORIZED_SLUG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_slug_lowercases() {
        assert_eq!(normalize_slug("Tree"), "tree");
        assert_eq!(normalize_slug("MATRIX"), "matrix");
    }

    #[test]
    fn test_normalize_slug_hyphenates_spaces() {
        assert_eq!(normalize_slug("Linked List"), "linked-list");
        assert_eq!(normalize_slug("Dynamic Programming"), "dynamic-programming");
    }

    #[test]
    fn test_normalize_slug_collapses_whitespace_runs() {
        assert_eq!(normalize_slug("Two   Pointers"), "two-pointers");
        assert_eq!(normalize_slug("a \t b"), "a-b");
    }

    #[test]
    fn test_normalize_slug_trims() {
        assert_eq!(normalize_slug("  Graph  "), "graph");
    }

    #[test]
    fn test_normalize_slug_idempotent() {
        let once = normalize_slug("Binary Search Tree");
        assert_eq!(normalize_slug(&once), once);
    }

    #[test]
    fn test_normalize_slug_of_display_name_matches_slug_constant() {
        assert_eq!(normalize_slug(UNCATEGORIZED_NAME), UNCATEGORIZED_SLUG);
    }

    #[test]
    fn test_validate_tag_name_accepts_normal_names() {
        assert!(validate_tag_name("Tree").is_ok());
        assert!(validate_tag_name("Linked List").is_ok());
        assert!(validate_tag_name("two-pointers").is_ok());
    }

    #[test]
    fn test_validate_tag_name_rejects_empty() {
        assert!(validate_tag_name("").is_err());
        assert!(validate_tag_name("   ").is_err());
    }

    #[test]
    fn test_validate_tag_name_rejects_too_long() {
        let long = "a".repeat(defaults::TAG_NAME_MAX_LENGTH + 1);
        assert!(validate_tag_name(&long).is_err());
    }

    #[test]
    fn test_validate_tag_name_accepts_max_length() {
        let max = "a".repeat(defaults::TAG_NAME_MAX_LENGTH);
        assert!(validate_tag_name(&max).is_ok());
    }

    #[test]
    fn test_is_uncategorized() {
        assert!(is_uncategorized("uncategorized"));
        assert!(!is_uncategorized("tree"));
        assert!(!is_uncategorized("Uncategorized"));
    }
}
