//! Admin form validation.
//!
//! Drafts are checked here, at the input boundary, before any storage call
//! happens. Failures are field-scoped so a form can attach each message to
//! the offending widget. A draft that fails validation never reaches the
//! storage layer.
//!
//! Character counts are Unicode scalar counts, not byte lengths — the
//! catalog's content is Portuguese and accented titles must not be
//! penalized.

use chrono::{Datelike, Utc};

use crate::model::BookDraft;

pub const TITLE_MIN_CHARS: usize = 3;
pub const AUTHOR_MIN_CHARS: usize = 2;
pub const YEAR_MIN: i32 = 1000;
pub const SUMMARY_MIN_CHARS: usize = 100;
pub const KEY_TAKEAWAYS_MIN: usize = 3;
pub const KEY_TAKEAWAYS_MAX: usize = 7;
pub const FOR_WHOM_MIN_CHARS: usize = 20;
pub const QUOTE_MIN_CHARS: usize = 5;
pub const SLUG_MIN_CHARS: usize = 3;

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All failures found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// First failure for a given field, if any.
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == name)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates a draft against the admin form contract.
///
/// Collects every failure instead of stopping at the first, so the form
/// can surface all of them in one round.
pub fn validate(draft: &BookDraft) -> Result<(), ValidationErrors> {
    let mut errors: Vec<FieldError> = Vec::new();
    let mut fail = |field: &'static str, message: String| {
        errors.push(FieldError { field, message });
    };

    if chars(&draft.title) < TITLE_MIN_CHARS {
        fail(
            "title",
            format!("title must be at least {} characters", TITLE_MIN_CHARS),
        );
    }
    if chars(&draft.author) < AUTHOR_MIN_CHARS {
        fail(
            "author",
            format!("author must be at least {} characters", AUTHOR_MIN_CHARS),
        );
    }

    let current_year = Utc::now().year();
    if draft.year < YEAR_MIN {
        fail("year", format!("year must be {} or later", YEAR_MIN));
    } else if draft.year > current_year {
        fail("year", "year cannot be in the future".to_string());
    }

    if draft.categories.is_empty() {
        fail("categories", "select at least one category".to_string());
    } else if draft.categories.iter().any(|c| c.trim().is_empty()) {
        fail("categories", "category names cannot be blank".to_string());
    }

    if draft.themes.is_empty() {
        fail("themes", "add at least one theme".to_string());
    } else if draft.themes.iter().any(|t| t.trim().is_empty()) {
        fail("themes", "theme names cannot be blank".to_string());
    }

    if chars(&draft.summary) < SUMMARY_MIN_CHARS {
        fail(
            "summary",
            format!("summary must be at least {} characters", SUMMARY_MIN_CHARS),
        );
    }

    if draft.key_takeaways.len() < KEY_TAKEAWAYS_MIN {
        fail(
            "key_takeaways",
            format!("add at least {} key takeaways", KEY_TAKEAWAYS_MIN),
        );
    } else if draft.key_takeaways.len() > KEY_TAKEAWAYS_MAX {
        fail(
            "key_takeaways",
            format!("at most {} key takeaways", KEY_TAKEAWAYS_MAX),
        );
    } else if draft.key_takeaways.iter().any(|k| k.trim().is_empty()) {
        fail("key_takeaways", "key takeaways cannot be blank".to_string());
    }

    if chars(&draft.for_whom) < FOR_WHOM_MIN_CHARS {
        fail(
            "for_whom",
            format!(
                "this section must be at least {} characters",
                FOR_WHOM_MIN_CHARS
            ),
        );
    }
    if chars(&draft.quote) < QUOTE_MIN_CHARS {
        fail(
            "quote",
            format!("quote must be at least {} characters", QUOTE_MIN_CHARS),
        );
    }

    if let Err(e) = validate_slug(&draft.slug) {
        fail("slug", e.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Validates a URL slug.
///
/// # Rules
/// - At least [`SLUG_MIN_CHARS`] characters
/// - Only lowercase ASCII letters, digits, and hyphens
/// - Cannot start or end with a hyphen
/// - Cannot contain consecutive hyphens (`--`)
///
/// # Examples
/// ```
/// use sumario::validation::validate_slug;
///
/// assert!(validate_slug("deep-work").is_ok());
/// assert!(validate_slug("o-poder-do-habito").is_ok());
/// assert!(validate_slug("1984").is_ok());
///
/// assert!(validate_slug("ab").is_err());
/// assert!(validate_slug("Deep-Work").is_err());
/// assert!(validate_slug("deep--work").is_err());
/// assert!(validate_slug("-deep").is_err());
/// assert!(validate_slug("deep-").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<(), SlugError> {
    if slug.chars().count() < SLUG_MIN_CHARS {
        return Err(SlugError::TooShort);
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(SlugError::HyphenAtEdge);
    }

    let mut prev_was_hyphen = false;
    for ch in slug.chars() {
        if ch == '-' {
            if prev_was_hyphen {
                return Err(SlugError::ConsecutiveHyphens);
            }
            prev_was_hyphen = true;
            continue;
        }
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() {
            return Err(SlugError::InvalidCharacter(ch));
        }
        prev_was_hyphen = false;
    }

    Ok(())
}

/// Error type for slug validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// Slug is shorter than [`SLUG_MIN_CHARS`]
    TooShort,
    /// Slug starts or ends with a hyphen
    HyphenAtEdge,
    /// Slug contains consecutive hyphens
    ConsecutiveHyphens,
    /// Slug contains a character outside `a-z`, `0-9`, `-`
    InvalidCharacter(char),
}

impl std::fmt::Display for SlugError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlugError::TooShort => {
                write!(f, "slug must be at least {} characters", SLUG_MIN_CHARS)
            }
            SlugError::HyphenAtEdge => {
                write!(f, "slug cannot start or end with a hyphen")
            }
            SlugError::ConsecutiveHyphens => {
                write!(f, "slug cannot contain consecutive hyphens")
            }
            SlugError::InvalidCharacter(ch) => {
                write!(
                    f,
                    "slug contains invalid character '{}' (only lowercase letters, digits, and hyphens allowed)",
                    ch
                )
            }
        }
    }
}

impl std::error::Error for SlugError {}

fn chars(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_draft;

    #[test]
    fn sample_draft_is_valid() {
        assert!(validate(&sample_draft("deep-work", "Deep Work")).is_ok());
    }

    #[test]
    fn short_title_fails_on_title_field() {
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.title = "ab".to_string();
        let errors = validate(&draft).unwrap_err();
        assert!(errors.field("title").is_some());
        assert!(errors.field("author").is_none());
    }

    #[test]
    fn accented_title_counts_characters_not_bytes() {
        let mut draft = sample_draft("e-e", "Til");
        // Three characters, six bytes.
        draft.title = "ééé".to_string();
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn short_author_fails() {
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.author = "x".to_string();
        assert!(validate(&draft).unwrap_err().field("author").is_some());
    }

    #[test]
    fn year_bounds() {
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.year = 999;
        assert!(validate(&draft).unwrap_err().field("year").is_some());

        draft.year = Utc::now().year();
        assert!(validate(&draft).is_ok());

        draft.year = Utc::now().year() + 1;
        assert!(validate(&draft).unwrap_err().field("year").is_some());
    }

    #[test]
    fn empty_categories_fail() {
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.categories.clear();
        assert!(validate(&draft).unwrap_err().field("categories").is_some());
    }

    #[test]
    fn blank_theme_fails() {
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.themes.push("   ".to_string());
        assert!(validate(&draft).unwrap_err().field("themes").is_some());
    }

    #[test]
    fn short_summary_fails() {
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.summary = "too short".to_string();
        assert!(validate(&draft).unwrap_err().field("summary").is_some());
    }

    #[test]
    fn takeaway_count_bounds() {
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.key_takeaways = vec!["one".to_string(), "two".to_string()];
        assert!(validate(&draft)
            .unwrap_err()
            .field("key_takeaways")
            .is_some());

        draft.key_takeaways = (0..8).map(|i| format!("takeaway {}", i)).collect();
        assert!(validate(&draft)
            .unwrap_err()
            .field("key_takeaways")
            .is_some());

        draft.key_takeaways = (0..7).map(|i| format!("takeaway {}", i)).collect();
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn collects_multiple_failures() {
        let draft = BookDraft::default();
        let errors = validate(&draft).unwrap_err();
        assert!(errors.errors().len() >= 5);
        assert!(errors.field("title").is_some());
        assert!(errors.field("slug").is_some());
    }

    #[test]
    fn valid_slugs() {
        assert!(validate_slug("deep-work").is_ok());
        assert!(validate_slug("o-poder-do-habito").is_ok());
        assert!(validate_slug("abc").is_ok());
        assert!(validate_slug("1984").is_ok());
        assert!(validate_slug("a-1-b").is_ok());
    }

    #[test]
    fn invalid_slugs() {
        assert_eq!(validate_slug("ab"), Err(SlugError::TooShort));
        assert_eq!(validate_slug(""), Err(SlugError::TooShort));
        assert_eq!(validate_slug("-abc"), Err(SlugError::HyphenAtEdge));
        assert_eq!(validate_slug("abc-"), Err(SlugError::HyphenAtEdge));
        assert_eq!(
            validate_slug("deep--work"),
            Err(SlugError::ConsecutiveHyphens)
        );
        assert_eq!(
            validate_slug("Deep-Work"),
            Err(SlugError::InvalidCharacter('D'))
        );
        assert_eq!(
            validate_slug("deep work"),
            Err(SlugError::InvalidCharacter(' '))
        );
        assert_eq!(
            validate_slug("café"),
            Err(SlugError::InvalidCharacter('é'))
        );
    }
}
