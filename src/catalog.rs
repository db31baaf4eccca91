//! Pure queries over a materialized book list.
//!
//! No I/O happens here; callers pass the snapshot they already hold
//! (usually [`crate::api::Library::books`]) and get borrowed results back.

use crate::model::Book;

/// The book with an exactly matching slug. Absence is a valid outcome,
/// not an error; slugs are unique so there is never more than one match.
pub fn find_by_slug<'a>(books: &'a [Book], slug: &str) -> Option<&'a Book> {
    books.iter().find(|b| b.slug == slug)
}

/// All books whose category set contains `category`, by exact,
/// case-sensitive match against the stored names.
pub fn find_by_category<'a>(books: &'a [Book], category: &str) -> Vec<&'a Book> {
    books.iter().filter(|b| b.has_category(category)).collect()
}

/// Case-insensitive substring search over title, author, theme names, and
/// category names. An empty query returns the empty set by contract;
/// callers gate on non-empty input.
pub fn search<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();
    books
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&query)
                || b.author.to_lowercase().contains(&query)
                || b.themes.iter().any(|t| t.to_lowercase().contains(&query))
                || b.categories
                    .iter()
                    .any(|c| c.to_lowercase().contains(&query))
        })
        .collect()
}
