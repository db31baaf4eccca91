use uuid::Uuid;

use super::rows::{
    BookCategoryRow, BookRow, BookThemeRow, CategoryRow, KeyTakeawayRow, NewBookRow, ThemeRow,
};
use crate::error::Result;

/// Abstract interface for table-scoped storage I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`super::book_store::BookStore`] handles the "what" (slug uniqueness,
/// dictionary reuse, association reconciliation). Implementations expose
/// plain table operations and two integrity guarantees:
///
/// - `delete_book` cascades to link rows and key takeaways, like a foreign
///   key with `ON DELETE CASCADE`.
/// - `upsert_*` and `replace_takeaways` are atomic with respect to the
///   backend: callers never observe a half-applied dictionary row or
///   takeaway set.
pub trait StorageBackend {
    // --- books table ---

    /// All book rows, newest `created_at` first. Rows created in the same
    /// instant order newest-insert first.
    fn select_books(&self) -> Result<Vec<BookRow>>;

    /// Row with an exact slug match, skipping `exclude_id` when given
    /// (the exclude-self filter of the edit pre-check).
    fn select_book_by_slug(&self, slug: &str, exclude_id: Option<Uuid>)
        -> Result<Option<BookRow>>;

    /// Insert the scalar row, returning it with `id` and `created_at`
    /// stamped.
    fn insert_book(&self, new: &NewBookRow) -> Result<BookRow>;

    /// Update the scalar columns of an existing row. `id` and `created_at`
    /// are preserved. Fails with `BookNotFound` when the row is gone.
    fn update_book(&self, id: Uuid, new: &NewBookRow) -> Result<BookRow>;

    /// Delete the scalar row and cascade to link rows and key takeaways.
    /// Fails with `BookNotFound` when the row is gone.
    fn delete_book(&self, id: Uuid) -> Result<()>;

    // --- dictionary tables ---

    /// Look up a category by exact name, creating it if absent. Never
    /// duplicates a name.
    fn upsert_category(&self, name: &str) -> Result<CategoryRow>;

    /// Category row by id. `Ok(None)` when absent (dangling-link
    /// detection), `Err` only on actual storage failures.
    fn select_category(&self, id: Uuid) -> Result<Option<CategoryRow>>;

    /// Theme counterpart of [`StorageBackend::upsert_category`].
    fn upsert_theme(&self, name: &str) -> Result<ThemeRow>;

    /// Theme counterpart of [`StorageBackend::select_category`].
    fn select_theme(&self, id: Uuid) -> Result<Option<ThemeRow>>;

    // --- link tables ---

    fn select_book_categories(&self, book_id: Uuid) -> Result<Vec<BookCategoryRow>>;

    fn insert_book_category(&self, book_id: Uuid, category_id: Uuid) -> Result<()>;

    fn delete_book_category(&self, book_id: Uuid, category_id: Uuid) -> Result<()>;

    fn select_book_themes(&self, book_id: Uuid) -> Result<Vec<BookThemeRow>>;

    fn insert_book_theme(&self, book_id: Uuid, theme_id: Uuid) -> Result<()>;

    fn delete_book_theme(&self, book_id: Uuid, theme_id: Uuid) -> Result<()>;

    // --- key_takeaways table ---

    /// Takeaways of a book in insertion order.
    fn select_takeaways(&self, book_id: Uuid) -> Result<Vec<KeyTakeawayRow>>;

    /// Replace a book's takeaways wholesale. Atomic with respect to the
    /// backend: readers see either the old set or the new set.
    fn replace_takeaways(&self, book_id: Uuid, contents: &[String]) -> Result<()>;
}
