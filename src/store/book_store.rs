use uuid::Uuid;

use super::backend::StorageBackend;
use super::rows::{BookRow, NewBookRow};
use crate::error::{Result, SumarioError};
use crate::model::{Book, BookDraft};

/// The synchronization core: maps between the flat [`Book`] shape and the
/// normalized tables, hiding the fan-out/fan-in from the rest of the
/// system.
///
/// Guarantees owned here (the backend only provides table CRUD):
/// - Slug uniqueness, checked before any row is written.
/// - Dictionary reuse: a category or theme name always resolves to a
///   single shared row.
/// - Association reconciliation on edit: additions and removals are
///   computed against the current link set, so links that survive an edit
///   are never dropped and re-created.
///
/// The multi-step add/edit sequences are not wrapped in a cross-call
/// transaction; a failure between steps leaves the earlier steps
/// committed.
pub struct BookStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> BookStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// All books, newest-created first, each reconstructed from its scalar
    /// row plus category links, theme links, and takeaways.
    pub fn list(&self) -> Result<Vec<Book>> {
        let rows = self.backend.select_books()?;
        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            books.push(self.materialize(row)?);
        }
        Ok(books)
    }

    /// Create a book from a validated draft.
    ///
    /// The duplicate-slug check runs before any insert, so a rejected add
    /// leaves storage untouched.
    pub fn add(&mut self, draft: &BookDraft) -> Result<Book> {
        if self
            .backend
            .select_book_by_slug(&draft.slug, None)?
            .is_some()
        {
            return Err(SumarioError::DuplicateSlug(draft.slug.clone()));
        }

        tracing::debug!(slug = %draft.slug, "inserting book");
        let row = self.backend.insert_book(&NewBookRow::from_draft(draft))?;

        for name in dedup_names(&draft.categories) {
            let category = self.backend.upsert_category(name)?;
            self.backend.insert_book_category(row.id, category.id)?;
        }
        for name in dedup_names(&draft.themes) {
            let theme = self.backend.upsert_theme(name)?;
            self.backend.insert_book_theme(row.id, theme.id)?;
        }
        self.backend.replace_takeaways(row.id, &draft.key_takeaways)?;

        tracing::info!(slug = %draft.slug, id = %row.id, "book added");
        self.materialize(row)
    }

    /// Update a book from a validated draft. The draft fully describes the
    /// target state; associations end up exactly as the draft lists them.
    pub fn edit(&mut self, id: Uuid, draft: &BookDraft) -> Result<Book> {
        if self
            .backend
            .select_book_by_slug(&draft.slug, Some(id))?
            .is_some()
        {
            return Err(SumarioError::DuplicateSlug(draft.slug.clone()));
        }

        let row = self.backend.update_book(id, &NewBookRow::from_draft(draft))?;
        self.reconcile_categories(id, &draft.categories)?;
        self.reconcile_themes(id, &draft.themes)?;
        self.backend.replace_takeaways(id, &draft.key_takeaways)?;

        tracing::info!(slug = %draft.slug, %id, "book updated");
        self.materialize(row)
    }

    /// Delete a book. Link rows and takeaways go with it (backend
    /// cascade).
    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        self.backend.delete_book(id)?;
        tracing::info!(%id, "book deleted");
        Ok(())
    }

    /// Fan-in: scalar row plus resolved association names. A link whose
    /// dictionary row is missing keeps its slot as an empty name instead
    /// of failing the whole record.
    fn materialize(&self, row: BookRow) -> Result<Book> {
        let mut categories = Vec::new();
        for link in self.backend.select_book_categories(row.id)? {
            let name = self
                .backend
                .select_category(link.category_id)?
                .map(|c| c.name)
                .unwrap_or_default();
            categories.push(name);
        }

        let mut themes = Vec::new();
        for link in self.backend.select_book_themes(row.id)? {
            let name = self
                .backend
                .select_theme(link.theme_id)?
                .map(|t| t.name)
                .unwrap_or_default();
            themes.push(name);
        }

        let key_takeaways = self
            .backend
            .select_takeaways(row.id)?
            .into_iter()
            .map(|k| k.content)
            .collect();

        Ok(Book {
            id: row.id,
            title: row.title,
            author: row.author,
            year: row.year,
            categories,
            themes,
            summary: row.summary,
            key_takeaways,
            for_whom: row.for_whom,
            quote: row.quote,
            cover_image: row.cover_image,
            slug: row.slug,
            created_at: row.created_at,
        })
    }

    /// Diff the current category links against the desired names: remove
    /// links the draft no longer lists, add the missing ones. Links the
    /// draft keeps are never touched, so there is no window where the book
    /// has zero associations.
    fn reconcile_categories(&mut self, book_id: Uuid, desired: &[String]) -> Result<()> {
        let desired = dedup_names(desired);

        let mut current: Vec<(Uuid, Option<String>)> = Vec::new();
        for link in self.backend.select_book_categories(book_id)? {
            let name = self.backend.select_category(link.category_id)?.map(|c| c.name);
            current.push((link.category_id, name));
        }

        for (category_id, name) in &current {
            let keep = name.as_deref().map(|n| desired.contains(&n)).unwrap_or(false);
            if !keep {
                if name.is_none() {
                    tracing::warn!(%book_id, %category_id, "dropping dangling category link");
                }
                self.backend.delete_book_category(book_id, *category_id)?;
            }
        }

        let current_names: Vec<&str> =
            current.iter().filter_map(|(_, n)| n.as_deref()).collect();
        for name in desired {
            if !current_names.contains(&name) {
                let category = self.backend.upsert_category(name)?;
                self.backend.insert_book_category(book_id, category.id)?;
            }
        }

        Ok(())
    }

    /// Theme counterpart of [`BookStore::reconcile_categories`].
    fn reconcile_themes(&mut self, book_id: Uuid, desired: &[String]) -> Result<()> {
        let desired = dedup_names(desired);

        let mut current: Vec<(Uuid, Option<String>)> = Vec::new();
        for link in self.backend.select_book_themes(book_id)? {
            let name = self.backend.select_theme(link.theme_id)?.map(|t| t.name);
            current.push((link.theme_id, name));
        }

        for (theme_id, name) in &current {
            let keep = name.as_deref().map(|n| desired.contains(&n)).unwrap_or(false);
            if !keep {
                if name.is_none() {
                    tracing::warn!(%book_id, %theme_id, "dropping dangling theme link");
                }
                self.backend.delete_book_theme(book_id, *theme_id)?;
            }
        }

        let current_names: Vec<&str> =
            current.iter().filter_map(|(_, n)| n.as_deref()).collect();
        for name in desired {
            if !current_names.contains(&name) {
                let theme = self.backend.upsert_theme(name)?;
                self.backend.insert_book_theme(book_id, theme.id)?;
            }
        }

        Ok(())
    }
}

/// Order-preserving dedup. Drafts are free to repeat a name; storage gets
/// one link per name.
fn dedup_names(names: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for name in names {
        let name = name.as_str();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::sample_draft;

    fn make_store() -> BookStore<MemBackend> {
        BookStore::with_backend(MemBackend::new())
    }

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    // --- Round-trip ---

    #[test]
    fn add_then_list_round_trips_all_fields() {
        let mut store = make_store();
        let draft = sample_draft("deep-work", "Deep Work");
        store.add(&draft).unwrap();

        let books = store.list().unwrap();
        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.title, draft.title);
        assert_eq!(book.author, draft.author);
        assert_eq!(book.year, draft.year);
        assert_eq!(book.summary, draft.summary);
        assert_eq!(book.for_whom, draft.for_whom);
        assert_eq!(book.quote, draft.quote);
        assert_eq!(book.slug, "deep-work");
        assert_eq!(
            sorted(book.categories.clone()),
            sorted(draft.categories.clone())
        );
        assert_eq!(sorted(book.themes.clone()), sorted(draft.themes.clone()));
        // Takeaways keep their order, unlike the association sets.
        assert_eq!(book.key_takeaways, draft.key_takeaways);
    }

    #[test]
    fn list_orders_newest_first() {
        let mut store = make_store();
        store.add(&sample_draft("first-book", "First")).unwrap();
        store.add(&sample_draft("second-book", "Second")).unwrap();

        let books = store.list().unwrap();
        assert_eq!(books[0].slug, "second-book");
        assert_eq!(books[1].slug, "first-book");
    }

    #[test]
    fn empty_cover_is_stored_as_placeholder() {
        let mut store = make_store();
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.cover_image = String::new();
        let book = store.add(&draft).unwrap();
        assert_eq!(book.cover_image, crate::model::PLACEHOLDER_COVER);
    }

    // --- Slug uniqueness ---

    #[test]
    fn duplicate_slug_fails_before_any_write() {
        let mut store = make_store();
        store.add(&sample_draft("example-book", "Example Book")).unwrap();

        let mut second = sample_draft("example-book", "Another Title");
        second.categories = vec!["Filosofia".to_string()];
        let err = store.add(&second).unwrap_err();
        assert!(matches!(err, SumarioError::DuplicateSlug(ref s) if s == "example-book"));

        // Nothing from the rejected add reached storage: one scalar row,
        // and the dictionary never saw the second draft's category.
        let books = store.list().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Example Book");
        let rows = store.backend.select_books().unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn edit_keeping_own_slug_succeeds() {
        let mut store = make_store();
        let book = store.add(&sample_draft("deep-work", "Deep Work")).unwrap();

        let mut draft = sample_draft("deep-work", "Deep Work, Second Edition");
        draft.year = 2020;
        let updated = store.edit(book.id, &draft).unwrap();
        assert_eq!(updated.title, "Deep Work, Second Edition");
        assert_eq!(updated.year, 2020);
    }

    #[test]
    fn edit_to_another_books_slug_fails() {
        let mut store = make_store();
        store.add(&sample_draft("deep-work", "Deep Work")).unwrap();
        let other = store.add(&sample_draft("mindset", "Mindset")).unwrap();

        let draft = sample_draft("deep-work", "Mindset");
        let err = store.edit(other.id, &draft).unwrap_err();
        assert!(matches!(err, SumarioError::DuplicateSlug(_)));
    }

    // --- Association replacement ---

    #[test]
    fn edit_replaces_associations_exactly() {
        let mut store = make_store();
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.categories = vec!["Produtividade".to_string(), "Negócios".to_string()];
        draft.themes = vec!["Foco".to_string(), "Concentração".to_string()];
        let book = store.add(&draft).unwrap();

        let mut edited = draft.clone();
        edited.categories = vec!["Produtividade".to_string(), "Psicologia".to_string()];
        edited.themes = vec!["Hábitos".to_string()];
        edited.key_takeaways = vec![
            "New takeaway one".to_string(),
            "New takeaway two".to_string(),
            "New takeaway three".to_string(),
        ];
        store.edit(book.id, &edited).unwrap();

        let books = store.list().unwrap();
        let book = &books[0];
        assert_eq!(
            sorted(book.categories.clone()),
            vec!["Produtividade".to_string(), "Psicologia".to_string()]
        );
        assert_eq!(book.themes, vec!["Hábitos".to_string()]);
        assert_eq!(book.key_takeaways, edited.key_takeaways);
    }

    #[test]
    fn edit_keeps_surviving_links_in_place() {
        let mut store = make_store();
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.categories = vec!["Produtividade".to_string(), "Negócios".to_string()];
        let book = store.add(&draft).unwrap();

        let links_before = store.backend.select_book_categories(book.id).unwrap();
        let kept_id = links_before
            .iter()
            .map(|l| l.category_id)
            .find(|id| {
                store.backend.select_category(*id).unwrap().unwrap().name == "Produtividade"
            })
            .unwrap();

        let mut edited = draft.clone();
        edited.categories = vec!["Produtividade".to_string(), "Psicologia".to_string()];
        store.edit(book.id, &edited).unwrap();

        let links_after = store.backend.select_book_categories(book.id).unwrap();
        assert_eq!(links_after.len(), 2);
        assert!(links_after.iter().any(|l| l.category_id == kept_id));
    }

    #[test]
    fn edit_missing_book_fails() {
        let mut store = make_store();
        let err = store
            .edit(Uuid::new_v4(), &sample_draft("deep-work", "Deep Work"))
            .unwrap_err();
        assert!(matches!(err, SumarioError::BookNotFound(_)));
    }

    // --- Dictionary sharing ---

    #[test]
    fn same_category_name_resolves_to_one_dictionary_row() {
        let mut store = make_store();
        let first = store.add(&sample_draft("first-book", "First")).unwrap();
        let second = store.add(&sample_draft("second-book", "Second")).unwrap();

        let first_links = store.backend.select_book_categories(first.id).unwrap();
        let second_links = store.backend.select_book_categories(second.id).unwrap();
        assert_eq!(first_links.len(), 1);
        assert_eq!(second_links.len(), 1);
        assert_eq!(first_links[0].category_id, second_links[0].category_id);
    }

    #[test]
    fn repeated_names_in_draft_produce_one_link() {
        let mut store = make_store();
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.categories = vec!["Negócios".to_string(), "Negócios".to_string()];
        let book = store.add(&draft).unwrap();

        let links = store.backend.select_book_categories(book.id).unwrap();
        assert_eq!(links.len(), 1);
    }

    // --- Deletion ---

    #[test]
    fn delete_removes_book_and_children() {
        let mut store = make_store();
        let book = store.add(&sample_draft("deep-work", "Deep Work")).unwrap();
        store.delete(book.id).unwrap();

        assert!(store.list().unwrap().is_empty());
        assert!(store.backend.select_takeaways(book.id).unwrap().is_empty());
        assert!(store
            .backend
            .select_book_categories(book.id)
            .unwrap()
            .is_empty());
        assert!(store.backend.select_book_themes(book.id).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_book_fails() {
        let mut store = make_store();
        let err = store.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, SumarioError::BookNotFound(_)));
    }

    // --- Degraded reads ---

    #[test]
    fn dangling_link_degrades_to_empty_name() {
        let mut store = make_store();
        let book = store.add(&sample_draft("deep-work", "Deep Work")).unwrap();

        // Link row pointing at a dictionary row that does not exist.
        store
            .backend
            .insert_book_category(book.id, Uuid::new_v4())
            .unwrap();

        let books = store.list().unwrap();
        assert_eq!(books[0].categories.len(), 2);
        assert!(books[0].categories.iter().any(|c| c.is_empty()));
    }

    // --- Error handling ---

    #[test]
    fn backend_write_failure_surfaces_as_store_error() {
        let mut store = make_store();
        store.backend.set_simulate_write_error(true);

        let err = store.add(&sample_draft("deep-work", "Deep Work")).unwrap_err();
        assert!(matches!(err, SumarioError::Store(_)));
        store.backend.set_simulate_write_error(false);
        assert!(store.list().unwrap().is_empty());
    }

    // --- End-to-end scenario ---

    #[test]
    fn example_book_scenario() {
        let mut store = make_store();
        let mut draft = sample_draft("example-book", "Example Book");
        draft.categories = vec!["Negócios".to_string()];
        draft.themes = vec!["Foco".to_string()];
        store.add(&draft).unwrap();

        let books = store.list().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].slug, "example-book");
        assert_eq!(books[0].categories, vec!["Negócios".to_string()]);
        assert_eq!(books[0].themes, vec!["Foco".to_string()]);
        assert_eq!(books[0].key_takeaways.len(), 3);

        let err = store.add(&draft).unwrap_err();
        assert!(matches!(err, SumarioError::DuplicateSlug(_)));
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
