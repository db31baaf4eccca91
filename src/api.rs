//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the
//! single entry point for all catalog operations, regardless of the view
//! layer consuming it.
//!
//! ## Snapshot Ownership
//!
//! [`Library`] owns the materialized book list explicitly: `open` performs
//! the initial fetch, every mutating call replaces the snapshot with the
//! one the command returned, and `refresh` re-queries on demand. There is
//! no hidden shared list state — what `books()` returns is exactly what
//! the last completed operation observed.
//!
//! ## Admin Gate
//!
//! The public read surface (`books`, `find_by_slug`, `find_by_category`,
//! `search`) is open. The mutating surface requires an [`AdminToken`],
//! obtained by exchanging the configured admin key through
//! [`Library::authorize`]. With no key configured, no token can be issued
//! and the catalog is read-only.
//!
//! ## Generic Over StorageBackend
//!
//! `Library<B: StorageBackend>` is generic over the storage backend:
//! - Production: `Library<FsBackend>`
//! - Testing: `Library<MemBackend>`

use uuid::Uuid;

use crate::catalog;
use crate::commands::{self, CmdResult};
use crate::config::CatalogConfig;
use crate::error::{Result, SumarioError};
use crate::model::{Book, BookDraft};
use crate::store::backend::StorageBackend;
use crate::store::book_store::BookStore;

/// Proof of admin authorization. Only [`Library::authorize`] constructs
/// one.
#[derive(Debug)]
pub struct AdminToken {
    _priv: (),
}

/// The main facade for the book-summary catalog.
pub struct Library<B: StorageBackend> {
    store: BookStore<B>,
    books: Vec<Book>,
    admin_key: Option<String>,
}

impl<B: StorageBackend> Library<B> {
    /// Wrap a backend and perform the initial catalog fetch.
    pub fn open(backend: B, config: &CatalogConfig) -> Result<Self> {
        let store = BookStore::with_backend(backend);
        let books = store.list()?;
        Ok(Self {
            store,
            books,
            admin_key: config.admin_key.clone(),
        })
    }

    /// Current snapshot, newest first. Replaced by every mutating call.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Re-fetch the snapshot from storage.
    pub fn refresh(&mut self) -> Result<&[Book]> {
        self.books = self.store.list()?;
        Ok(&self.books)
    }

    /// Exchange the configured admin key for a token gating the mutating
    /// operations.
    pub fn authorize(&self, key: &str) -> Result<AdminToken> {
        match self.admin_key.as_deref() {
            Some(expected) if expected == key => Ok(AdminToken { _priv: () }),
            _ => Err(SumarioError::Unauthorized),
        }
    }

    pub fn add(&mut self, _token: &AdminToken, draft: &BookDraft) -> Result<CmdResult> {
        let result = commands::add::run(&mut self.store, draft)?;
        self.books = result.books.clone();
        Ok(result)
    }

    pub fn edit(&mut self, _token: &AdminToken, id: Uuid, draft: &BookDraft) -> Result<CmdResult> {
        let result = commands::edit::run(&mut self.store, id, draft)?;
        self.books = result.books.clone();
        Ok(result)
    }

    pub fn delete(&mut self, _token: &AdminToken, id: Uuid) -> Result<CmdResult> {
        let result = commands::delete::run(&mut self.store, id)?;
        self.books = result.books.clone();
        Ok(result)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Book> {
        catalog::find_by_slug(&self.books, slug)
    }

    pub fn find_by_category(&self, category: &str) -> Vec<&Book> {
        catalog::find_by_category(&self.books, category)
    }

    pub fn search(&self, query: &str) -> Vec<&Book> {
        catalog::search(&self.books, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::sample_draft;

    fn admin_config() -> CatalogConfig {
        CatalogConfig {
            admin_key: Some("s3cret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn authorize_with_matching_key() {
        let library = Library::open(MemBackend::new(), &admin_config()).unwrap();
        assert!(library.authorize("s3cret").is_ok());
    }

    #[test]
    fn authorize_with_wrong_key_fails() {
        let library = Library::open(MemBackend::new(), &admin_config()).unwrap();
        assert!(matches!(
            library.authorize("wrong"),
            Err(SumarioError::Unauthorized)
        ));
    }

    #[test]
    fn no_configured_key_closes_the_admin_surface() {
        let library = Library::open(MemBackend::new(), &CatalogConfig::default()).unwrap();
        assert!(matches!(
            library.authorize(""),
            Err(SumarioError::Unauthorized)
        ));
    }

    #[test]
    fn mutations_refresh_the_snapshot() {
        let mut library = Library::open(MemBackend::new(), &admin_config()).unwrap();
        let token = library.authorize("s3cret").unwrap();

        assert!(library.books().is_empty());
        library
            .add(&token, &sample_draft("deep-work", "Deep Work"))
            .unwrap();
        assert_eq!(library.books().len(), 1);

        let id = library.books()[0].id;
        library.delete(&token, id).unwrap();
        assert!(library.books().is_empty());
    }

    #[test]
    fn queries_run_over_the_snapshot() {
        let mut library = Library::open(MemBackend::new(), &admin_config()).unwrap();
        let token = library.authorize("s3cret").unwrap();
        library
            .add(&token, &sample_draft("deep-work", "Deep Work"))
            .unwrap();

        assert!(library.find_by_slug("deep-work").is_some());
        assert_eq!(library.find_by_category("Negócios").len(), 1);
        assert_eq!(library.search("DEEP").len(), 1);
        assert!(library.search("").is_empty());
    }
}
