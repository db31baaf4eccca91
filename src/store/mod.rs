//! # Storage Layer
//!
//! The catalog keeps one flat record per book at the application level but
//! stores it normalized across six tables, the way the hosted backend it
//! was built against lays them out:
//!
//! ```text
//! books            scalar columns (title, author, year, summary, for_whom,
//!                  quote, cover_image, slug, id, created_at)
//! categories       shared dictionary (id, name), deduplicated by name
//! themes           shared dictionary (id, name), deduplicated by name
//! book_categories  link rows (book_id, category_id)
//! book_themes      link rows (book_id, theme_id)
//! key_takeaways    owned children (id, book_id, content), insertion order
//! ```
//!
//! Two pieces split the work:
//!
//! - [`backend::StorageBackend`] is the table-level contract: select with
//!   filters, insert-returning-row, update, delete-with-cascade, and the
//!   atomic dictionary upserts. It knows nothing about books as a whole.
//! - [`book_store::BookStore`] is the synchronization core on top: it owns
//!   slug uniqueness, dictionary reuse, the per-book read fan-out, and the
//!   association diff on edit.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production backend, one JSON file per
//!   table under a data directory, atomic tmp-then-rename writes.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem
//!   I/O, including write-error simulation.
//!
//! ## Storage Layout (FsBackend)
//!
//! ```text
//! <data-dir>/
//! ├── books.json
//! ├── categories.json
//! ├── themes.json
//! ├── book_categories.json
//! ├── book_themes.json
//! └── key_takeaways.json
//! ```

pub mod backend;
pub mod book_store;
pub mod fs_backend;
pub mod mem_backend;
pub mod rows;

pub use backend::StorageBackend;
pub use book_store::BookStore;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
