//! Row types for the relational shadow of [`crate::model::Book`].
//!
//! These are the shapes the backend stores and returns; nothing above the
//! storage layer should touch them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::BookDraft;

/// Scalar columns of the `books` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub summary: String,
    pub for_whom: String,
    pub quote: String,
    pub cover_image: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Insert/update shape for the `books` table.
///
/// The backend stamps `id` and `created_at` on insert and preserves them on
/// update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookRow {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub summary: String,
    pub for_whom: String,
    pub quote: String,
    pub cover_image: String,
    pub slug: String,
}

impl NewBookRow {
    /// Scalar projection of a draft. The placeholder cover is applied here,
    /// so an empty cover never reaches storage.
    pub fn from_draft(draft: &BookDraft) -> Self {
        Self {
            title: draft.title.clone(),
            author: draft.author.clone(),
            year: draft.year,
            summary: draft.summary.clone(),
            for_whom: draft.for_whom.clone(),
            quote: draft.quote.clone(),
            cover_image: draft.cover_or_placeholder(),
            slug: draft.slug.clone(),
        }
    }
}

/// A `categories` dictionary row, shared across books and deduplicated by
/// exact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
}

/// A `themes` dictionary row, same sharing rules as [`CategoryRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRow {
    pub id: Uuid,
    pub name: String,
}

/// Link row of the `book_categories` many-to-many table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCategoryRow {
    pub book_id: Uuid,
    pub category_id: Uuid,
}

/// Link row of the `book_themes` many-to-many table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookThemeRow {
    pub book_id: Uuid,
    pub theme_id: Uuid,
}

/// An owned child row of the `key_takeaways` table. Rows keep insertion
/// order within a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTakeawayRow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub content: String,
}
