//! # Domain Model
//!
//! The application works with a single flat record, [`Book`], even though
//! storage keeps it normalized across six tables. The storage layer owns the
//! fan-out/fan-in between the two shapes; everything above it (queries,
//! commands, view layers) only ever sees [`Book`].
//!
//! [`BookDraft`] is the admin-form input: a [`Book`] minus the fields the
//! storage layer assigns (`id`, `created_at`). Drafts are validated by
//! [`crate::validation`] before they reach storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cover reference used when a draft leaves the cover empty.
pub const PLACEHOLDER_COVER: &str = "/placeholder.svg";

/// Category pick list offered by the admin form. Storage stays free-form:
/// books may carry categories outside this list.
pub const SUGGESTED_CATEGORIES: [&str; 6] = [
    "Negócios",
    "Produtividade",
    "Psicologia",
    "Filosofia",
    "Liderança",
    "Saúde",
];

/// A fully materialized book summary.
///
/// `categories` and `themes` carry no ordering guarantee; `key_takeaways`
/// preserve storage insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub categories: Vec<String>,
    pub themes: Vec<String>,
    pub summary: String,
    pub key_takeaways: Vec<String>,
    pub for_whom: String,
    pub quote: String,
    pub cover_image: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Exact, case-sensitive category membership.
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }
}

/// Admin-form input for creating or editing a book.
///
/// Identifier and creation timestamp are assigned by the storage layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub categories: Vec<String>,
    pub themes: Vec<String>,
    pub summary: String,
    pub key_takeaways: Vec<String>,
    pub for_whom: String,
    pub quote: String,
    #[serde(default)]
    pub cover_image: String,
    pub slug: String,
}

impl BookDraft {
    /// Cover reference with the form's placeholder default applied.
    pub fn cover_or_placeholder(&self) -> String {
        if self.cover_image.trim().is_empty() {
            PLACEHOLDER_COVER.to_string()
        } else {
            self.cover_image.clone()
        }
    }
}
