//! # Command Layer
//!
//! One module per catalog operation. Commands are where the operation
//! contract lives:
//!
//! - Drafts are validated here, before any storage call — a draft that
//!   fails validation never reaches the repository.
//! - Every mutating command re-fetches the full catalog afterwards and
//!   returns it in the [`CmdResult`], so the caller always observes the
//!   committed state without keeping hidden shared state.
//! - Outcomes carry leveled [`CmdMessage`]s the view layer can surface
//!   directly (toasts, banners); failures surface as typed errors whose
//!   `Display` is the human-readable message. Nothing here panics.
//!
//! Commands are UI-agnostic: no stdout, no terminal assumptions, no
//! authorization (the API facade gates admin access before dispatching
//! here).

use serde::Serialize;

use crate::model::Book;

pub mod add;
pub mod delete;
pub mod edit;
pub mod list;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Post-operation snapshot of the whole catalog, newest first.
    pub books: Vec<Book>,
    /// The book the operation created or updated, if any.
    pub affected: Option<Book>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }

    pub fn with_affected(mut self, book: Book) -> Self {
        self.affected = Some(book);
        self
    }
}
