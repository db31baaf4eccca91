use uuid::Uuid;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::BookDraft;
use crate::store::backend::StorageBackend;
use crate::store::book_store::BookStore;
use crate::validation;

pub fn run<B: StorageBackend>(
    store: &mut BookStore<B>,
    id: Uuid,
    draft: &BookDraft,
) -> Result<CmdResult> {
    validation::validate(draft)?;

    let book = store.edit(id, draft)?;
    let books = store.list()?;

    let mut result = CmdResult::default().with_books(books);
    result.add_message(CmdMessage::success(format!("Book updated: {}", book.title)));
    result.affected = Some(book);
    Ok(result)
}
