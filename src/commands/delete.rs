use uuid::Uuid;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::book_store::BookStore;

pub fn run<B: StorageBackend>(store: &mut BookStore<B>, id: Uuid) -> Result<CmdResult> {
    store.delete(id)?;
    let books = store.list()?;

    let mut result = CmdResult::default().with_books(books);
    result.add_message(CmdMessage::success("Book deleted"));
    Ok(result)
}
