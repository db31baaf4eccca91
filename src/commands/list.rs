use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::book_store::BookStore;

pub fn run<B: StorageBackend>(store: &BookStore<B>) -> Result<CmdResult> {
    let books = store.list()?;
    Ok(CmdResult::default().with_books(books))
}
