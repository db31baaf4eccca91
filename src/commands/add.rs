use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::BookDraft;
use crate::store::backend::StorageBackend;
use crate::store::book_store::BookStore;
use crate::validation;

pub fn run<B: StorageBackend>(store: &mut BookStore<B>, draft: &BookDraft) -> Result<CmdResult> {
    // Field-scoped failures stop the draft here; the repository never
    // sees an invalid one.
    validation::validate(draft)?;

    let book = store.add(draft)?;
    let books = store.list()?;

    let mut result = CmdResult::default().with_books(books);
    result.add_message(CmdMessage::success(format!("Book added: {}", book.title)));
    result.affected = Some(book);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SumarioError;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::sample_draft;

    #[test]
    fn adds_and_returns_fresh_snapshot() {
        let mut store = BookStore::with_backend(MemBackend::new());
        let result = run(&mut store, &sample_draft("deep-work", "Deep Work")).unwrap();

        assert_eq!(result.books.len(), 1);
        assert_eq!(result.affected.as_ref().unwrap().slug, "deep-work");
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("Deep Work")));
    }

    #[test]
    fn invalid_draft_never_reaches_storage() {
        let mut store = BookStore::with_backend(MemBackend::new());
        let mut draft = sample_draft("deep-work", "Deep Work");
        draft.summary = "short".to_string();

        let err = run(&mut store, &draft).unwrap_err();
        match err {
            SumarioError::Validation(errors) => {
                assert!(errors.field("summary").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn duplicate_slug_surfaces_as_error() {
        let mut store = BookStore::with_backend(MemBackend::new());
        run(&mut store, &sample_draft("deep-work", "Deep Work")).unwrap();

        let err = run(&mut store, &sample_draft("deep-work", "Other")).unwrap_err();
        assert!(matches!(err, SumarioError::DuplicateSlug(_)));
    }
}
