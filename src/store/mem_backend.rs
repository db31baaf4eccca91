use std::cell::RefCell;

use chrono::Utc;
use uuid::Uuid;

use super::backend::StorageBackend;
use super::rows::{
    BookCategoryRow, BookRow, BookThemeRow, CategoryRow, KeyTakeawayRow, NewBookRow, ThemeRow,
};
use crate::error::{Result, SumarioError};

#[derive(Default)]
struct Tables {
    books: Vec<BookRow>,
    categories: Vec<CategoryRow>,
    themes: Vec<ThemeRow>,
    book_categories: Vec<BookCategoryRow>,
    book_themes: Vec<BookThemeRow>,
    key_takeaways: Vec<KeyTakeawayRow>,
}

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the catalog core is
/// single-threaded. This keeps the `StorageBackend` trait on `&self`
/// without the overhead of a lock.
#[derive(Default)]
pub struct MemBackend {
    tables: RefCell<Tables>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    fn check_write(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(SumarioError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn select_books(&self) -> Result<Vec<BookRow>> {
        let tables = self.tables.borrow();
        let mut rows: Vec<(usize, BookRow)> = tables.books.iter().cloned().enumerate().collect();
        rows.sort_by(|(pos_a, a), (pos_b, b)| {
            b.created_at.cmp(&a.created_at).then(pos_b.cmp(pos_a))
        });
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    fn select_book_by_slug(
        &self,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<BookRow>> {
        let tables = self.tables.borrow();
        Ok(tables
            .books
            .iter()
            .find(|b| b.slug == slug && Some(b.id) != exclude_id)
            .cloned())
    }

    fn insert_book(&self, new: &NewBookRow) -> Result<BookRow> {
        self.check_write()?;
        let row = BookRow {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            author: new.author.clone(),
            year: new.year,
            summary: new.summary.clone(),
            for_whom: new.for_whom.clone(),
            quote: new.quote.clone(),
            cover_image: new.cover_image.clone(),
            slug: new.slug.clone(),
            created_at: Utc::now(),
        };
        self.tables.borrow_mut().books.push(row.clone());
        Ok(row)
    }

    fn update_book(&self, id: Uuid, new: &NewBookRow) -> Result<BookRow> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        let row = tables
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(SumarioError::BookNotFound(id))?;
        row.title = new.title.clone();
        row.author = new.author.clone();
        row.year = new.year;
        row.summary = new.summary.clone();
        row.for_whom = new.for_whom.clone();
        row.quote = new.quote.clone();
        row.cover_image = new.cover_image.clone();
        row.slug = new.slug.clone();
        Ok(row.clone())
    }

    fn delete_book(&self, id: Uuid) -> Result<()> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        if tables.books.len() == before {
            return Err(SumarioError::BookNotFound(id));
        }
        // Cascade, mirroring the store's foreign-key behavior.
        tables.book_categories.retain(|l| l.book_id != id);
        tables.book_themes.retain(|l| l.book_id != id);
        tables.key_takeaways.retain(|k| k.book_id != id);
        Ok(())
    }

    fn upsert_category(&self, name: &str) -> Result<CategoryRow> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        if let Some(row) = tables.categories.iter().find(|c| c.name == name).cloned() {
            return Ok(row);
        }
        let row = CategoryRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        tables.categories.push(row.clone());
        Ok(row)
    }

    fn select_category(&self, id: Uuid) -> Result<Option<CategoryRow>> {
        let tables = self.tables.borrow();
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    fn upsert_theme(&self, name: &str) -> Result<ThemeRow> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        if let Some(row) = tables.themes.iter().find(|t| t.name == name).cloned() {
            return Ok(row);
        }
        let row = ThemeRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        tables.themes.push(row.clone());
        Ok(row)
    }

    fn select_theme(&self, id: Uuid) -> Result<Option<ThemeRow>> {
        let tables = self.tables.borrow();
        Ok(tables.themes.iter().find(|t| t.id == id).cloned())
    }

    fn select_book_categories(&self, book_id: Uuid) -> Result<Vec<BookCategoryRow>> {
        let tables = self.tables.borrow();
        Ok(tables
            .book_categories
            .iter()
            .filter(|l| l.book_id == book_id)
            .cloned()
            .collect())
    }

    fn insert_book_category(&self, book_id: Uuid, category_id: Uuid) -> Result<()> {
        self.check_write()?;
        self.tables
            .borrow_mut()
            .book_categories
            .push(BookCategoryRow {
                book_id,
                category_id,
            });
        Ok(())
    }

    fn delete_book_category(&self, book_id: Uuid, category_id: Uuid) -> Result<()> {
        self.check_write()?;
        self.tables
            .borrow_mut()
            .book_categories
            .retain(|l| !(l.book_id == book_id && l.category_id == category_id));
        Ok(())
    }

    fn select_book_themes(&self, book_id: Uuid) -> Result<Vec<BookThemeRow>> {
        let tables = self.tables.borrow();
        Ok(tables
            .book_themes
            .iter()
            .filter(|l| l.book_id == book_id)
            .cloned()
            .collect())
    }

    fn insert_book_theme(&self, book_id: Uuid, theme_id: Uuid) -> Result<()> {
        self.check_write()?;
        self.tables
            .borrow_mut()
            .book_themes
            .push(BookThemeRow { book_id, theme_id });
        Ok(())
    }

    fn delete_book_theme(&self, book_id: Uuid, theme_id: Uuid) -> Result<()> {
        self.check_write()?;
        self.tables
            .borrow_mut()
            .book_themes
            .retain(|l| !(l.book_id == book_id && l.theme_id == theme_id));
        Ok(())
    }

    fn select_takeaways(&self, book_id: Uuid) -> Result<Vec<KeyTakeawayRow>> {
        let tables = self.tables.borrow();
        Ok(tables
            .key_takeaways
            .iter()
            .filter(|k| k.book_id == book_id)
            .cloned()
            .collect())
    }

    fn replace_takeaways(&self, book_id: Uuid, contents: &[String]) -> Result<()> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        tables.key_takeaways.retain(|k| k.book_id != book_id);
        for content in contents {
            tables.key_takeaways.push(KeyTakeawayRow {
                id: Uuid::new_v4(),
                book_id,
                content: content.clone(),
            });
        }
        Ok(())
    }
}
