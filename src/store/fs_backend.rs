use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::backend::StorageBackend;
use super::rows::{
    BookCategoryRow, BookRow, BookThemeRow, CategoryRow, KeyTakeawayRow, NewBookRow, ThemeRow,
};
use crate::error::{Result, SumarioError};

const BOOKS: &str = "books";
const CATEGORIES: &str = "categories";
const THEMES: &str = "themes";
const BOOK_CATEGORIES: &str = "book_categories";
const BOOK_THEMES: &str = "book_themes";
const KEY_TAKEAWAYS: &str = "key_takeaways";

/// Filesystem storage backend: one JSON file per table under a data
/// directory.
///
/// Every write goes through a tmp-then-rename cycle so a crash mid-write
/// leaves the previous table contents intact. A missing table file reads
/// as an empty table.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{}.json", table))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(SumarioError::Io)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(SumarioError::Io)?;
        serde_json::from_str(&content).map_err(SumarioError::Serialization)
    }

    fn save<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(rows).map_err(SumarioError::Serialization)?;

        // Atomic write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", table, Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(SumarioError::Io)?;
        fs::rename(&tmp_path, self.table_path(table)).map_err(SumarioError::Io)?;

        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn select_books(&self) -> Result<Vec<BookRow>> {
        let mut rows: Vec<(usize, BookRow)> = self
            .load::<BookRow>(BOOKS)?
            .into_iter()
            .enumerate()
            .collect();
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
        let books: Vec<BookRow> = self.load(BOOKS)?;
        Ok(books
            .into_iter()
            .find(|b| b.slug == slug && Some(b.id) != exclude_id))
    }

    fn insert_book(&self, new: &NewBookRow) -> Result<BookRow> {
        let mut books: Vec<BookRow> = self.load(BOOKS)?;
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
        books.push(row.clone());
        self.save(BOOKS, &books)?;
        Ok(row)
    }

    fn update_book(&self, id: Uuid, new: &NewBookRow) -> Result<BookRow> {
        let mut books: Vec<BookRow> = self.load(BOOKS)?;
        let row = books
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
        let updated = row.clone();
        self.save(BOOKS, &books)?;
        Ok(updated)
    }

    fn delete_book(&self, id: Uuid) -> Result<()> {
        let mut books: Vec<BookRow> = self.load(BOOKS)?;
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Err(SumarioError::BookNotFound(id));
        }
        self.save(BOOKS, &books)?;

        // Cascade, mirroring the store's foreign-key behavior.
        let mut links: Vec<BookCategoryRow> = self.load(BOOK_CATEGORIES)?;
        links.retain(|l| l.book_id != id);
        self.save(BOOK_CATEGORIES, &links)?;

        let mut links: Vec<BookThemeRow> = self.load(BOOK_THEMES)?;
        links.retain(|l| l.book_id != id);
        self.save(BOOK_THEMES, &links)?;

        let mut takeaways: Vec<KeyTakeawayRow> = self.load(KEY_TAKEAWAYS)?;
        takeaways.retain(|k| k.book_id != id);
        self.save(KEY_TAKEAWAYS, &takeaways)?;

        Ok(())
    }

    fn upsert_category(&self, name: &str) -> Result<CategoryRow> {
        let mut categories: Vec<CategoryRow> = self.load(CATEGORIES)?;
        if let Some(row) = categories.iter().find(|c| c.name == name) {
            return Ok(row.clone());
        }
        let row = CategoryRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        categories.push(row.clone());
        self.save(CATEGORIES, &categories)?;
        Ok(row)
    }

    fn select_category(&self, id: Uuid) -> Result<Option<CategoryRow>> {
        let categories: Vec<CategoryRow> = self.load(CATEGORIES)?;
        Ok(categories.into_iter().find(|c| c.id == id))
    }

    fn upsert_theme(&self, name: &str) -> Result<ThemeRow> {
        let mut themes: Vec<ThemeRow> = self.load(THEMES)?;
        if let Some(row) = themes.iter().find(|t| t.name == name) {
            return Ok(row.clone());
        }
        let row = ThemeRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        themes.push(row.clone());
        self.save(THEMES, &themes)?;
        Ok(row)
    }

    fn select_theme(&self, id: Uuid) -> Result<Option<ThemeRow>> {
        let themes: Vec<ThemeRow> = self.load(THEMES)?;
        Ok(themes.into_iter().find(|t| t.id == id))
    }

    fn select_book_categories(&self, book_id: Uuid) -> Result<Vec<BookCategoryRow>> {
        let links: Vec<BookCategoryRow> = self.load(BOOK_CATEGORIES)?;
        Ok(links.into_iter().filter(|l| l.book_id == book_id).collect())
    }

    fn insert_book_category(&self, book_id: Uuid, category_id: Uuid) -> Result<()> {
        let mut links: Vec<BookCategoryRow> = self.load(BOOK_CATEGORIES)?;
        links.push(BookCategoryRow {
            book_id,
            category_id,
        });
        self.save(BOOK_CATEGORIES, &links)
    }

    fn delete_book_category(&self, book_id: Uuid, category_id: Uuid) -> Result<()> {
        let mut links: Vec<BookCategoryRow> = self.load(BOOK_CATEGORIES)?;
        links.retain(|l| !(l.book_id == book_id && l.category_id == category_id));
        self.save(BOOK_CATEGORIES, &links)
    }

    fn select_book_themes(&self, book_id: Uuid) -> Result<Vec<BookThemeRow>> {
        let links: Vec<BookThemeRow> = self.load(BOOK_THEMES)?;
        Ok(links.into_iter().filter(|l| l.book_id == book_id).collect())
    }

    fn insert_book_theme(&self, book_id: Uuid, theme_id: Uuid) -> Result<()> {
        let mut links: Vec<BookThemeRow> = self.load(BOOK_THEMES)?;
        links.push(BookThemeRow { book_id, theme_id });
        self.save(BOOK_THEMES, &links)
    }

    fn delete_book_theme(&self, book_id: Uuid, theme_id: Uuid) -> Result<()> {
        let mut links: Vec<BookThemeRow> = self.load(BOOK_THEMES)?;
        links.retain(|l| !(l.book_id == book_id && l.theme_id == theme_id));
        self.save(BOOK_THEMES, &links)
    }

    fn select_takeaways(&self, book_id: Uuid) -> Result<Vec<KeyTakeawayRow>> {
        let takeaways: Vec<KeyTakeawayRow> = self.load(KEY_TAKEAWAYS)?;
        Ok(takeaways
            .into_iter()
            .filter(|k| k.book_id == book_id)
            .collect())
    }

    fn replace_takeaways(&self, book_id: Uuid, contents: &[String]) -> Result<()> {
        let mut takeaways: Vec<KeyTakeawayRow> = self.load(KEY_TAKEAWAYS)?;
        takeaways.retain(|k| k.book_id != book_id);
        for content in contents {
            takeaways.push(KeyTakeawayRow {
                id: Uuid::new_v4(),
                book_id,
                content: content.clone(),
            });
        }
        self.save(KEY_TAKEAWAYS, &takeaways)
    }
}
