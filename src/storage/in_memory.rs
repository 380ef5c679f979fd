//! In-memory implementation of LibraryStore for testing and development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::core::entity::Entity;
use crate::core::error::{ShelfError, ShelfResult, StorageError, ValidationError};
use crate::core::service::LibraryStore;
use crate::core::store::{BookFilter, RecordFilter, ReviewFilter};
use crate::entities::{Book, BookRecord, BookReview, User};

#[derive(Default)]
struct Tables {
    books: HashMap<Uuid, Book>,
    records: HashMap<Uuid, BookRecord>,
    reviews: HashMap<Uuid, BookReview>,
    users: HashMap<Uuid, User>,
}

impl Tables {
    fn check_book_identity(&self, book: &Book) -> ShelfResult<()> {
        if self.books.values().any(|other| other.same_identity(book)) {
            return Err(ValidationError::UniqueViolation {
                constraint: "unique_by_author",
                message: "Book with this title and author already exists".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn check_username(&self, user: &User) -> ShelfResult<()> {
        if self
            .users
            .values()
            .any(|other| other.id != user.id && other.username == user.username)
        {
            return Err(ValidationError::UniqueViolation {
                constraint: "unique_username",
                message: "A user with that username already exists".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn check_book_ref(&self, field: &'static str, id: Uuid) -> ShelfResult<()> {
        if self.books.contains_key(&id) {
            Ok(())
        } else {
            Err(ValidationError::ForeignKeyViolation {
                field,
                entity_type: Book::resource_name_singular(),
                id,
            }
            .into())
        }
    }

    fn check_user_ref(&self, field: &'static str, id: Uuid) -> ShelfResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(ValidationError::ForeignKeyViolation {
                field,
                entity_type: User::resource_name_singular(),
                id,
            }
            .into())
        }
    }

    fn check_record(&self, record: &BookRecord) -> ShelfResult<()> {
        self.check_book_ref("book", record.book_id)?;
        self.check_user_ref("reader", record.reader_id)
    }

    fn check_review(&self, review: &BookReview) -> ShelfResult<()> {
        self.check_book_ref("book", review.book_id)?;
        match review.author_id {
            Some(author) => self.check_user_ref("reviewed_by", author),
            None => Ok(()),
        }
    }
}

/// In-memory library store
///
/// Uses a single RwLock over all tables so that cascades are applied
/// atomically with the delete that triggers them.
#[derive(Clone, Default)]
pub struct InMemoryLibraryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ShelfResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| {
            StorageError::LockPoisoned {
                backend: "in-memory",
                kind: "read",
            }
            .into()
        })
    }

    fn write(&self) -> ShelfResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| {
            StorageError::LockPoisoned {
                backend: "in-memory",
                kind: "write",
            }
            .into()
        })
    }
}

fn sorted_by_creation<T: Entity>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
    items
}

#[async_trait]
impl LibraryStore for InMemoryLibraryStore {
    async fn create_book(&self, book: Book) -> ShelfResult<Book> {
        let mut tables = self.write()?;
        tables.check_book_identity(&book)?;
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn get_book(&self, id: &Uuid) -> ShelfResult<Option<Book>> {
        Ok(self.read()?.books.get(id).cloned())
    }

    async fn list_books(&self, filter: &BookFilter) -> ShelfResult<Vec<Book>> {
        let tables = self.read()?;
        let mut books: Vec<Book> = tables
            .books
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.author.cmp(&b.author)));
        Ok(books)
    }

    async fn update_book(&self, book: Book) -> ShelfResult<Book> {
        let mut tables = self.write()?;
        if !tables.books.contains_key(&book.id) {
            return Err(ShelfError::not_found(Book::resource_name_singular(), book.id));
        }
        tables.check_book_identity(&book)?;
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn delete_book(&self, id: &Uuid) -> ShelfResult<()> {
        let mut tables = self.write()?;
        if tables.books.remove(id).is_none() {
            return Err(ShelfError::not_found(Book::resource_name_singular(), *id));
        }
        tables.records.retain(|_, r| &r.book_id != id);
        tables.reviews.retain(|_, r| &r.book_id != id);
        Ok(())
    }

    async fn create_record(&self, record: BookRecord) -> ShelfResult<BookRecord> {
        let mut tables = self.write()?;
        tables.check_record(&record)?;
        tables.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_records(&self, filter: &RecordFilter) -> ShelfResult<Vec<BookRecord>> {
        let tables = self.read()?;
        Ok(sorted_by_creation(
            tables
                .records
                .values()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect(),
        ))
    }

    async fn update_record(&self, record: BookRecord) -> ShelfResult<BookRecord> {
        let mut tables = self.write()?;
        if !tables.records.contains_key(&record.id) {
            return Err(ShelfError::not_found(
                BookRecord::resource_name_singular(),
                record.id,
            ));
        }
        tables.check_record(&record)?;
        tables.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_record(&self, id: &Uuid) -> ShelfResult<()> {
        self.write()?
            .records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ShelfError::not_found(BookRecord::resource_name_singular(), *id))
    }

    async fn create_review(&self, review: BookReview) -> ShelfResult<BookReview> {
        let mut tables = self.write()?;
        tables.check_review(&review)?;
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn get_review(&self, id: &Uuid) -> ShelfResult<Option<BookReview>> {
        Ok(self.read()?.reviews.get(id).cloned())
    }

    async fn list_reviews(&self, filter: &ReviewFilter) -> ShelfResult<Vec<BookReview>> {
        let tables = self.read()?;
        Ok(sorted_by_creation(
            tables
                .reviews
                .values()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect(),
        ))
    }

    async fn update_review(&self, review: BookReview) -> ShelfResult<BookReview> {
        let mut tables = self.write()?;
        if !tables.reviews.contains_key(&review.id) {
            return Err(ShelfError::not_found(
                BookReview::resource_name_singular(),
                review.id,
            ));
        }
        tables.check_review(&review)?;
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn delete_review(&self, id: &Uuid) -> ShelfResult<()> {
        self.write()?
            .reviews
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ShelfError::not_found(BookReview::resource_name_singular(), *id))
    }

    async fn create_user(&self, user: User) -> ShelfResult<User> {
        let mut tables = self.write()?;
        tables.check_username(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &Uuid) -> ShelfResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn update_user(&self, user: User) -> ShelfResult<User> {
        let mut tables = self.write()?;
        if !tables.users.contains_key(&user.id) {
            return Err(ShelfError::not_found(User::resource_name_singular(), user.id));
        }
        tables.check_username(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: &Uuid) -> ShelfResult<()> {
        let mut tables = self.write()?;
        if tables.users.remove(id).is_none() {
            return Err(ShelfError::not_found(User::resource_name_singular(), *id));
        }
        tables.records.retain(|_, r| &r.reader_id != id);
        for review in tables.reviews.values_mut() {
            if review.author_id.as_ref() == Some(id) {
                review.author_id = None;
            }
        }
        Ok(())
    }
}
