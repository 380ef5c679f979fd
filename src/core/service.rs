//! Store trait for the library tables

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::ShelfResult;
use crate::core::store::{BookFilter, RecordFilter, ReviewFilter};
use crate::entities::{Book, BookRecord, BookReview, User};

/// Typed tables for books, reading records, reviews and users.
///
/// Implementations own the integrity rules: `(title, author)` and `username`
/// uniqueness, reference checks on records and reviews, and the delete
/// cascades (book → records/reviews, user → records, user → review author
/// cleared). Constraint violations are reported as
/// [`ValidationError`](crate::core::error::ValidationError)s and leave nothing
/// committed. Updating or deleting an unknown id yields `NotFound`.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    // === Books ===

    async fn create_book(&self, book: Book) -> ShelfResult<Book>;

    async fn get_book(&self, id: &Uuid) -> ShelfResult<Option<Book>>;

    /// List books matching `filter`, ordered by title ascending
    async fn list_books(&self, filter: &BookFilter) -> ShelfResult<Vec<Book>>;

    async fn update_book(&self, book: Book) -> ShelfResult<Book>;

    async fn delete_book(&self, id: &Uuid) -> ShelfResult<()>;

    // === Reading records ===

    async fn create_record(&self, record: BookRecord) -> ShelfResult<BookRecord>;

    /// List records matching `filter`, oldest first
    async fn list_records(&self, filter: &RecordFilter) -> ShelfResult<Vec<BookRecord>>;

    async fn update_record(&self, record: BookRecord) -> ShelfResult<BookRecord>;

    async fn delete_record(&self, id: &Uuid) -> ShelfResult<()>;

    // === Reviews ===

    async fn create_review(&self, review: BookReview) -> ShelfResult<BookReview>;

    async fn get_review(&self, id: &Uuid) -> ShelfResult<Option<BookReview>>;

    /// List reviews matching `filter`, oldest first
    async fn list_reviews(&self, filter: &ReviewFilter) -> ShelfResult<Vec<BookReview>>;

    async fn update_review(&self, review: BookReview) -> ShelfResult<BookReview>;

    async fn delete_review(&self, id: &Uuid) -> ShelfResult<()>;

    // === Users ===

    async fn create_user(&self, user: User) -> ShelfResult<User>;

    async fn get_user(&self, id: &Uuid) -> ShelfResult<Option<User>>;

    async fn update_user(&self, user: User) -> ShelfResult<User>;

    async fn delete_user(&self, id: &Uuid) -> ShelfResult<()>;
}
