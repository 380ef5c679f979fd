//! Request-scoped narrowing and ownership stamping
//!
//! Reading records are private: the record collection a principal can reach
//! is always limited to the records they read, administrators included. A
//! record outside that scope is reported as not found, never as forbidden.
//!
//! Ownership fields are never taken from the client. The functions that build
//! new records and reviews stamp the principal's id themselves.

use chrono::Utc;
use uuid::Uuid;

use super::auth::Principal;
use super::entity::Entity;
use super::error::{ShelfError, ShelfResult};
use super::service::LibraryStore;
use super::store::{BookFilter, RecordFilter, ReviewFilter};
use crate::entities::{Book, BookRecord, BookRecordInput, BookReview, BookReviewInput};

/// Books are not narrowed
pub fn books(_principal: &Principal) -> BookFilter {
    BookFilter::default()
}

/// Reviews are readable by everyone
pub fn reviews(_principal: &Principal) -> ReviewFilter {
    ReviewFilter::default()
}

/// The records `principal` may see or mutate
pub fn records(principal: &Principal) -> RecordFilter {
    RecordFilter::for_reader(principal.user_id)
}

/// Fetch one record through the principal's scope
pub async fn find_record(
    store: &dyn LibraryStore,
    principal: &Principal,
    id: Uuid,
) -> ShelfResult<BookRecord> {
    store
        .list_records(&records(principal).with_id(id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ShelfError::not_found(BookRecord::resource_name_singular(), id))
}

/// Build a new record owned by `principal`.
///
/// Whatever `reader` the payload carried is discarded.
pub fn stamp_record(principal: &Principal, input: BookRecordInput) -> BookRecord {
    if input.reader.is_some() {
        tracing::debug!(
            user_id = %principal.user_id,
            "ignoring client-supplied reader on book record"
        );
    }
    let now = Utc::now();
    BookRecord {
        id: Uuid::new_v4(),
        book_id: input.book,
        reader_id: principal.user_id,
        reading_state: input.reading_state,
        created_at: now,
        updated_at: now,
    }
}

/// Resolve the parent book addressed by the request path
pub async fn parent_book(store: &dyn LibraryStore, book_id: Uuid) -> ShelfResult<Book> {
    store
        .get_book(&book_id)
        .await?
        .ok_or(ShelfError::NotFoundParent {
            entity_type: Book::resource_name_singular(),
            id: book_id,
        })
}

/// Build a new review on `book` authored by `principal`
pub fn stamp_review(principal: &Principal, book: &Book, input: BookReviewInput) -> BookReview {
    let now = Utc::now();
    BookReview {
        id: Uuid::new_v4(),
        book_id: book.id,
        author_id: Some(principal.user_id),
        body: input.body,
        created_at: now,
        updated_at: now,
    }
}
