//! Resource gateway
//!
//! One module per resource. Every operation follows the same sequence:
//! resolve the principal, narrow through [`scope`](crate::core::scope), ask
//! [`policy`](crate::core::policy), and only then touch the store. Responses
//! are the projections defined next to each entity.
//!
//! The functions here are transport-free; `server::handlers` adapts them to
//! axum.

pub mod books;
pub mod records;
pub mod reviews;
pub mod users;

use crate::core::auth::{AuthContext, Principal};
use crate::core::error::{ShelfError, ShelfResult};
use crate::core::service::LibraryStore;
use crate::entities::{BookRecord, BookRecordView, BookReview, BookReviewView, BookSummary};

/// The principal behind `ctx`, or `Unauthenticated`
pub(crate) fn require_principal(ctx: &AuthContext) -> ShelfResult<&Principal> {
    ctx.principal().ok_or(ShelfError::Unauthenticated)
}

pub(crate) async fn record_view(
    store: &dyn LibraryStore,
    record: &BookRecord,
) -> ShelfResult<BookRecordView> {
    let book = store
        .get_book(&record.book_id)
        .await?
        .ok_or_else(|| dangling("book_record", record.id, "book"))?;
    let reader = store
        .get_user(&record.reader_id)
        .await?
        .ok_or_else(|| dangling("book_record", record.id, "reader"))?;

    Ok(BookRecordView {
        pk: record.id,
        book: BookSummary::from(&book),
        reader: reader.username,
        reading_state: record.reading_state,
    })
}

pub(crate) async fn review_view(
    store: &dyn LibraryStore,
    review: &BookReview,
) -> ShelfResult<BookReviewView> {
    let book = store
        .get_book(&review.book_id)
        .await?
        .ok_or_else(|| dangling("book_review", review.id, "book"))?;
    let reviewed_by = match review.author_id {
        Some(author) => store.get_user(&author).await?.map(|u| u.username),
        None => None,
    };

    Ok(BookReviewView {
        pk: review.id,
        body: review.body.clone(),
        book: book.title,
        reviewed_by,
    })
}

fn dangling(entity: &str, id: uuid::Uuid, field: &str) -> ShelfError {
    ShelfError::Internal(format!("{entity} '{id}' references a missing {field}"))
}
