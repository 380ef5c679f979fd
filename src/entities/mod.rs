//! Data model: books, reading records, reviews and users
//!
//! Each module holds the stored entity, the request payloads accepted for it
//! and the response projections returned to clients.

pub mod book;
pub mod book_record;
pub mod book_review;
pub mod user;

pub use book::{Book, BookDetail, BookInput, BookPatch, BookSummary};
pub use book_record::{BookRecord, BookRecordInput, BookRecordPatch, BookRecordView, ReadingState};
pub use book_review::{BookReview, BookReviewInput, BookReviewPatch, BookReviewView};
pub use user::{ProfileInput, User, UserView};

/// Distinguish an absent field from an explicit `null` in patch payloads
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}
