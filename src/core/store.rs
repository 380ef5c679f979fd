//! Filter values understood by every store
//!
//! Each field left at `None` places no constraint on the result. Filters are
//! plain data so a SQL backend can translate them to `WHERE` clauses while the
//! in-memory store evaluates them with `matches`.

use uuid::Uuid;

use crate::entities::{Book, BookRecord, BookReview};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub featured: Option<bool>,
}

impl BookFilter {
    pub fn featured() -> Self {
        Self {
            featured: Some(true),
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.featured.is_none_or(|f| book.featured == f)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub id: Option<Uuid>,
    pub reader: Option<Uuid>,
    pub book: Option<Uuid>,
}

impl RecordFilter {
    pub fn for_reader(reader: Uuid) -> Self {
        Self {
            reader: Some(reader),
            ..Self::default()
        }
    }

    /// Narrow an existing filter to a single record
    pub fn with_id(self, id: Uuid) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn matches(&self, record: &BookRecord) -> bool {
        self.id.is_none_or(|id| record.id == id)
            && self.reader.is_none_or(|r| record.reader_id == r)
            && self.book.is_none_or(|b| record.book_id == b)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub id: Option<Uuid>,
    pub book: Option<Uuid>,
    pub author: Option<Uuid>,
}

impl ReviewFilter {
    pub fn for_book(book: Uuid) -> Self {
        Self {
            book: Some(book),
            ..Self::default()
        }
    }

    pub fn matches(&self, review: &BookReview) -> bool {
        self.id.is_none_or(|id| review.id == id)
            && self.book.is_none_or(|b| review.book_id == b)
            && self.author.is_none_or(|a| review.author_id == Some(a))
    }
}
