//! Per-reader reading state markers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::book::BookSummary;
use crate::core::entity::Entity;

/// Reading progress. Serialized with the two-letter codes clients already use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReadingState {
    #[serde(rename = "wr")]
    WantToRead,
    #[serde(rename = "rg")]
    Reading,
    #[serde(rename = "rd")]
    Read,
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub reader_id: Uuid,
    /// `None` is the unset state
    pub reading_state: Option<ReadingState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for BookRecord {
    fn resource_name() -> &'static str {
        "book_records"
    }

    fn resource_name_singular() -> &'static str {
        "book_record"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl BookRecord {
    pub fn is_read_by(&self, user_id: Uuid) -> bool {
        self.reader_id == user_id
    }

    pub fn replace(&mut self, input: BookRecordInput) {
        self.book_id = input.book;
        self.reading_state = input.reading_state;
        self.updated_at = Utc::now();
    }

    pub fn apply(&mut self, patch: BookRecordPatch) {
        if let Some(book) = patch.book {
            self.book_id = book;
        }
        if let Some(state) = patch.reading_state {
            self.reading_state = state;
        }
        self.updated_at = Utc::now();
    }
}

/// Create/replace payload. `reader` is accepted for compatibility and never
/// trusted: ownership is stamped from the authenticated principal.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookRecordInput {
    pub book: Uuid,
    #[serde(default)]
    pub reading_state: Option<ReadingState>,
    #[serde(default)]
    pub reader: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookRecordPatch {
    pub book: Option<Uuid>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub reading_state: Option<Option<ReadingState>>,
}

/// Response representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecordView {
    pub pk: Uuid,
    pub book: BookSummary,
    /// Reader's username
    pub reader: String,
    pub reading_state: Option<ReadingState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_state_codes() {
        assert_eq!(
            serde_json::to_value(ReadingState::WantToRead).unwrap(),
            "wr"
        );
        assert_eq!(serde_json::to_value(ReadingState::Reading).unwrap(), "rg");
        let state: ReadingState = serde_json::from_str("\"rd\"").unwrap();
        assert_eq!(state, ReadingState::Read);
        assert!(serde_json::from_str::<ReadingState>("\"done\"").is_err());
    }

    #[test]
    fn test_input_tolerates_client_reader() {
        let book = Uuid::new_v4();
        let input: BookRecordInput = serde_json::from_value(serde_json::json!({
            "book": book,
            "reading_state": "rg",
            "reader": "someone-else"
        }))
        .unwrap();
        assert_eq!(input.book, book);
        assert_eq!(input.reading_state, Some(ReadingState::Reading));
    }

    #[test]
    fn test_patch_can_unset_state() {
        let now = Utc::now();
        let mut record = BookRecord {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            reader_id: Uuid::new_v4(),
            reading_state: Some(ReadingState::Read),
            created_at: now,
            updated_at: now,
        };
        let patch: BookRecordPatch =
            serde_json::from_str(r#"{"reading_state": null}"#).unwrap();
        record.apply(patch);
        assert_eq!(record.reading_state, None);
    }
}
