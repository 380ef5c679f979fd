//! Free-text reviews attached to books

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::entity::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookReview {
    pub id: Uuid,
    pub book_id: Uuid,
    /// Cleared when the author is removed
    pub author_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for BookReview {
    fn resource_name() -> &'static str {
        "book_reviews"
    }

    fn resource_name_singular() -> &'static str {
        "book_review"
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

impl BookReview {
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == Some(user_id)
    }

    pub fn set_body(&mut self, body: String) {
        self.body = body;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookReviewInput {
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookReviewPatch {
    #[validate(length(min = 1, max = 10000))]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookReviewView {
    pub pk: Uuid,
    pub body: String,
    /// Title of the reviewed book
    pub book: String,
    /// Author's username, `None` once the author is gone
    pub reviewed_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorship_compares_ids() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let mut review = BookReview {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            author_id: Some(author),
            body: "a masterpiece".into(),
            created_at: now,
            updated_at: now,
        };
        assert!(review.is_authored_by(author));
        assert!(!review.is_authored_by(Uuid::new_v4()));

        review.author_id = None;
        assert!(!review.is_authored_by(author));
    }

    #[test]
    fn test_empty_body_rejected() {
        let input = BookReviewInput { body: String::new() };
        assert!(input.validate().is_err());
        let patch = BookReviewPatch { body: None };
        assert!(patch.validate().is_ok());
    }
}
