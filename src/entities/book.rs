//! Book catalog entries

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::entity::Entity;
use crate::core::error::ValidationError;

/// Earliest accepted publication year
pub const MIN_PUBLICATION_YEAR: i32 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Book {
    fn resource_name() -> &'static str {
        "books"
    }

    fn resource_name_singular() -> &'static str {
        "book"
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

impl Book {
    pub fn new(input: BookInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            author: input.author,
            publication_year: input.publication_year,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every writable field (PUT)
    pub fn replace(&mut self, input: BookInput) {
        self.title = input.title;
        self.author = input.author;
        self.publication_year = input.publication_year;
        self.featured = input.featured;
        self.touch();
    }

    /// Apply the fields present in a partial update (PATCH)
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(year) = patch.publication_year {
            self.publication_year = year;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether `(title, author)` collides with another book
    pub fn same_identity(&self, other: &Book) -> bool {
        self.id != other.id && self.title == other.title && self.author == other.author
    }
}

/// Bound the publication year to `300..=current year`
pub fn validate_publication_year(year: Option<i32>) -> Result<(), ValidationError> {
    let Some(year) = year else {
        return Ok(());
    };
    let current = Utc::now().year();
    if (MIN_PUBLICATION_YEAR..=current).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::field(
            "publication_year",
            format!("must be between {MIN_PUBLICATION_YEAR} and {current}"),
        ))
    }
}

/// Create/replace payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub author: String,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub featured: bool,
}

impl BookInput {
    pub fn check(&self) -> Result<(), ValidationError> {
        validate_publication_year(self.publication_year)
    }
}

/// Partial update payload. `publication_year: null` clears the year.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookPatch {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub publication_year: Option<Option<i32>>,
    pub featured: Option<bool>,
}

impl BookPatch {
    pub fn check(&self) -> Result<(), ValidationError> {
        validate_publication_year(self.publication_year.flatten())
    }
}

/// List representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookSummary {
    pub pk: Uuid,
    pub title: String,
    pub author: String,
    pub featured: bool,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            pk: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            featured: book.featured,
        }
    }
}

/// Detail representation, `reviews` holds review detail paths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookDetail {
    pub pk: Uuid,
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub featured: bool,
    pub reviews: Vec<String>,
}

impl BookDetail {
    pub fn new(book: &Book, reviews: Vec<String>) -> Self {
        Self {
            pk: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            publication_year: book.publication_year,
            featured: book.featured,
            reviews,
        }
    }
}
