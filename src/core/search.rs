//! Free-text search over books and their reviews
//!
//! A [`SearchProjection`] is the tokenized text of one document. For catalog
//! search the document is a book's title (weight 1.0) followed by the bodies of
//! all its reviews (weight 0.4); for review search it is one review's body.
//!
//! Matching is case-insensitive and token based. Every query token has to hit
//! at least one document token, either exactly or as a prefix of it
//! ("master" hits "masterpiece"). Raw substring hits inside a token do not
//! count ("aster" does not hit "masterpiece").
//!
//! Weights only feed [`SearchProjection::rank`], a relevance score for
//! callers that want one. Neither search function reorders its input:
//! catalog results stay in title order and review results in creation order.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::entities::{Book, BookReview};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    // Letters and digits, with inner apostrophes kept ("world's")
    Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}\p{N}]+)*").expect("token pattern is valid")
});

pub const TITLE_WEIGHT: f32 = 1.0;
pub const REVIEW_WEIGHT: f32 = 0.4;

/// Split `text` into lowercase tokens
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// A parsed search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Parse a raw `?search=` value. Blank input yields `None`: no filtering.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut terms = tokenize(raw);
        terms.dedup();
        (!terms.is_empty()).then_some(Self { terms })
    }

    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Weighted token set of one searchable document
#[derive(Debug, Clone, Default)]
pub struct SearchProjection {
    tokens: HashMap<String, f32>,
}

impl SearchProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str, weight: f32) {
        for token in tokenize(text) {
            let entry = self.tokens.entry(token).or_insert(0.0);
            *entry = entry.max(weight);
        }
    }

    /// Title plus the bodies of every review of `book`
    pub fn for_book<'a>(book: &Book, reviews: impl IntoIterator<Item = &'a BookReview>) -> Self {
        let mut projection = Self::new();
        projection.push(&book.title, TITLE_WEIGHT);
        for review in reviews {
            projection.push(&review.body, REVIEW_WEIGHT);
        }
        projection
    }

    pub fn for_review(review: &BookReview) -> Self {
        let mut projection = Self::new();
        projection.push(&review.body, TITLE_WEIGHT);
        projection
    }

    fn term_weight(&self, term: &str) -> Option<f32> {
        self.tokens
            .iter()
            .filter(|(token, _)| token.starts_with(term))
            .map(|(token, weight)| {
                if token.as_str() == term {
                    *weight
                } else {
                    *weight * 0.5
                }
            })
            .reduce(f32::max)
    }

    /// Relevance of `query` against this document, `None` when it does not match.
    ///
    /// Exact token hits count their full weight, prefix hits half of it. The
    /// score is metadata; result order never depends on it.
    pub fn rank(&self, query: &SearchQuery) -> Option<f32> {
        query
            .terms
            .iter()
            .map(|term| self.term_weight(term))
            .sum::<Option<f32>>()
    }

    pub fn matches(&self, query: &SearchQuery) -> bool {
        self.rank(query).is_some()
    }
}

/// Catalog search: keep books whose title or any review body matches.
///
/// `reviews` may hold reviews of any book; they are grouped by book id.
/// Input order is preserved.
pub fn search_catalog(
    books: Vec<Book>,
    reviews: &[BookReview],
    query: Option<&SearchQuery>,
) -> Vec<Book> {
    let Some(query) = query else {
        return books;
    };

    let mut by_book: HashMap<Uuid, Vec<&BookReview>> = HashMap::new();
    for review in reviews {
        by_book.entry(review.book_id).or_default().push(review);
    }

    books
        .into_iter()
        .filter(|book| {
            let reviews = by_book.get(&book.id).into_iter().flatten().copied();
            SearchProjection::for_book(book, reviews).matches(query)
        })
        .collect()
}

/// Review search within one book: only review bodies of `book_id` are matched
pub fn search_reviews(
    book_id: Uuid,
    reviews: Vec<BookReview>,
    query: Option<&SearchQuery>,
) -> Vec<BookReview> {
    reviews
        .into_iter()
        .filter(|review| review.book_id == book_id)
        .filter(|review| query.is_none_or(|q| SearchProjection::for_review(review).matches(q)))
        .collect()
}
