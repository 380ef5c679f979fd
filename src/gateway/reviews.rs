//! Book review operations
//!
//! Reviews are listed and created under their book (`/books/{id}/reviews`)
//! and addressed individually afterwards. Only the author may change or
//! remove a review.

use uuid::Uuid;

use super::{require_principal, review_view};
use crate::core::auth::AuthContext;
use crate::core::entity::Entity;
use crate::core::error::{ShelfError, ShelfResult};
use crate::core::extractors::Payload;
use crate::core::policy::{self, ResourceKind, Target, Verb};
use crate::core::scope;
use crate::core::search::{self, SearchQuery};
use crate::core::service::LibraryStore;
use crate::entities::{BookReview, BookReviewInput, BookReviewPatch, BookReviewView};

/// Reviews of one book, optionally narrowed by a search over their bodies
pub async fn list(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    book_id: Uuid,
    search: Option<&str>,
) -> ShelfResult<Vec<BookReviewView>> {
    let query = SearchQuery::from_param(search);
    let verb = if query.is_some() { Verb::Search } else { Verb::List };
    let principal = policy::authorize(ctx, ResourceKind::BookReview, verb, Target::None)?;

    let book = scope::parent_book(store, book_id).await?;
    let mut filter = scope::reviews(principal);
    filter.book = Some(book.id);
    let reviews = store.list_reviews(&filter).await?;
    let reviews = search::search_reviews(book.id, reviews, query.as_ref());

    let mut views = Vec::with_capacity(reviews.len());
    for review in &reviews {
        views.push(review_view(store, review).await?);
    }
    Ok(views)
}

/// Post a review on `book_id` authored by the caller
pub async fn create(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    book_id: Uuid,
    input: impl Into<Payload<BookReviewInput>>,
) -> ShelfResult<BookReviewView> {
    let principal = policy::authorize(ctx, ResourceKind::BookReview, Verb::Create, Target::None)?;
    let input = input.into().into_valid()?;
    let book = scope::parent_book(store, book_id).await?;

    let review = store
        .create_review(scope::stamp_review(principal, &book, input))
        .await?;
    tracing::info!(
        review_id = %review.id,
        book_id = %book.id,
        user_id = %principal.user_id,
        "book review created"
    );
    review_view(store, &review).await
}

pub async fn get(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
) -> ShelfResult<BookReviewView> {
    policy::authorize(ctx, ResourceKind::BookReview, Verb::Get, Target::None)?;
    let review = load(store, id).await?;
    review_view(store, &review).await
}

pub async fn update(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
    input: impl Into<Payload<BookReviewInput>>,
) -> ShelfResult<BookReviewView> {
    require_principal(ctx)?;
    let mut review = load(store, id).await?;
    policy::authorize(ctx, ResourceKind::BookReview, Verb::Update, Target::Review(&review))?;
    let input = input.into().into_valid()?;

    review.set_body(input.body);
    let review = store.update_review(review).await?;
    review_view(store, &review).await
}

pub async fn patch(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
    patch: impl Into<Payload<BookReviewPatch>>,
) -> ShelfResult<BookReviewView> {
    require_principal(ctx)?;
    let mut review = load(store, id).await?;
    policy::authorize(ctx, ResourceKind::BookReview, Verb::Update, Target::Review(&review))?;
    let patch = patch.into().into_valid()?;

    if let Some(body) = patch.body {
        review.set_body(body);
    }
    let review = store.update_review(review).await?;
    review_view(store, &review).await
}

pub async fn delete(store: &dyn LibraryStore, ctx: &AuthContext, id: Uuid) -> ShelfResult<()> {
    let principal = require_principal(ctx)?;
    let review = load(store, id).await?;
    policy::authorize(ctx, ResourceKind::BookReview, Verb::Delete, Target::Review(&review))?;

    store.delete_review(&review.id).await?;
    tracing::info!(review_id = %id, user_id = %principal.user_id, "book review deleted");
    Ok(())
}

async fn load(store: &dyn LibraryStore, id: Uuid) -> ShelfResult<BookReview> {
    store
        .get_review(&id)
        .await?
        .ok_or_else(|| ShelfError::not_found(BookReview::resource_name_singular(), id))
}
