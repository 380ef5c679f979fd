//! Axum handlers
//!
//! Thin adapters: extract, call the gateway, pick the status code.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use super::state::AppState;
use crate::core::auth::AuthContext;
use crate::core::error::ShelfResult;
use crate::core::extractors::{Payload, ResourceId};
use crate::entities::{
    BookDetail, BookInput, BookPatch, BookRecordInput, BookRecordPatch, BookRecordView,
    BookReviewInput, BookReviewPatch, BookReviewView, BookSummary, ProfileInput, UserView,
};
use crate::gateway::users::PhotoUpload;
use crate::gateway::{books, records, reviews, users};

/// `?search=` on collection routes
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "shelf-rs"
    }))
}

// === Books ===

pub async fn list_books(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<SearchParams>,
) -> ShelfResult<Json<Vec<BookSummary>>> {
    let books = books::list(state.store.as_ref(), &auth, params.search.as_deref()).await?;
    Ok(Json(books))
}

pub async fn featured_books(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ShelfResult<Json<Vec<BookSummary>>> {
    Ok(Json(books::featured(state.store.as_ref(), &auth).await?))
}

pub async fn get_book(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
) -> ShelfResult<Json<BookDetail>> {
    Ok(Json(books::get(state.store.as_ref(), &auth, id).await?))
}

pub async fn create_book(
    State(state): State<AppState>,
    auth: AuthContext,
    input: Payload<BookInput>,
) -> ShelfResult<(StatusCode, Json<BookDetail>)> {
    let book = books::create(state.store.as_ref(), &auth, input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update_book(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    input: Payload<BookInput>,
) -> ShelfResult<Json<BookDetail>> {
    Ok(Json(books::update(state.store.as_ref(), &auth, id, input).await?))
}

pub async fn patch_book(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    patch: Payload<BookPatch>,
) -> ShelfResult<Json<BookDetail>> {
    Ok(Json(books::patch(state.store.as_ref(), &auth, id, patch).await?))
}

pub async fn delete_book(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
) -> ShelfResult<StatusCode> {
    books::delete(state.store.as_ref(), &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// === Reading records ===

pub async fn list_records(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ShelfResult<Json<Vec<BookRecordView>>> {
    Ok(Json(records::list(state.store.as_ref(), &auth).await?))
}

pub async fn get_record(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
) -> ShelfResult<Json<BookRecordView>> {
    Ok(Json(records::get(state.store.as_ref(), &auth, id).await?))
}

pub async fn create_record(
    State(state): State<AppState>,
    auth: AuthContext,
    input: Payload<BookRecordInput>,
) -> ShelfResult<(StatusCode, Json<BookRecordView>)> {
    let record = records::create(state.store.as_ref(), &auth, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_record(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    input: Payload<BookRecordInput>,
) -> ShelfResult<Json<BookRecordView>> {
    Ok(Json(records::update(state.store.as_ref(), &auth, id, input).await?))
}

pub async fn patch_record(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    patch: Payload<BookRecordPatch>,
) -> ShelfResult<Json<BookRecordView>> {
    Ok(Json(records::patch(state.store.as_ref(), &auth, id, patch).await?))
}

pub async fn delete_record(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
) -> ShelfResult<StatusCode> {
    records::delete(state.store.as_ref(), &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// === Reviews ===

pub async fn list_book_reviews(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(book_id): ResourceId,
    Query(params): Query<SearchParams>,
) -> ShelfResult<Json<Vec<BookReviewView>>> {
    let reviews =
        reviews::list(state.store.as_ref(), &auth, book_id, params.search.as_deref()).await?;
    Ok(Json(reviews))
}

pub async fn create_book_review(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(book_id): ResourceId,
    input: Payload<BookReviewInput>,
) -> ShelfResult<(StatusCode, Json<BookReviewView>)> {
    let review = reviews::create(state.store.as_ref(), &auth, book_id, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get_review(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
) -> ShelfResult<Json<BookReviewView>> {
    Ok(Json(reviews::get(state.store.as_ref(), &auth, id).await?))
}

pub async fn update_review(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    input: Payload<BookReviewInput>,
) -> ShelfResult<Json<BookReviewView>> {
    Ok(Json(reviews::update(state.store.as_ref(), &auth, id, input).await?))
}

pub async fn patch_review(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    patch: Payload<BookReviewPatch>,
) -> ShelfResult<Json<BookReviewView>> {
    Ok(Json(reviews::patch(state.store.as_ref(), &auth, id, patch).await?))
}

pub async fn delete_review(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
) -> ShelfResult<StatusCode> {
    reviews::delete(state.store.as_ref(), &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// === Profiles ===

pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
) -> ShelfResult<Json<UserView>> {
    Ok(Json(users::get_profile(state.store.as_ref(), &auth, id).await?))
}

/// Serves both PUT and PATCH: every profile field is optional
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    input: Payload<ProfileInput>,
) -> ShelfResult<Json<UserView>> {
    Ok(Json(
        users::update_profile(state.store.as_ref(), &auth, id, input).await?,
    ))
}

pub async fn attach_photo(
    State(state): State<AppState>,
    auth: AuthContext,
    ResourceId(id): ResourceId,
    headers: HeaderMap,
    body: Bytes,
) -> ShelfResult<(StatusCode, Json<UserView>)> {
    let upload = PhotoUpload::from_parts(&headers, body);
    let user = users::attach_photo(
        state.store.as_ref(),
        state.blobs.as_ref(),
        &auth,
        id,
        upload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}
