//! The routing table
//!
//! Routes are declared here once and the resulting [`Router`] is never
//! modified after [`build_router`] returns.
//!
//! - GET /health
//! - GET, POST /books
//! - GET /books/featured
//! - GET, PUT, PATCH, DELETE /books/{id}
//! - GET, POST /books/{id}/reviews
//! - GET, PUT, PATCH, DELETE /book_reviews/{id}
//! - GET, POST /book_records
//! - GET, PUT, PATCH, DELETE /book_records/{id}
//! - GET, PUT, PATCH /auth/users/{id}
//! - PUT, PATCH /auth/users/{id}/photo

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

fn book_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/books",
            get(handlers::list_books).post(handlers::create_book),
        )
        .route("/books/featured", get(handlers::featured_books))
        .route(
            "/books/{id}",
            get(handlers::get_book)
                .put(handlers::update_book)
                .patch(handlers::patch_book)
                .delete(handlers::delete_book),
        )
        .route(
            "/books/{id}/reviews",
            get(handlers::list_book_reviews).post(handlers::create_book_review),
        )
}

fn review_routes() -> Router<AppState> {
    Router::new().route(
        "/book_reviews/{id}",
        get(handlers::get_review)
            .put(handlers::update_review)
            .patch(handlers::patch_review)
            .delete(handlers::delete_review),
    )
}

fn record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/book_records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/book_records/{id}",
            get(handlers::get_record)
                .put(handlers::update_record)
                .patch(handlers::patch_record)
                .delete(handlers::delete_record),
        )
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/users/{id}",
            get(handlers::get_profile)
                .put(handlers::update_profile)
                .patch(handlers::update_profile),
        )
        .route(
            "/auth/users/{id}/photo",
            axum::routing::put(handlers::attach_photo).patch(handlers::attach_photo),
        )
}

/// Build the complete application router over `state`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(book_routes())
        .merge(review_routes())
        .merge(record_routes())
        .merge(profile_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
