//! Book catalog operations

use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::entity::Entity;
use crate::core::error::{ShelfError, ShelfResult};
use crate::core::extractors::Payload;
use crate::core::policy::{self, ResourceKind, Target, Verb};
use crate::core::scope;
use crate::core::search::{self, SearchQuery};
use crate::core::service::LibraryStore;
use crate::core::store::{BookFilter, ReviewFilter};
use crate::entities::{Book, BookDetail, BookInput, BookPatch, BookSummary};

/// List the catalog, optionally narrowed by a free-text search
pub async fn list(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    search: Option<&str>,
) -> ShelfResult<Vec<BookSummary>> {
    let query = SearchQuery::from_param(search);
    let verb = if query.is_some() { Verb::Search } else { Verb::List };
    let principal = policy::authorize(ctx, ResourceKind::Book, verb, Target::None)?;

    let books = store.list_books(&scope::books(principal)).await?;
    let books = match &query {
        Some(query) => {
            let reviews = store.list_reviews(&scope::reviews(principal)).await?;
            search::search_catalog(books, &reviews, Some(query))
        }
        None => books,
    };

    Ok(books.iter().map(BookSummary::from).collect())
}

/// Books flagged as featured
pub async fn featured(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
) -> ShelfResult<Vec<BookSummary>> {
    policy::authorize(ctx, ResourceKind::Book, Verb::Featured, Target::None)?;
    let books = store.list_books(&BookFilter::featured()).await?;
    Ok(books.iter().map(BookSummary::from).collect())
}

pub async fn get(store: &dyn LibraryStore, ctx: &AuthContext, id: Uuid) -> ShelfResult<BookDetail> {
    policy::authorize(ctx, ResourceKind::Book, Verb::Get, Target::None)?;
    let book = load(store, id).await?;
    detail(store, &book).await
}

pub async fn create(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    input: impl Into<Payload<BookInput>>,
) -> ShelfResult<BookDetail> {
    let principal = policy::authorize(ctx, ResourceKind::Book, Verb::Create, Target::None)?;
    let input = input.into().into_valid()?;
    input.check()?;

    let book = store.create_book(Book::new(input)).await?;
    tracing::info!(
        book_id = %book.id,
        user_id = %principal.user_id,
        title = %book.title,
        "book created"
    );
    Ok(BookDetail::new(&book, Vec::new()))
}

/// Full replacement (PUT)
pub async fn update(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
    input: impl Into<Payload<BookInput>>,
) -> ShelfResult<BookDetail> {
    policy::authorize(ctx, ResourceKind::Book, Verb::Update, Target::None)?;
    let input = input.into().into_valid()?;
    input.check()?;

    let mut book = load(store, id).await?;
    book.replace(input);
    let book = store.update_book(book).await?;
    detail(store, &book).await
}

/// Partial update (PATCH)
pub async fn patch(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
    patch: impl Into<Payload<BookPatch>>,
) -> ShelfResult<BookDetail> {
    policy::authorize(ctx, ResourceKind::Book, Verb::Update, Target::None)?;
    let patch = patch.into().into_valid()?;
    patch.check()?;

    let mut book = load(store, id).await?;
    book.apply(patch);
    let book = store.update_book(book).await?;
    detail(store, &book).await
}

/// Delete a book along with its records and reviews
pub async fn delete(store: &dyn LibraryStore, ctx: &AuthContext, id: Uuid) -> ShelfResult<()> {
    let principal = policy::authorize(ctx, ResourceKind::Book, Verb::Delete, Target::None)?;
    store.delete_book(&id).await?;
    tracing::info!(book_id = %id, user_id = %principal.user_id, "book deleted");
    Ok(())
}

async fn load(store: &dyn LibraryStore, id: Uuid) -> ShelfResult<Book> {
    store
        .get_book(&id)
        .await?
        .ok_or_else(|| ShelfError::not_found(Book::resource_name_singular(), id))
}

async fn detail(store: &dyn LibraryStore, book: &Book) -> ShelfResult<BookDetail> {
    let reviews = store
        .list_reviews(&ReviewFilter::for_book(book.id))
        .await?
        .iter()
        .map(|review| review.detail_path())
        .collect();
    Ok(BookDetail::new(book, reviews))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;
    use crate::entities::BookReview;
    use crate::gateway::fixtures::Library;
    use chrono::Utc;

    fn dune() -> BookInput {
        BookInput {
            title: "Dune".into(),
            author: "Herbert".into(),
            publication_year: Some(1965),
            featured: false,
        }
    }

    #[tokio::test]
    async fn test_admin_creates_and_anyone_reads() {
        let lib = Library::new().await;
        let created = create(&lib.store, &lib.admin, dune()).await.unwrap();
        assert_eq!(created.title, "Dune");
        assert_eq!(created.publication_year, Some(1965));
        assert!(created.reviews.is_empty());

        let fetched = get(&lib.store, &lib.alice, created.pk).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_reader_cannot_write_books() {
        let lib = Library::new().await;
        let err = create(&lib.store, &lib.alice, dune()).await.unwrap_err();
        assert!(matches!(err, ShelfError::Forbidden { .. }));
        assert!(list(&lib.store, &lib.admin, None).await.unwrap().is_empty());

        let book = lib.book("Emma", "Austen").await;
        let err = delete(&lib.store, &lib.alice, book.id).await.unwrap_err();
        assert!(matches!(err, ShelfError::Forbidden { .. }));
        assert!(lib.store.get_book(&book.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_denied_update_leaves_book_untouched() {
        let lib = Library::new().await;
        let original = create(&lib.store, &lib.admin, dune()).await.unwrap();

        let mut blank = dune();
        blank.title = String::new();
        let err = update(&lib.store, &lib.alice, original.pk, blank)
            .await
            .unwrap_err();
        assert!(matches!(err, ShelfError::Forbidden { .. }));

        let err = patch(
            &lib.store,
            &AuthContext::Anonymous,
            original.pk,
            BookPatch {
                featured: Some(true),
                ..BookPatch::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ShelfError::Unauthenticated));

        let untitled = Payload::from(BookInput {
            title: String::new(),
            ..dune()
        });
        let err = create(&lib.store, &lib.bob, untitled).await.unwrap_err();
        assert!(matches!(err, ShelfError::Forbidden { .. }));

        let unchanged = get(&lib.store, &lib.admin, original.pk).await.unwrap();
        assert_eq!(unchanged, original);
        assert_eq!(list(&lib.store, &lib.admin, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_payload_checked_after_policy() {
        let lib = Library::new().await;
        let mut blank = dune();
        blank.title = String::new();
        let err = create(&lib.store, &lib.admin, blank).await.unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Validation(ValidationError::FieldErrors(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_title_author_rejected() {
        let lib = Library::new().await;
        let original = create(&lib.store, &lib.admin, dune()).await.unwrap();

        let err = create(&lib.store, &lib.admin, dune()).await.unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Validation(ValidationError::UniqueViolation { .. })
        ));

        let mut other_author = dune();
        other_author.author = "Someone Else".into();
        assert!(create(&lib.store, &lib.admin, other_author).await.is_ok());

        let unchanged = get(&lib.store, &lib.admin, original.pk).await.unwrap();
        assert_eq!(unchanged, original);
    }

    #[tokio::test]
    async fn test_publication_year_bounds() {
        let lib = Library::new().await;
        let mut ancient = dune();
        ancient.publication_year = Some(299);
        let err = create(&lib.store, &lib.admin, ancient).await.unwrap_err();
        assert!(matches!(err, ShelfError::Validation(_)));

        let created = create(&lib.store, &lib.admin, dune()).await.unwrap();
        let err = patch(
            &lib.store,
            &lib.admin,
            created.pk,
            BookPatch {
                publication_year: Some(Some(99_999)),
                ..BookPatch::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ShelfError::Validation(_)));
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthenticated() {
        let lib = Library::new().await;
        let err = list(&lib.store, &AuthContext::Anonymous, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ShelfError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_search_and_featured() {
        let lib = Library::new().await;
        let dune = lib.book("Dune", "Herbert").await;
        let emma = lib.book("Emma", "Austen").await;
        patch(
            &lib.store,
            &lib.admin,
            emma.id,
            BookPatch {
                featured: Some(true),
                ..BookPatch::default()
            },
        )
        .await
        .unwrap();

        let now = Utc::now();
        lib.store
            .create_review(BookReview {
                id: Uuid::new_v4(),
                book_id: dune.id,
                author_id: lib.alice.user_id(),
                body: "a masterpiece of world-building".into(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let all = list(&lib.store, &lib.bob, Some("  ")).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Dune");

        let by_review = list(&lib.store, &lib.bob, Some("masterpiece")).await.unwrap();
        assert_eq!(by_review.len(), 1);
        assert_eq!(by_review[0].pk, dune.id);

        let missing = list(&lib.store, &lib.bob, Some("mediocre")).await.unwrap();
        assert!(missing.is_empty());

        let featured = featured(&lib.store, &lib.bob).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].pk, emma.id);

        let detail = get(&lib.store, &lib.bob, dune.id).await.unwrap();
        assert_eq!(detail.reviews.len(), 1);
        assert!(detail.reviews[0].starts_with("/book_reviews/"));
    }

    #[tokio::test]
    async fn test_update_missing_book_is_not_found() {
        let lib = Library::new().await;
        let err = update(&lib.store, &lib.admin, Uuid::new_v4(), dune())
            .await
            .unwrap_err();
        assert!(matches!(err, ShelfError::NotFound { .. }));
    }
}
