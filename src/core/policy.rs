//! Authorization policy table
//!
//! [`evaluate`] is the single decision function for every
//! `(principal, resource, verb, target)` combination. It is pure: no store
//! access, no request state. Ownership is compared by primary key.
//!
//! | Resource     | Read verbs            | Create        | Update / Delete          |
//! |--------------|-----------------------|---------------|--------------------------|
//! | Book         | any principal         | administrator | administrator            |
//! | BookRecord   | reader of the target  | any principal | reader of the target     |
//! | BookReview   | any principal         | any principal | author of the target     |
//! | UserProfile  | the profile's owner   | never         | the profile's owner      |
//!
//! An absent principal is always denied.

use uuid::Uuid;

use super::auth::{AuthContext, Principal};
use super::error::{ShelfError, ShelfResult};
use crate::entities::{BookRecord, BookReview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Book,
    BookRecord,
    BookReview,
    UserProfile,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Book => "book",
            ResourceKind::BookRecord => "book_record",
            ResourceKind::BookReview => "book_review",
            ResourceKind::UserProfile => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Get,
    Search,
    Featured,
    Create,
    Update,
    Delete,
}

impl Verb {
    pub fn is_read(self) -> bool {
        matches!(self, Verb::List | Verb::Get | Verb::Search | Verb::Featured)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::List => "list",
            Verb::Get => "get",
            Verb::Search => "search",
            Verb::Featured => "featured",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }
}

/// The stored record an operation addresses, when there is one
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    None,
    Record(&'a BookRecord),
    Review(&'a BookReview),
    Profile(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed { Decision::Allow } else { Decision::Deny }
    }
}

/// Decide whether `principal` may perform `verb` on `kind`
pub fn evaluate(
    principal: Option<&Principal>,
    kind: ResourceKind,
    verb: Verb,
    target: Target<'_>,
) -> Decision {
    let Some(principal) = principal else {
        return Decision::Deny;
    };

    let allowed = match kind {
        ResourceKind::Book => verb.is_read() || principal.is_admin,

        ResourceKind::BookRecord => match (verb, target) {
            (Verb::Create | Verb::List, _) => true,
            (_, Target::Record(record)) => record.is_read_by(principal.user_id),
            _ => false,
        },

        ResourceKind::BookReview => match (verb, target) {
            (Verb::Update | Verb::Delete, Target::Review(review)) => {
                review.is_authored_by(principal.user_id)
            }
            (Verb::Update | Verb::Delete, _) => false,
            _ => true,
        },

        ResourceKind::UserProfile => match (verb, target) {
            (Verb::Get | Verb::Update, Target::Profile(user_id)) => principal.is(user_id),
            _ => false,
        },
    };

    allowed.into()
}

/// Evaluate the policy and turn a denial into the matching error.
///
/// Anonymous callers get `Unauthenticated`, known principals `Forbidden`.
pub fn authorize<'a>(
    ctx: &'a AuthContext,
    kind: ResourceKind,
    verb: Verb,
    target: Target<'_>,
) -> ShelfResult<&'a Principal> {
    let principal = ctx.principal();
    match (evaluate(principal, kind, verb, target), principal) {
        (Decision::Allow, Some(principal)) => Ok(principal),
        (_, None) => Err(ShelfError::Unauthenticated),
        (Decision::Deny, Some(principal)) => {
            tracing::debug!(
                user_id = %principal.user_id,
                resource = kind.as_str(),
                verb = verb.as_str(),
                "policy denied"
            );
            Err(ShelfError::forbidden(format!(
                "You do not have permission to {} this {}",
                verb.as_str(),
                kind.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const READS: [Verb; 4] = [Verb::List, Verb::Get, Verb::Search, Verb::Featured];
    const WRITES: [Verb; 3] = [Verb::Create, Verb::Update, Verb::Delete];

    fn principal(is_admin: bool) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            username: "p".into(),
            is_admin,
        }
    }

    fn record_of(reader: Uuid) -> BookRecord {
        let now = Utc::now();
        BookRecord {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            reader_id: reader,
            reading_state: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn review_by(author: Option<Uuid>) -> BookReview {
        let now = Utc::now();
        BookReview {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            author_id: author,
            body: "fine".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_anonymous_always_denied() {
        let record = record_of(Uuid::new_v4());
        for kind in [
            ResourceKind::Book,
            ResourceKind::BookRecord,
            ResourceKind::BookReview,
            ResourceKind::UserProfile,
        ] {
            for verb in READS.into_iter().chain(WRITES) {
                assert_eq!(
                    evaluate(None, kind, verb, Target::Record(&record)),
                    Decision::Deny
                );
            }
        }
    }

    #[test]
    fn test_books_readable_by_all_writable_by_admins() {
        let reader = principal(false);
        let admin = principal(true);
        for verb in READS {
            assert_eq!(
                evaluate(Some(&reader), ResourceKind::Book, verb, Target::None),
                Decision::Allow
            );
        }
        for verb in WRITES {
            assert_eq!(
                evaluate(Some(&reader), ResourceKind::Book, verb, Target::None),
                Decision::Deny
            );
            assert_eq!(
                evaluate(Some(&admin), ResourceKind::Book, verb, Target::None),
                Decision::Allow
            );
        }
    }

    #[test]
    fn test_records_owned_by_reader_only() {
        let alice = principal(false);
        let admin = principal(true);
        let record = record_of(alice.user_id);

        for verb in [Verb::Get, Verb::Update, Verb::Delete] {
            assert_eq!(
                evaluate(Some(&alice), ResourceKind::BookRecord, verb, Target::Record(&record)),
                Decision::Allow
            );
            assert_eq!(
                evaluate(Some(&admin), ResourceKind::BookRecord, verb, Target::Record(&record)),
                Decision::Deny
            );
            assert_eq!(
                evaluate(Some(&alice), ResourceKind::BookRecord, verb, Target::None),
                Decision::Deny
            );
        }
        assert_eq!(
            evaluate(Some(&admin), ResourceKind::BookRecord, Verb::Create, Target::None),
            Decision::Allow
        );
    }

    #[test]
    fn test_reviews_mutable_by_author_only() {
        let alice = principal(false);
        let bob = principal(false);
        let review = review_by(Some(alice.user_id));
        let orphan = review_by(None);

        for verb in [Verb::List, Verb::Get, Verb::Search, Verb::Create] {
            assert_eq!(
                evaluate(Some(&bob), ResourceKind::BookReview, verb, Target::Review(&review)),
                Decision::Allow
            );
        }
        for verb in [Verb::Update, Verb::Delete] {
            assert_eq!(
                evaluate(Some(&alice), ResourceKind::BookReview, verb, Target::Review(&review)),
                Decision::Allow
            );
            assert_eq!(
                evaluate(Some(&bob), ResourceKind::BookReview, verb, Target::Review(&review)),
                Decision::Deny
            );
            assert_eq!(
                evaluate(Some(&alice), ResourceKind::BookReview, verb, Target::Review(&orphan)),
                Decision::Deny
            );
        }
    }

    #[test]
    fn test_profiles_are_self_only_even_for_admins() {
        let alice = principal(false);
        let admin = principal(true);
        for verb in [Verb::Get, Verb::Update] {
            assert_eq!(
                evaluate(
                    Some(&alice),
                    ResourceKind::UserProfile,
                    verb,
                    Target::Profile(alice.user_id)
                ),
                Decision::Allow
            );
            assert_eq!(
                evaluate(
                    Some(&admin),
                    ResourceKind::UserProfile,
                    verb,
                    Target::Profile(alice.user_id)
                ),
                Decision::Deny
            );
        }
        assert_eq!(
            evaluate(
                Some(&alice),
                ResourceKind::UserProfile,
                Verb::Delete,
                Target::Profile(alice.user_id)
            ),
            Decision::Deny
        );
    }

    #[test]
    fn test_authorize_maps_denials_to_errors() {
        let err = authorize(
            &AuthContext::Anonymous,
            ResourceKind::Book,
            Verb::List,
            Target::None,
        )
        .unwrap_err();
        assert!(matches!(err, ShelfError::Unauthenticated));

        let ctx = AuthContext::Authenticated(principal(false));
        let err = authorize(&ctx, ResourceKind::Book, Verb::Create, Target::None).unwrap_err();
        assert!(matches!(err, ShelfError::Forbidden { .. }));

        let allowed = authorize(&ctx, ResourceKind::Book, Verb::Get, Target::None).unwrap();
        assert_eq!(Some(allowed), ctx.principal());
    }
}
