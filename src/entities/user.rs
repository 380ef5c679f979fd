//! Identity principals and their profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::entity::Entity;

/// A registered user. Credentials live with the authentication provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    /// Blob key of the profile photo
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
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

    fn detail_path(&self) -> String {
        format!("/auth/users/{}", self.id)
    }
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>, is_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            is_admin,
            photo: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: ProfileInput) {
        if let Some(username) = input.username {
            self.username = username;
        }
        if let Some(email) = input.email {
            self.email = email;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_photo(&mut self, key: String) {
        self.photo = Some(key);
        self.updated_at = Utc::now();
    }
}

/// Self-service profile update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    pub pk: Uuid,
    pub username: String,
    pub email: String,
    pub photo: Option<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            pk: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            photo: user.photo.clone(),
        }
    }
}
