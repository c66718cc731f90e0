//! Login collaborator.
//!
//! Authentication is a plain username lookup plus password comparison. No
//! hashing and no session tokens: the client holds the returned identity.

use async_trait::async_trait;
use common::UserId;
use inventory_store::{EntityStore, NewUser, User};
use serde::Serialize;

use crate::error::DomainError;
use crate::validation::ValidationErrors;

/// Login input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.is_empty() {
            errors.push("username", "Username is required");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity returned on successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Trait for login backends.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Checks credentials, returning the user's public identity.
    ///
    /// Fails with `Validation` if a field is empty or `InvalidCredentials`
    /// if the user is unknown or the password does not match.
    async fn authenticate(&self, credentials: Credentials)
    -> Result<AuthenticatedUser, DomainError>;
}

/// Authenticator comparing plain-text passwords held in the entity store.
pub struct PasswordAuthenticator<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> PasswordAuthenticator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: EntityStore> Authenticator for PasswordAuthenticator<S> {
    #[tracing::instrument(skip(self))]
    async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<AuthenticatedUser, DomainError> {
        credentials.validate()?;

        let user = self
            .store
            .get_user_by_username(&credentials.username)
            .await?
            .filter(|u| u.password == credentials.password);

        match user {
            Some(user) => {
                metrics::counter!("inventory_logins_total", "outcome" => "success").increment(1);
                tracing::info!(user_id = %user.id, "login succeeded");
                Ok(user.into())
            }
            None => {
                metrics::counter!("inventory_logins_total", "outcome" => "failure").increment(1);
                tracing::warn!(username = %credentials.username, "login failed");
                Err(DomainError::InvalidCredentials)
            }
        }
    }
}

/// Seeds the administrator account unless a user with that name exists.
///
/// Returns the existing or newly created user.
pub async fn bootstrap_admin<S: EntityStore>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<User, DomainError> {
    if let Some(existing) = store.get_user_by_username(username).await? {
        return Ok(existing);
    }

    let user = store.create_user(NewUser::new(username, password)).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "admin user seeded");
    Ok(user)
}
