use async_trait::async_trait;

use encore_models::{NewUser, User, UserId};

/// A user together with the stored password hash. Only login needs this.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Store interface for user accounts.
///
/// Every read returns the public [`User`] projection; the password hash is
/// only reachable through [`UserRepository::find_credentials_by_email`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, new_user: NewUser) -> anyhow::Result<User>;

    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>>;

    /// All users in creation order.
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;

    async fn find_credentials_by_email(&self, email: &str)
    -> anyhow::Result<Option<UserCredentials>>;

    /// Persists every mutable field of `user` and refreshes `updated_at`.
    /// The password hash is replaced only when one is given. Returns `None`
    /// if the record no longer exists.
    async fn save(&self, user: &User, password_hash: Option<&str>)
    -> anyhow::Result<Option<User>>;

    /// Hard delete. Returns whether a record was removed.
    async fn delete(&self, id: UserId) -> anyhow::Result<bool>;
}
