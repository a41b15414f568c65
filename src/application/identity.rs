// Identity backend trait - authenticates credentials into a principal
use crate::domain::user::User;
use async_trait::async_trait;

#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Returns the user on success, `None` when the credentials are rejected.
    async fn authenticate(&self, username: &str, password: &str) -> anyhow::Result<Option<User>>;
}
