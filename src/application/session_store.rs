// Session store trait - maps session tokens to authenticated users
use crate::domain::user::User;
use async_trait::async_trait;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session for `user` and returns its token
    async fn create(&self, user: User) -> anyhow::Result<String>;

    async fn get(&self, token: &str) -> anyhow::Result<Option<User>>;

    /// Removes a session; removing an unknown token is not an error
    async fn remove(&self, token: &str) -> anyhow::Result<()>;
}
