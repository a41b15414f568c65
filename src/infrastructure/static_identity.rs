// Identity backend backed by the users declared in configuration
use crate::application::identity::IdentityBackend;
use crate::domain::user::User;
use crate::infrastructure::config::UserRecord;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct StaticIdentityBackend {
    users: Vec<UserRecord>,
}

impl StaticIdentityBackend {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl IdentityBackend for StaticIdentityBackend {
    async fn authenticate(&self, username: &str, password: &str) -> anyhow::Result<Option<User>> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(UserRecord::to_user);

        if user.is_none() {
            tracing::debug!("Rejected credentials for {}", username);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_config;

    #[tokio::test]
    async fn test_authenticate() {
        let backend = StaticIdentityBackend::new(fixture_config().users);

        let user = backend.authenticate("test_user", "password").await.unwrap();
        assert_eq!(user.map(|u| u.username), Some("test_user".to_string()));

        assert!(backend.authenticate("test_user", "wrong").await.unwrap().is_none());
        assert!(backend.authenticate("nobody", "password").await.unwrap().is_none());
    }
}
