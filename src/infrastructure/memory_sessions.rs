// In-memory session store
use crate::application::session_store::SessionStore;
use crate::domain::user::User;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct Session {
    user: User,
    created: Instant,
}

/// Sessions live for a fixed time after login. Expired entries are dropped
/// when looked up and swept on every new login, so the map only holds
/// sessions younger than the TTL plus the ones created since the last sweep.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_live(&self, session: &Session) -> bool {
        session.created.elapsed() < self.ttl
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user: User) -> anyhow::Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, session| self.is_live(session));
        if sessions.len() < before {
            tracing::debug!("Expired {} sessions", before - sessions.len());
        }

        sessions.insert(
            token.clone(),
            Session {
                user,
                created: Instant::now(),
            },
        );
        Ok(token)
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<User>> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if self.is_live(session) => return Ok(Some(session.user.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        self.sessions.write().await.remove(token);
        Ok(None)
    }

    async fn remove(&self, token: &str) -> anyhow::Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = InMemorySessionStore::new();
        let user = User::new("test_user");

        let token = store.create(user.clone()).await.unwrap();
        assert_eq!(store.get(&token).await.unwrap(), Some(user));

        store.remove(&token).await.unwrap();
        assert_eq!(store.get(&token).await.unwrap(), None);
        store.remove(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = InMemorySessionStore::new();
        let a = store.create(User::new("a")).await.unwrap();
        let b = store.create(User::new("a")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped() {
        let store = InMemorySessionStore::with_ttl(Duration::ZERO);
        let first = store.create(User::new("a")).await.unwrap();
        assert_eq!(store.get(&first).await.unwrap(), None);
        assert_eq!(store.len().await, 0);

        store.create(User::new("b")).await.unwrap();
        store.create(User::new("c")).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_live_sessions_survive_a_sweep() {
        let store = InMemorySessionStore::with_ttl(Duration::from_secs(60));
        let first = store.create(User::new("a")).await.unwrap();
        store.create(User::new("b")).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get(&first).await.unwrap(), Some(User::new("a")));
    }
}
