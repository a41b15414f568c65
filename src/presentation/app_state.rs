// Application state for HTTP handlers
use crate::application::identity::IdentityBackend;
use crate::application::session_store::SessionStore;
use crate::application::site::Site;
use std::sync::Arc;

pub struct AppState {
    pub site: Site,
    pub sessions: Arc<dyn SessionStore>,
    pub identity: Arc<dyn IdentityBackend>,
}

impl AppState {
    pub fn new(
        site: Site,
        sessions: Arc<dyn SessionStore>,
        identity: Arc<dyn IdentityBackend>,
    ) -> Self {
        Self {
            site,
            sessions,
            identity,
        }
    }
}
