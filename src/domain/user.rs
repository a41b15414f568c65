// Authenticated principal
use serde::Serialize;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub tenant: Option<String>,
    pub roles: Vec<String>,
    /// Service catalog types available to this user (e.g. "compute").
    pub services: Vec<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id: username.clone(),
            username,
            tenant: None,
            roles: Vec::new(),
            services: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_services(mut self, services: &[&str]) -> Self {
        self.services = services.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn has_service(&self, service: &str) -> bool {
        self.services.iter().any(|s| s == service)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_case_insensitive() {
        let user = User::new("demo").with_roles(&["Admin", "member"]);
        assert!(user.is_admin());
        assert!(user.has_role("MEMBER"));
        assert!(!user.has_role("reseller"));
    }

    #[test]
    fn test_has_service() {
        let user = User::new("demo").with_services(&["compute", "image"]);
        assert!(user.has_service("compute"));
        assert!(!user.has_service("object-store"));
    }
}
