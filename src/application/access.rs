// Access gating for dashboards and panels
use crate::domain::dashboard::Dashboard;
use crate::domain::panel::Panel;
use crate::domain::user::User;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("login required")]
    NotAuthenticated,

    #[error("missing required roles: {}", .0.join(", "))]
    NotAuthorized(Vec<String>),

    #[error("required services are unavailable: {}", .0.join(", "))]
    ServiceUnavailable(Vec<String>),
}

fn missing<'a>(required: impl Iterator<Item = &'a String>, has: impl Fn(&str) -> bool) -> Vec<String> {
    required.filter(|r| !has(r.as_str())).cloned().collect()
}

/// Checks the dashboard's and the panel's requirements against `user`.
/// Roles are checked before services.
pub fn check_access(
    user: Option<&User>,
    dashboard: &Dashboard,
    panel: &Panel,
) -> Result<(), AccessDenied> {
    let user = user.ok_or(AccessDenied::NotAuthenticated)?;

    let roles = dashboard.required_roles().iter().chain(panel.required_roles());
    let missing_roles = missing(roles, |r| user.has_role(r));
    if !missing_roles.is_empty() {
        return Err(AccessDenied::NotAuthorized(missing_roles));
    }

    let services = dashboard
        .required_services()
        .iter()
        .chain(panel.required_services());
    let missing_services = missing(services, |s| user.has_service(s));
    if !missing_services.is_empty() {
        return Err(AccessDenied::ServiceUnavailable(missing_services));
    }

    Ok(())
}

pub fn can_access(user: Option<&User>, dashboard: &Dashboard, panel: &Panel) -> bool {
    check_access(user, dashboard, panel).is_ok()
}
