// HTTP request handlers
use crate::application::access::{can_access, check_access, AccessDenied};
use crate::application::site::Site;
use crate::application::urls::LOGIN_PATH;
use crate::domain::dashboard::Dashboard;
use crate::domain::resolver::{site_url_name, UrlResolver};
use crate::domain::user::User;
use crate::infrastructure::http_response::{
    expired_session_cookie, found, found_with_cookie, login_required, session_cookie,
    session_token,
};
use crate::presentation::app_state::AppState;
use axum::{
    body::Body,
    extract::{Form, Path, Query, State},
    http::{HeaderMap, Response, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// The dashboard/panel/route a generated panel route dispatches to.
#[derive(Debug, Clone)]
pub struct PanelTarget {
    pub dashboard: String,
    pub panel: String,
    pub route: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn login_path(site: &Site) -> String {
    site.reverse(&site_url_name(site.slug(), "login"), &[])
        .unwrap_or_else(|_| LOGIN_PATH.to_string())
}

/// Only same-site absolute paths are honoured as redirect targets. Browsers
/// read `\` as `/`, so `/\host` is as off-site as `//host`.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && !n.chars().any(char::is_control)
    })
}

/// Path and query of the request, returned to after login.
fn requested_path(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let token = session_token(headers)?;
    match state.sessions.get(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            None
        }
    }
}

pub async fn login_form(
    Query(query): Query<LoginQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(json!({
        "site": state.site.name(),
        "form": ["username", "password"],
        "next": safe_next(query.next.as_deref()),
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response<Body> {
    let user = match state.identity.authenticate(&form.username, &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid user name or password." })),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Identity backend failed for {}: {}", form.username, e);
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };

    let location = match safe_next(form.next.as_deref()) {
        Some(next) => next.to_string(),
        None => state.site.get_user_home(&user).unwrap_or_else(|e| {
            tracing::warn!("No home for {}: {}", user.username, e);
            "/".to_string()
        }),
    };

    let username = user.username.clone();
    match state.sessions.create(user).await {
        Ok(token) => {
            tracing::info!("Logged in {}", username);
            found_with_cookie(&location, &session_cookie(&token))
        }
        Err(e) => {
            tracing::error!("Could not create session for {}: {}", username, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn logout(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response<Body> {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.sessions.remove(&token).await {
            tracing::error!("Could not remove session: {}", e);
        }
        tracing::info!("Logged out session");
    }
    found_with_cookie(&login_path(&state.site), &expired_session_cookie())
}

pub async fn user_home(
    headers: HeaderMap,
    uri: Uri,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let Some(user) = current_user(&state, &headers).await else {
        return login_required(&login_path(&state.site), requested_path(&uri), &headers);
    };

    match state.site.get_user_home(&user) {
        Ok(home) => found(&home),
        Err(e) => {
            tracing::warn!("No home for {}: {}", user.username, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn dashboard_nav(site: &Site, dashboard: &Dashboard, user: &User) -> Value {
    let groups: Vec<Value> = dashboard
        .get_panel_groups()
        .into_iter()
        .filter_map(|group| {
            let panels: Vec<Value> = group
                .panels
                .iter()
                .filter(|p| can_access(Some(user), dashboard, p))
                .map(|p| {
                    json!({
                        "slug": p.slug(),
                        "name": p.name(),
                        "url": p.get_absolute_url(site).ok(),
                    })
                })
                .collect();
            if panels.is_empty() {
                return None;
            }
            Some(json!({ "slug": group.slug, "name": group.name, "panels": panels }))
        })
        .collect();
    Value::Array(groups)
}

fn accessible_dashboards(site: &Site, user: &User) -> Value {
    site.get_dashboards()
        .into_iter()
        .filter(|d| d.get_panels().iter().any(|p| can_access(Some(user), d, p)))
        .map(|d| {
            json!({
                "slug": d.slug(),
                "name": d.name(),
                "url": d.get_absolute_url(site).ok(),
            })
        })
        .collect()
}

/// Gates a panel route and returns the view context the template layer
/// would render.
pub async fn panel_view(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    params: Option<Path<HashMap<String, String>>>,
    target: PanelTarget,
) -> Response<Body> {
    let user = current_user(&state, &headers).await;
    let site = &state.site;

    let (dashboard, panel) = match site
        .get_dashboard(target.dashboard.as_str())
        .and_then(|d| d.get_panel(target.panel.as_str()).map(|p| (d, p)))
    {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!("Route for {} no longer resolves: {}", uri.path(), e);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    match check_access(user.as_ref(), dashboard, panel) {
        Ok(()) => {}
        Err(AccessDenied::NotAuthenticated) | Err(AccessDenied::NotAuthorized(_)) => {
            return login_required(&login_path(site), requested_path(&uri), &headers);
        }
        Err(e @ AccessDenied::ServiceUnavailable(_)) => {
            tracing::debug!("Denied {}: {}", uri.path(), e);
            return StatusCode::NOT_FOUND.into_response();
        }
    }

    let Some(user) = user else {
        return login_required(&login_path(site), requested_path(&uri), &headers);
    };
    let params = params.map(|Path(p)| p).unwrap_or_default();

    Json(json!({
        "site": { "name": site.name(), "slug": site.slug() },
        "user": &user,
        "dashboard": {
            "slug": dashboard.slug(),
            "name": dashboard.name(),
            "url": dashboard.get_absolute_url(site).ok(),
        },
        "panel": {
            "slug": panel.slug(),
            "name": panel.name(),
            "url": panel.get_absolute_url(site).ok(),
        },
        "route": target.route,
        "params": params,
        "dashboards": accessible_dashboards(site, &user),
        "panel_groups": dashboard_nav(site, dashboard, &user),
    }))
    .into_response()
}
