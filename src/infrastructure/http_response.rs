// HTTP response utilities for redirects, login gating and session cookies
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
    response::IntoResponse,
};

pub const SESSION_COOKIE: &str = "horizon_session";
pub const HORIZON_LOCATION: &str = "x-horizon-location";

/// 302 redirect to `location`.
pub fn found(location: &str) -> Response<Body> {
    with_header(StatusCode::FOUND, header::LOCATION, location)
}

/// Requests sent by the dashboard's own scripts.
pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

/// Login page URL carrying `next` as a single query value. Slashes stay
/// readable; `&`, `=`, `?` and the rest are percent-encoded.
pub fn login_url(login_path: &str, next: &str) -> String {
    let encoded = urlencoding::encode(next).replace("%2F", "/");
    format!("{}?next={}", login_path, encoded)
}

/// Sends the client to the login page. AJAX callers cannot follow a redirect
/// into a page, so they get a 401 carrying the target in `X-Horizon-Location`.
pub fn login_required(login_path: &str, next: &str, headers: &HeaderMap) -> Response<Body> {
    let target = login_url(login_path, next);
    if is_ajax(headers) {
        with_header(StatusCode::UNAUTHORIZED, HORIZON_LOCATION, &target)
    } else {
        found(&target)
    }
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Redirect that also sets (or clears) the session cookie.
pub fn found_with_cookie(location: &str, cookie: &str) -> Response<Body> {
    let mut response = found(location);
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
            response
        }
        Err(e) => {
            tracing::error!("Invalid session cookie: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn with_header<K>(status: StatusCode, name: K, value: &str) -> Response<Body>
where
    K: header::IntoHeaderName,
{
    let value = match HeaderValue::from_str(value) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Invalid header value {:?}: {}", value, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = status.into_response();
    response.headers_mut().insert(name, value);
    response
}
