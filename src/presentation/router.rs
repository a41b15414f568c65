// Router generated from the site's route table
use crate::application::urls::ViewTarget;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, login, login_form, logout, panel_view, user_home, PanelTarget,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Uri},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new().route("/healthz", get(health_check));

    for pattern in state.site.iter_urls() {
        router = match &pattern.target {
            ViewTarget::UserHome => router.route(&pattern.path, get(user_home)),
            ViewTarget::Login => router.route(&pattern.path, get(login_form).post(login)),
            ViewTarget::Logout => router.route(&pattern.path, get(logout)),
            ViewTarget::Panel {
                dashboard,
                panel,
                route,
            } => {
                let target = PanelTarget {
                    dashboard: dashboard.clone(),
                    panel: panel.clone(),
                    route: route.clone(),
                };
                router.route(
                    &pattern.path,
                    get(
                        move |state: State<Arc<AppState>>,
                              headers: HeaderMap,
                              uri: Uri,
                              params: Option<Path<HashMap<String, String>>>| {
                            panel_view(state, headers, uri, params, target.clone())
                        },
                    ),
                )
            }
        };
    }

    tracing::debug!("Mounted {} routes", state.site.url_patterns().len());

    router
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_response::HORIZON_LOCATION;
    use crate::infrastructure::memory_sessions::InMemorySessionStore;
    use crate::infrastructure::static_identity::StaticIdentityBackend;
    use crate::test_support::{fixture_config, fixture_site};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(
            fixture_site(),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(StaticIdentityBackend::new(fixture_config().users)),
        );
        build_router(Arc::new(state))
    }

    async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_login(app: &Router, body: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    /// Logs in and returns the `name=value` cookie pair.
    async fn login_as(app: &Router, username: &str, password: &str) -> String {
        let response = post_login(app, &format!("username={}&password={}", username, password)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        cookie.split(';').next().unwrap().to_string()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = get(&app(), "/healthz", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_anonymous_request_redirects_to_login() {
        let response = get(&app(), "/dogs/puppies/", None).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth/login?next=/dogs/puppies/"
        );
    }

    #[tokio::test]
    async fn test_anonymous_ajax_request_gets_401() {
        let request = Request::builder()
            .uri("/dogs/puppies/")
            .header("X-Requested-With", "XMLHttpRequest")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[HORIZON_LOCATION],
            "/auth/login?next=/dogs/puppies/"
        );
    }

    #[tokio::test]
    async fn test_login_redirects_to_user_home() {
        let app = app();
        let response = post_login(&app, "username=test_user&password=password").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/cats/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("horizon_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_login_honours_next() {
        let app = app();
        let response = post_login(
            &app,
            "username=test_user&password=password&next=%2Fdogs%2Fpuppies%2F",
        )
        .await;
        assert_eq!(response.headers()[header::LOCATION], "/dogs/puppies/");

        let response = post_login(
            &app,
            "username=test_user&password=password&next=%2F%2Fevil.example.com%2F",
        )
        .await;
        assert_eq!(response.headers()[header::LOCATION], "/cats/");

        for next in ["%2F%5Cevil.example.com", "%2Fcats%2F%0D%0ASet-Cookie%3Ax", "cats%2F"] {
            let response = post_login(
                &app,
                &format!("username=test_user&password=password&next={}", next),
            )
            .await;
            assert_eq!(response.headers()[header::LOCATION], "/cats/", "next={}", next);
        }
    }

    #[tokio::test]
    async fn test_next_survives_the_login_round_trip() {
        let app = app();

        let response = get(&app, "/cats/tigers/a&b=c/", None).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert_eq!(location, "/auth/login?next=/cats/tigers/a%26b%3Dc/");

        let body = json_body(get(&app, &location, None).await).await;
        assert_eq!(body["next"], "/cats/tigers/a&b=c/");

        let response = get(&app, "/dogs/puppies/?page=2", None).await;
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        let body = json_body(get(&app, &location, None).await).await;
        assert_eq!(body["next"], "/dogs/puppies/?page=2");
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let response = post_login(&app(), "username=test_user&password=nope").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_login_form_context() {
        let response = get(&app(), "/auth/login?next=/cats/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["next"], "/cats/");
        assert_eq!(body["site"], "Horizon");
    }

    #[tokio::test]
    async fn test_panel_view_context() {
        let app = app();
        let cookie = login_as(&app, "test_user", "password").await;

        let response = get(&app, "/cats/tigers/", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["dashboard"]["slug"], "cats");
        assert_eq!(body["dashboard"]["url"], "/cats/");
        assert_eq!(body["panel"]["url"], "/cats/tigers/");
        assert_eq!(body["route"], "index");
        assert_eq!(body["user"]["username"], "test_user");
        assert_eq!(body["dashboards"].as_array().unwrap().len(), 2);

        let groups = body["panel_groups"].as_array().unwrap();
        let group_slugs: Vec<&str> = groups.iter().map(|g| g["slug"].as_str().unwrap()).collect();
        assert_eq!(group_slugs, vec!["kittens", "tigers"]);
    }

    #[tokio::test]
    async fn test_dashboard_root_serves_default_panel() {
        let app = app();
        let cookie = login_as(&app, "test_user", "password").await;

        let body = json_body(get(&app, "/dogs/", Some(&cookie)).await).await;
        assert_eq!(body["panel"]["slug"], "puppies");
        assert_eq!(body["route"], "index");
    }

    #[tokio::test]
    async fn test_route_params_reach_the_view() {
        let app = app();
        let cookie = login_as(&app, "test_user", "password").await;

        let body = json_body(get(&app, "/cats/tigers/42/", Some(&cookie)).await).await;
        assert_eq!(body["route"], "detail");
        assert_eq!(body["params"]["tiger_id"], "42");
    }

    #[tokio::test]
    async fn test_missing_service_is_not_found() {
        let app = app();
        let cookie = login_as(&app, "guest", "guest").await;

        let response = get(&app, "/cats/tigers/", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(get(&app, "/cats/", Some(&cookie)).await).await;
        let groups = body["panel_groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["slug"], "kittens");
    }

    #[tokio::test]
    async fn test_user_home() {
        let app = app();
        let response = get(&app, "/home/", None).await;
        assert_eq!(response.headers()[header::LOCATION], "/auth/login?next=/home/");

        let cookie = login_as(&app, "test_user", "password").await;
        let response = get(&app, "/home/", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/cats/");
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = app();
        let cookie = login_as(&app, "test_user", "password").await;

        let response = get(&app, "/auth/logout", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));

        let response = get(&app, "/cats/", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_unknown_panel_is_not_found() {
        let response = get(&app(), "/cats/lions/", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
