// Lazily assembled route table for a site
use crate::application::site::Site;
use crate::domain::error::RoutingError;
use crate::domain::resolver::{dashboard_url_name, site_url_name};
use std::sync::OnceLock;

pub const USER_HOME_PATH: &str = "/home/";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// What a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTarget {
    UserHome,
    Login,
    Logout,
    Panel {
        dashboard: String,
        panel: String,
        route: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    pub name: String,
    /// Absolute path, `:param` segments allowed.
    pub path: String,
    pub target: ViewTarget,
}

impl UrlPattern {
    fn new(name: String, path: String, target: ViewTarget) -> Self {
        Self { name, path, target }
    }

    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix(':'))
    }

    pub fn reverse(&self, args: &[(&str, &str)]) -> Result<String, RoutingError> {
        let segments = self
            .path
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(param) => args
                    .iter()
                    .find(|(key, _)| *key == param)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| RoutingError::MissingArgument {
                        name: self.name.clone(),
                        argument: param.to_string(),
                    }),
                None => Ok(segment),
            })
            .collect::<Result<Vec<&str>, RoutingError>>()?;

        Ok(segments.join("/"))
    }
}

/// Deferred route table: empty until first access, then fixed until
/// explicitly invalidated.
#[derive(Debug, Default)]
pub struct LazyUrlPatterns {
    cell: OnceLock<Vec<UrlPattern>>,
}

impl LazyUrlPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get_or_build<F>(&self, build: F) -> &[UrlPattern]
    where
        F: FnOnce() -> Vec<UrlPattern>,
    {
        self.cell.get_or_init(build)
    }

    /// Drops the built table so the next access rebuilds it.
    pub fn invalidate(&mut self) {
        if self.cell.take().is_some() {
            tracing::debug!("Invalidated URL patterns");
        }
    }
}

fn site_patterns(namespace: &str) -> Vec<UrlPattern> {
    vec![
        UrlPattern::new(
            site_url_name(namespace, "user_home"),
            USER_HOME_PATH.to_string(),
            ViewTarget::UserHome,
        ),
        UrlPattern::new(
            site_url_name(namespace, "login"),
            LOGIN_PATH.to_string(),
            ViewTarget::Login,
        ),
        UrlPattern::new(
            site_url_name(namespace, "logout"),
            LOGOUT_PATH.to_string(),
            ViewTarget::Logout,
        ),
    ]
}

/// Walks site -> dashboards -> panels -> routes in registry order.
pub fn build_patterns(site: &Site) -> Vec<UrlPattern> {
    let namespace = site.slug();
    let mut patterns = site_patterns(namespace);

    for dashboard in site.get_dashboards() {
        let dash = dashboard.slug();

        match dashboard.get_panel(dashboard.default_panel()) {
            Ok(default) => match default.route(default.index_url_name()) {
                Some(index) => patterns.push(UrlPattern::new(
                    dashboard_url_name(namespace, dash),
                    format!("/{}/{}", dash, index.path),
                    ViewTarget::Panel {
                        dashboard: dash.to_string(),
                        panel: default.slug().to_string(),
                        route: index.name.clone(),
                    },
                )),
                None => tracing::warn!(
                    "Default panel {} of dashboard {} has no route named {}",
                    default.slug(),
                    dash,
                    default.index_url_name()
                ),
            },
            Err(e) => tracing::warn!("Skipping root route of dashboard {}: {}", dash, e),
        }

        for panel in dashboard.get_panels() {
            for route in panel.routes() {
                patterns.push(UrlPattern::new(
                    panel.url_name(namespace, &route.name),
                    format!("/{}/{}/{}", dash, panel.slug(), route.path),
                    ViewTarget::Panel {
                        dashboard: dash.to_string(),
                        panel: panel.slug().to_string(),
                        route: route.name.clone(),
                    },
                ));
            }
        }
    }

    tracing::debug!("Built {} URL patterns for site {}", patterns.len(), site.slug());
    patterns
}

pub fn reverse(
    patterns: &[UrlPattern],
    name: &str,
    args: &[(&str, &str)],
) -> Result<String, RoutingError> {
    patterns
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| RoutingError::NoReverseMatch {
            name: name.to_string(),
        })?
        .reverse(args)
}
