// Panel domain model
use super::error::{RegistryError, RoutingError};
use super::resolver::{panel_url_name, UrlResolver};
use super::slug::{validate_slug, Slugged};
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_INDEX_URL_NAME: &str = "index";

/// A named route owned by a panel. `path` is relative to the panel root and
/// may contain `:param` segments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteSpec {
    pub name: String,
    #[serde(default)]
    pub path: String,
}

impl RouteSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

fn default_index_url_name() -> String {
    DEFAULT_INDEX_URL_NAME.to_string()
}

fn default_routes() -> Vec<RouteSpec> {
    vec![RouteSpec::new(DEFAULT_INDEX_URL_NAME, "")]
}

/// Declaration of a panel, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PanelSpec {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_index_url_name")]
    pub index_url_name: String,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteSpec>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

impl PanelSpec {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            index_url_name: default_index_url_name(),
            routes: default_routes(),
            roles: Vec::new(),
            services: Vec::new(),
        }
    }

    pub fn with_route(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.push(RouteSpec::new(name, path));
        self
    }

    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_services(mut self, services: &[&str]) -> Self {
        self.services = services.iter().map(|s| s.to_string()).collect();
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        validate_slug(&self.slug)?;

        let mut names = HashSet::new();
        let mut shapes = HashSet::new();
        for route in &self.routes {
            let shape = route_shape(&route.path).map_err(|reason| RegistryError::InvalidRoutePath {
                panel: self.slug.clone(),
                path: route.path.clone(),
                reason,
            })?;
            if !names.insert(route.name.as_str()) {
                return Err(RegistryError::DuplicateRoute {
                    panel: self.slug.clone(),
                    route: route.name.clone(),
                });
            }
            // ":id/" and ":name/" match the same requests.
            if !shapes.insert(shape) {
                return Err(RegistryError::DuplicateRoute {
                    panel: self.slug.clone(),
                    route: route.path.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Validates a relative route path and returns it with every parameter name
/// erased.
fn route_shape(path: &str) -> Result<String, &'static str> {
    if path.starts_with('/') {
        return Err("path must be relative");
    }

    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut params = HashSet::new();
    let mut shape = Vec::with_capacity(segments.len());

    for (idx, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            if idx != last {
                return Err("empty path segment");
            }
            shape.push("");
            continue;
        }
        if segment.contains('*') {
            return Err("wildcard segments are not supported");
        }
        match segment.strip_prefix(':') {
            Some(param) => {
                if param.is_empty() || param.contains(':') {
                    return Err("parameter segment needs a name");
                }
                if !params.insert(param) {
                    return Err("parameter name repeated");
                }
                shape.push(":");
            }
            None if segment.contains(':') => {
                return Err("parameter must start its segment");
            }
            None => shape.push(segment),
        }
    }

    Ok(shape.join("/"))
}

impl Slugged for PanelSpec {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// A panel registered with a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    spec: PanelSpec,
    registered_with: String,
}

impl Panel {
    pub(crate) fn new(spec: PanelSpec, dashboard: &str) -> Result<Self, RegistryError> {
        spec.validate()?;
        Ok(Self {
            spec,
            registered_with: dashboard.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn slug(&self) -> &str {
        &self.spec.slug
    }

    /// Slug of the dashboard this panel is registered with.
    pub fn registered_with(&self) -> &str {
        &self.registered_with
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.spec.routes
    }

    pub fn route(&self, name: &str) -> Option<&RouteSpec> {
        self.spec.routes.iter().find(|r| r.name == name)
    }

    pub fn index_url_name(&self) -> &str {
        &self.spec.index_url_name
    }

    pub fn set_index_url_name(&mut self, name: impl Into<String>) {
        self.spec.index_url_name = name.into();
    }

    pub fn required_roles(&self) -> &[String] {
        &self.spec.roles
    }

    pub fn required_services(&self) -> &[String] {
        &self.spec.services
    }

    pub fn url_name(&self, namespace: &str, route: &str) -> String {
        panel_url_name(namespace, &self.registered_with, self.slug(), route)
    }

    pub fn get_absolute_url(&self, resolver: &dyn UrlResolver) -> Result<String, RoutingError> {
        let name = self.url_name(resolver.namespace(), self.index_url_name());
        resolver.reverse(&name, &[])
    }
}

impl Slugged for Panel {
    fn slug(&self) -> &str {
        &self.spec.slug
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Panel: {}>", self.slug())
    }
}
