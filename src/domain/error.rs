// Registry and routing errors
use thiserror::Error;

/// Which kind of registry entry an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dashboard,
    Panel,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Dashboard => f.write_str("Dashboard"),
            EntryKind::Panel => f.write_str("Panel"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid slug {slug:?}: {reason}")]
    InvalidSlug { slug: String, reason: &'static str },

    #[error("{kind} with slug {slug:?} is already registered with {scope}")]
    AlreadyRegistered {
        kind: EntryKind,
        slug: String,
        scope: String,
    },

    #[error("{kind} with slug {slug:?} is not registered with {scope}")]
    NotRegistered {
        kind: EntryKind,
        slug: String,
        scope: String,
    },

    #[error("default panel {panel:?} of dashboard {dashboard:?} is not registered")]
    DefaultPanelMissing { dashboard: String, panel: String },

    #[error("panel {panel:?} is the default panel of dashboard {dashboard:?} and cannot be unregistered")]
    DefaultPanelProtected { dashboard: String, panel: String },

    #[error("dashboard {0:?} declares both a flat panel list and panel groups")]
    AmbiguousPanelLayout(String),

    #[error("panel {panel:?} declares route {route:?} more than once")]
    DuplicateRoute { panel: String, route: String },

    #[error("panel {panel:?} route path {path:?} is invalid: {reason}")]
    InvalidRoutePath {
        panel: String,
        path: String,
        reason: &'static str,
    },

    #[error("no default dashboard is configured")]
    NoDefaultDashboard,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("reverse for {name:?} not found")]
    NoReverseMatch { name: String },

    #[error("reverse for {name:?} requires argument {argument:?}")]
    MissingArgument { name: String, argument: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
