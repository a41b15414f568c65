// Site registry - the root of the dashboard/panel tree
use crate::application::urls::{self, LazyUrlPatterns, UrlPattern};
use crate::domain::dashboard::{Dashboard, DashboardSpec};
use crate::domain::error::{EntryKind, RegistryError, RoutingError};
use crate::domain::resolver::UrlResolver;
use crate::domain::slug::Slugged;
use crate::domain::user::User;
use crate::infrastructure::config::SiteSettings;
use std::sync::Arc;

/// Dashboard slugs that would shadow site-level routes.
const RESERVED_SLUGS: &[&str] = &["auth", "home", "healthz"];

pub type HomeResolver = dyn Fn(&User, &Site) -> Result<String, RoutingError> + Send + Sync;

/// Where a user lands after logging in.
#[derive(Clone, Default)]
pub enum UserHome {
    #[default]
    DefaultDashboard,
    Url(String),
    Dashboard(String),
    Custom(Arc<HomeResolver>),
}

impl UserHome {
    /// Values starting with `/` or containing `://` are URLs, anything else
    /// names a dashboard.
    pub fn parse(value: &str) -> Self {
        if value.starts_with('/') || value.contains("://") {
            UserHome::Url(value.to_string())
        } else {
            UserHome::Dashboard(value.to_string())
        }
    }

    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(&User, &Site) -> Result<String, RoutingError> + Send + Sync + 'static,
    {
        UserHome::Custom(Arc::new(resolver))
    }
}

impl std::fmt::Debug for UserHome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserHome::DefaultDashboard => f.write_str("DefaultDashboard"),
            UserHome::Url(url) => f.debug_tuple("Url").field(url).finish(),
            UserHome::Dashboard(slug) => f.debug_tuple("Dashboard").field(slug).finish(),
            UserHome::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub struct Site {
    name: String,
    slug: String,
    dashboards: Vec<Dashboard>,
    ordering: Vec<String>,
    default_dashboard: Option<String>,
    user_home: UserHome,
    urls: LazyUrlPatterns,
}

impl Site {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            dashboards: Vec::new(),
            ordering: Vec::new(),
            default_dashboard: None,
            user_home: UserHome::default(),
            urls: LazyUrlPatterns::new(),
        }
    }

    pub fn from_settings(settings: &SiteSettings) -> Self {
        let mut site = Self::new(settings.name.clone(), settings.slug.clone());
        site.ordering = settings.dashboards.clone();
        site.default_dashboard = settings.default_dashboard.clone();
        if let Some(home) = &settings.user_home {
            site.user_home = UserHome::parse(home);
        }
        site
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn set_ordering(&mut self, ordering: &[&str]) {
        self.ordering = ordering.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_default_dashboard(&mut self, slug: Option<&str>) {
        self.default_dashboard = slug.map(str::to_string);
    }

    pub fn set_user_home(&mut self, user_home: UserHome) {
        self.user_home = user_home;
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }

    /// Registers a dashboard and returns it so panels can be registered
    /// straight away.
    pub fn register(&mut self, spec: DashboardSpec) -> Result<&mut Dashboard, RegistryError> {
        if RESERVED_SLUGS.contains(&spec.slug.as_str()) {
            return Err(RegistryError::InvalidSlug {
                slug: spec.slug.clone(),
                reason: "slug is reserved for site routes",
            });
        }
        if self.position(spec.slug()).is_some() {
            return Err(RegistryError::AlreadyRegistered {
                kind: EntryKind::Dashboard,
                slug: spec.slug.clone(),
                scope: self.slug.clone(),
            });
        }

        let dashboard = Dashboard::new(spec, &self.slug)?;
        tracing::debug!("Registered dashboard {} with site {}", dashboard.slug(), self.slug);
        self.dashboards.push(dashboard);
        let idx = self.dashboards.len() - 1;
        Ok(&mut self.dashboards[idx])
    }

    pub fn unregister<K: Slugged + ?Sized>(&mut self, key: &K) -> Result<Dashboard, RegistryError> {
        let slug = key.slug();
        let idx = self.position(slug).ok_or_else(|| self.not_registered(slug))?;
        tracing::debug!("Unregistered dashboard {} from site {}", slug, self.slug);
        Ok(self.dashboards.remove(idx))
    }

    pub fn get_dashboard<K: Slugged + ?Sized>(&self, key: &K) -> Result<&Dashboard, RegistryError> {
        let slug = key.slug();
        self.position(slug)
            .map(|idx| &self.dashboards[idx])
            .ok_or_else(|| self.not_registered(slug))
    }

    pub fn get_dashboard_mut<K: Slugged + ?Sized>(
        &mut self,
        key: &K,
    ) -> Result<&mut Dashboard, RegistryError> {
        let slug = key.slug();
        match self.position(slug) {
            Some(idx) => Ok(&mut self.dashboards[idx]),
            None => Err(self.not_registered(slug)),
        }
    }

    /// Configured ordering first, remaining dashboards sorted by slug. A slug
    /// listed more than once is emitted at its first position only.
    pub fn get_dashboards(&self) -> Vec<&Dashboard> {
        let mut ordered: Vec<&Dashboard> = Vec::with_capacity(self.dashboards.len());
        for slug in &self.ordering {
            if ordered.iter().any(|d| d.slug() == slug) {
                continue;
            }
            if let Ok(dashboard) = self.get_dashboard(slug.as_str()) {
                ordered.push(dashboard);
            }
        }

        let mut extra: Vec<&Dashboard> = self
            .dashboards
            .iter()
            .filter(|d| !self.ordering.iter().any(|s| s == d.slug()))
            .collect();
        extra.sort_by(|a, b| a.slug().cmp(b.slug()));

        ordered.extend(extra);
        ordered
    }

    pub fn get_default_dashboard(&self) -> Result<&Dashboard, RegistryError> {
        let slug = self
            .default_dashboard
            .as_deref()
            .ok_or(RegistryError::NoDefaultDashboard)?;
        self.get_dashboard(slug)
    }

    pub fn get_user_home(&self, user: &User) -> Result<String, RoutingError> {
        match &self.user_home {
            UserHome::DefaultDashboard => self.get_default_dashboard()?.get_absolute_url(self),
            UserHome::Url(url) => Ok(url.clone()),
            UserHome::Dashboard(slug) => self.get_dashboard(slug.as_str())?.get_absolute_url(self),
            UserHome::Custom(resolver) => resolver(user, self),
        }
    }

    /// The route table, built on first call.
    pub fn url_patterns(&self) -> &[UrlPattern] {
        self.urls.get_or_build(|| urls::build_patterns(self))
    }

    pub fn iter_urls(&self) -> std::slice::Iter<'_, UrlPattern> {
        self.url_patterns().iter()
    }

    pub fn urls_built(&self) -> bool {
        self.urls.is_built()
    }

    pub fn invalidate_urls(&mut self) {
        self.urls.invalidate();
    }

    fn position(&self, slug: &str) -> Option<usize> {
        self.dashboards.iter().position(|d| d.slug() == slug)
    }

    fn not_registered(&self, slug: &str) -> RegistryError {
        RegistryError::NotRegistered {
            kind: EntryKind::Dashboard,
            slug: slug.to_string(),
            scope: self.slug.clone(),
        }
    }
}

impl UrlResolver for Site {
    fn namespace(&self) -> &str {
        &self.slug
    }

    fn reverse(&self, name: &str, args: &[(&str, &str)]) -> Result<String, RoutingError> {
        urls::reverse(self.url_patterns(), name, args)
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Site: {}>", self.slug)
    }
}
