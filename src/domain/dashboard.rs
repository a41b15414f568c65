// Dashboard domain model
use super::error::{EntryKind, RegistryError, RoutingError};
use super::panel::{Panel, PanelSpec};
use super::resolver::{dashboard_url_name, UrlResolver};
use super::slug::{validate_slug, Slugged};
use serde::Deserialize;

pub const DEFAULT_GROUP_SLUG: &str = "default";
pub const OTHER_GROUP_SLUG: &str = "other";
const OTHER_GROUP_NAME: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PanelGroupSpec {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub panels: Vec<String>,
}

/// Declaration of a dashboard. Panels are declared either as a flat list of
/// slugs or as named groups, never both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardSpec {
    pub name: String,
    pub slug: String,
    pub default_panel: String,
    #[serde(default)]
    pub panels: Vec<String>,
    #[serde(default)]
    pub panel_groups: Vec<PanelGroupSpec>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

impl DashboardSpec {
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        default_panel: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            default_panel: default_panel.into(),
            panels: Vec::new(),
            panel_groups: Vec::new(),
            roles: Vec::new(),
            services: Vec::new(),
        }
    }

    pub fn with_panels(mut self, panels: &[&str]) -> Self {
        self.panels = panels.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_panel_group(mut self, slug: &str, name: &str, panels: &[&str]) -> Self {
        self.panel_groups.push(PanelGroupSpec {
            slug: slug.to_string(),
            name: name.to_string(),
            panels: panels.iter().map(|p| p.to_string()).collect(),
        });
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

    /// Declared groups, with a flat panel list normalized into a single
    /// `default` group.
    pub fn declared_groups(&self) -> Vec<PanelGroupSpec> {
        if !self.panel_groups.is_empty() {
            return self.panel_groups.clone();
        }
        vec![PanelGroupSpec {
            slug: DEFAULT_GROUP_SLUG.to_string(),
            name: self.name.clone(),
            panels: self.panels.clone(),
        }]
    }
}

impl Slugged for DashboardSpec {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// An ordered, named subset of a dashboard's registered panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGroup<'a> {
    pub slug: String,
    pub name: String,
    pub panels: Vec<&'a Panel>,
}

impl std::fmt::Display for PanelGroup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<PanelGroup: {}>", self.slug)
    }
}

/// A dashboard registered with a site, owning its registered panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    spec: DashboardSpec,
    panels: Vec<Panel>,
    registered_with: String,
}

impl Dashboard {
    pub(crate) fn new(spec: DashboardSpec, site: &str) -> Result<Self, RegistryError> {
        validate_slug(&spec.slug)?;
        validate_slug(&spec.default_panel)?;
        if !spec.panels.is_empty() && !spec.panel_groups.is_empty() {
            return Err(RegistryError::AmbiguousPanelLayout(spec.slug.clone()));
        }
        for group in &spec.panel_groups {
            validate_slug(&group.slug)?;
        }

        Ok(Self {
            spec,
            panels: Vec::new(),
            registered_with: site.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn slug(&self) -> &str {
        &self.spec.slug
    }

    /// Slug of the site this dashboard is registered with.
    pub fn registered_with(&self) -> &str {
        &self.registered_with
    }

    pub fn default_panel(&self) -> &str {
        &self.spec.default_panel
    }

    pub fn required_roles(&self) -> &[String] {
        &self.spec.roles
    }

    pub fn required_services(&self) -> &[String] {
        &self.spec.services
    }

    pub fn register(&mut self, spec: PanelSpec) -> Result<&Panel, RegistryError> {
        if self.position(spec.slug()).is_some() {
            return Err(RegistryError::AlreadyRegistered {
                kind: EntryKind::Panel,
                slug: spec.slug.clone(),
                scope: self.slug().to_string(),
            });
        }

        let panel = Panel::new(spec, self.slug())?;
        tracing::debug!("Registered panel {} with dashboard {}", panel.slug(), self.slug());
        self.panels.push(panel);
        Ok(&self.panels[self.panels.len() - 1])
    }

    pub fn unregister<K: Slugged + ?Sized>(&mut self, key: &K) -> Result<Panel, RegistryError> {
        let slug = key.slug();
        let idx = self.position(slug).ok_or_else(|| self.not_registered(slug))?;
        if slug == self.default_panel() {
            return Err(RegistryError::DefaultPanelProtected {
                dashboard: self.slug().to_string(),
                panel: slug.to_string(),
            });
        }

        tracing::debug!("Unregistered panel {} from dashboard {}", slug, self.slug());
        Ok(self.panels.remove(idx))
    }

    pub fn get_panel<K: Slugged + ?Sized>(&self, key: &K) -> Result<&Panel, RegistryError> {
        let slug = key.slug();
        self.position(slug)
            .map(|idx| &self.panels[idx])
            .ok_or_else(|| self.not_registered(slug))
    }

    pub fn get_panel_mut<K: Slugged + ?Sized>(
        &mut self,
        key: &K,
    ) -> Result<&mut Panel, RegistryError> {
        let slug = key.slug();
        match self.position(slug) {
            Some(idx) => Ok(&mut self.panels[idx]),
            None => Err(self.not_registered(slug)),
        }
    }

    pub fn get_panel_groups(&self) -> Vec<PanelGroup<'_>> {
        let declared = self.spec.declared_groups();
        let mut groups = Vec::with_capacity(declared.len() + 1);

        let mut placed: Vec<&str> = Vec::new();
        for group in &declared {
            let mut panels: Vec<&Panel> = Vec::new();
            for slug in &group.panels {
                if placed.contains(&slug.as_str()) {
                    continue;
                }
                if let Ok(panel) = self.get_panel(slug.as_str()) {
                    placed.push(slug.as_str());
                    panels.push(panel);
                }
            }
            if panels.is_empty() {
                continue;
            }
            groups.push(PanelGroup {
                slug: group.slug.clone(),
                name: group.name.clone(),
                panels,
            });
        }

        let other: Vec<&Panel> = self
            .panels
            .iter()
            .filter(|p| !declared.iter().any(|g| g.panels.iter().any(|s| s == p.slug())))
            .collect();
        if !other.is_empty() {
            groups.push(PanelGroup {
                slug: OTHER_GROUP_SLUG.to_string(),
                name: OTHER_GROUP_NAME.to_string(),
                panels: other,
            });
        }

        groups
    }

    pub fn get_panel_group(&self, slug: &str) -> Option<PanelGroup<'_>> {
        self.get_panel_groups().into_iter().find(|g| g.slug == slug)
    }

    pub fn get_panels(&self) -> Vec<&Panel> {
        self.get_panel_groups()
            .into_iter()
            .flat_map(|g| g.panels)
            .collect()
    }

    /// Checks that the default panel is registered.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.position(self.default_panel()).is_none() {
            return Err(RegistryError::DefaultPanelMissing {
                dashboard: self.slug().to_string(),
                panel: self.default_panel().to_string(),
            });
        }
        Ok(())
    }

    pub fn get_absolute_url(&self, resolver: &dyn UrlResolver) -> Result<String, RoutingError> {
        resolver.reverse(&dashboard_url_name(resolver.namespace(), self.slug()), &[])
    }

    fn position(&self, slug: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.slug() == slug)
    }

    fn not_registered(&self, slug: &str) -> RegistryError {
        RegistryError::NotRegistered {
            kind: EntryKind::Panel,
            slug: slug.to_string(),
            scope: self.slug().to_string(),
        }
    }
}

impl Slugged for Dashboard {
    fn slug(&self) -> &str {
        &self.spec.slug
    }
}

impl std::fmt::Display for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Dashboard: {}>", self.slug())
    }
}
