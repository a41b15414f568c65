use crate::domain::dashboard::DashboardSpec;
use crate::domain::panel::PanelSpec;
use crate::domain::user::User;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct HorizonConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub dashboards: Vec<DashboardSpec>,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Seconds a login stays valid.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_session_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteSettings {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_site_slug")]
    pub slug: String,
    /// Dashboard ordering; unlisted dashboards follow, sorted by slug.
    #[serde(default)]
    pub dashboards: Vec<String>,
    pub default_dashboard: Option<String>,
    pub user_home: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            slug: default_site_slug(),
            dashboards: Vec::new(),
            default_dashboard: None,
            user_home: None,
        }
    }
}

fn default_site_name() -> String {
    "Horizon".to_string()
}

fn default_site_slug() -> String {
    "horizon".to_string()
}

/// A panel declaration together with the dashboard it registers into.
#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub dashboard: String,
    #[serde(flatten)]
    pub panel: PanelSpec,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub tenant: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

impl UserRecord {
    pub fn to_user(&self) -> User {
        User {
            id: self.username.clone(),
            username: self.username.clone(),
            tenant: self.tenant.clone(),
            roles: self.roles.clone(),
            services: self.services.clone(),
        }
    }
}

impl HorizonConfig {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

pub fn load_config() -> anyhow::Result<HorizonConfig> {
    load_config_from("config/horizon")
}

/// Loads `path` (extension optional) with `HORIZON__SECTION__KEY`
/// environment overrides.
pub fn load_config_from(path: &str) -> anyhow::Result<HorizonConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("HORIZON").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
