// Populates a site from the configured dashboards and panels
use crate::application::site::Site;
use crate::domain::error::RegistryError;
use crate::infrastructure::config::HorizonConfig;

pub fn autodiscover(config: &HorizonConfig) -> Result<Site, RegistryError> {
    let mut site = Site::from_settings(&config.site);

    for spec in &config.dashboards {
        site.register(spec.clone())?;
    }

    for panel in &config.panels {
        site.get_dashboard_mut(panel.dashboard.as_str())?
            .register(panel.panel.clone())?;
    }

    for slug in &config.site.dashboards {
        if site.get_dashboard(slug.as_str()).is_err() {
            tracing::warn!("Dashboard {} is listed in the site ordering but not declared", slug);
        }
    }

    for dashboard in site.get_dashboards() {
        dashboard.validate()?;
    }

    tracing::info!(
        "Discovered {} dashboards for site {}",
        site.len(),
        site.slug()
    );
    Ok(site)
}
