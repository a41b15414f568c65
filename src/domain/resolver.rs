// Reverse URL resolution seam between registry entries and the route table
use super::error::RoutingError;

/// Reverses a qualified route name (e.g. `horizon:cats:tigers:index`) into a
/// path, substituting `:param` segments from `args`.
pub trait UrlResolver {
    /// Leading component of every route name this resolver knows.
    fn namespace(&self) -> &str;

    fn reverse(&self, name: &str, args: &[(&str, &str)]) -> Result<String, RoutingError>;
}

pub fn site_url_name(namespace: &str, view: &str) -> String {
    format!("{}:{}", namespace, view)
}

pub fn dashboard_url_name(namespace: &str, dashboard: &str) -> String {
    format!("{}:{}", namespace, dashboard)
}

pub fn panel_url_name(namespace: &str, dashboard: &str, panel: &str, route: &str) -> String {
    format!("{}:{}:{}:{}", namespace, dashboard, panel, route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_qualified_by_namespace() {
        assert_eq!(site_url_name("console", "login"), "console:login");
        assert_eq!(dashboard_url_name("console", "cats"), "console:cats");
        assert_eq!(
            panel_url_name("console", "cats", "tigers", "detail"),
            "console:cats:tigers:detail"
        );
    }
}
