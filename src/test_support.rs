// Shared fixtures for unit tests: a site with a "cats" and a "dogs" dashboard
use crate::application::site::Site;
use crate::infrastructure::config::HorizonConfig;
use crate::infrastructure::discovery::autodiscover;

pub const FIXTURE: &str = r#"
[server]
bind = "127.0.0.1:0"

[site]
dashboards = ["cats", "dogs"]
default_dashboard = "cats"

[[dashboards]]
name = "Cats"
slug = "cats"
default_panel = "kittens"
panel_groups = [
    { slug = "kittens", name = "Kittens", panels = ["kittens"] },
    { slug = "tigers", name = "Tigers", panels = ["tigers"] },
]

[[dashboards]]
name = "Dogs"
slug = "dogs"
default_panel = "puppies"
panels = ["puppies"]

[[panels]]
dashboard = "cats"
name = "Kittens"
slug = "kittens"

[[panels]]
dashboard = "cats"
name = "Tigers"
slug = "tigers"
services = ["compute"]
routes = [
    { name = "index", path = "" },
    { name = "detail", path = ":tiger_id/" },
]

[[panels]]
dashboard = "dogs"
name = "Puppies"
slug = "puppies"

[[users]]
username = "test_user"
password = "password"
tenant = "1"
roles = ["member"]
services = ["compute", "image"]

[[users]]
username = "guest"
password = "guest"
"#;

pub fn fixture_config() -> HorizonConfig {
    HorizonConfig::from_toml_str(FIXTURE).expect("fixture config parses")
}

pub fn fixture_site() -> Site {
    autodiscover(&fixture_config()).expect("fixture site registers")
}
