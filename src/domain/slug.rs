// Slug keys shared by dashboards and panels
use super::error::RegistryError;

/// Anything that can stand in for a registry key: a bare slug or a
/// dashboard/panel declaration or instance.
pub trait Slugged {
    fn slug(&self) -> &str;
}

impl Slugged for str {
    fn slug(&self) -> &str {
        self
    }
}

impl Slugged for String {
    fn slug(&self) -> &str {
        self.as_str()
    }
}

impl<T: Slugged + ?Sized> Slugged for &T {
    fn slug(&self) -> &str {
        (**self).slug()
    }
}

pub fn validate_slug(slug: &str) -> Result<(), RegistryError> {
    if slug.is_empty() {
        return Err(RegistryError::InvalidSlug {
            slug: slug.to_string(),
            reason: "slug must not be empty",
        });
    }

    let valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(RegistryError::InvalidSlug {
            slug: slug.to_string(),
            reason: "slug may only contain lowercase letters, digits, '-' and '_'",
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("images_and_snapshots").is_ok());
        assert!(validate_slug("access-security2").is_ok());

        assert!(matches!(
            validate_slug(""),
            Err(RegistryError::InvalidSlug { .. })
        ));
        assert!(matches!(
            validate_slug("My Panel"),
            Err(RegistryError::InvalidSlug { .. })
        ));
        assert!(matches!(
            validate_slug("cats/tigers"),
            Err(RegistryError::InvalidSlug { .. })
        ));
    }
}
