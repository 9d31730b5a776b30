//! Figment provider over resolved settings.
//!
//! Lets a coerced mapping be layered with other figment providers, for
//! example defaults from a TOML string merged underneath values resolved from
//! the environment.

use figment::providers::Serialized;
use figment::value::{Dict, Map};
use figment::{Error, Metadata, Profile, Provider};

use crate::builder::CoercedMapping;

/// Provider yielding a coerced mapping under one profile.
///
/// # Examples
///
/// ```
/// use dotsettings::SettingsProvider;
/// use figment::Figment;
/// use serde_json::json;
///
/// let mut values = serde_json::Map::new();
/// values.insert("port".to_owned(), json!(8080));
/// let port: u16 = Figment::from(SettingsProvider::new(values))
///     .extract_inner("port")
///     .expect("port is present");
/// assert_eq!(port, 8080);
/// ```
#[derive(Debug, Clone)]
pub struct SettingsProvider {
    values: CoercedMapping,
    profile: Profile,
}

impl SettingsProvider {
    /// Provide `values` under the default profile.
    #[must_use]
    pub fn new(values: CoercedMapping) -> Self {
        Self {
            values,
            profile: Profile::Default,
        }
    }

    /// Provide the values under `profile` instead.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<Profile>) -> Self {
        self.profile = profile.into();
        self
    }
}

impl Provider for SettingsProvider {
    fn metadata(&self) -> Metadata {
        Metadata::named("resolved settings")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        Serialized::from(&self.values, self.profile.clone()).data()
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.profile.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        unfulfilled_lint_expectations,
        reason = "clippy::expect_used is denied globally; tests may not hit those branches"
    )]
    #![expect(
        clippy::expect_used,
        reason = "tests panic to surface configuration mistakes"
    )]

    use figment::Figment;
    use figment::providers::Serialized;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        host: String,
        port: u16,
    }

    fn values() -> CoercedMapping {
        let mut values = CoercedMapping::new();
        values.insert("port".to_owned(), json!(9000));
        values
    }

    #[rstest]
    fn merges_over_lower_layers() {
        let server: Server = Figment::from(Serialized::defaults(json!({
            "host": "localhost",
            "port": 3000,
        })))
        .merge(SettingsProvider::new(values()))
        .extract()
        .expect("server extracts");
        assert_eq!(
            server,
            Server {
                host: "localhost".to_owned(),
                port: 9000,
            }
        );
    }

    #[rstest]
    fn values_are_scoped_to_the_selected_profile() {
        let figment = Figment::from(SettingsProvider::new(values()).with_profile("staging"));
        assert!(figment.extract_inner::<u16>("port").is_err());
        let port: u16 = figment
            .select("staging")
            .extract_inner("port")
            .expect("staging port");
        assert_eq!(port, 9000);
    }
}
