//! Env-name derivation for schema fields.
//!
//! A field path such as `["database", "port"]` maps to one env-name: the
//! prefix followed by the path joined with the nested delimiter, for example
//! `APP_DATABASE__PORT`. Without a delimiter a nested field is looked up by
//! its own name only (`APP_PORT`). Keys are upper-cased unless resolution is
//! case-sensitive; the same normalisation is applied to merged sources so
//! lookups compare like with like.

use std::borrow::Cow;

use uncased::UncasedStr;

use crate::schema::{OverridePrefix, SettingsOptions};

/// Naming rules extracted from [`SettingsOptions`].
#[derive(Debug, Clone, Copy)]
pub struct NameRules<'a> {
    prefix: &'a str,
    delimiter: Option<&'a str>,
    case_sensitive: bool,
    override_prefix: OverridePrefix,
}

impl<'a> NameRules<'a> {
    /// Borrow the naming-relevant subset of `options`.
    #[must_use]
    pub fn from_options(options: &'a SettingsOptions) -> Self {
        Self {
            prefix: options.prefix_str(),
            delimiter: options.delimiter(),
            case_sensitive: options.is_case_sensitive(),
            override_prefix: options.override_policy(),
        }
    }

    /// The configured nested delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> Option<&'a str> {
        self.delimiter
    }

    /// Candidate env-names for a field, in lookup order.
    ///
    /// An explicit override is the sole candidate. Under
    /// [`OverridePrefix::Apply`] the prefix is prepended unless the override
    /// already starts with it. An empty `field_path` yields no candidates.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotsettings::{NameRules, SettingsOptions};
    ///
    /// let options = SettingsOptions::new().prefix("app_").nested_delimiter(Some("__"));
    /// let rules = NameRules::from_options(&options);
    /// assert_eq!(rules.candidates(&["database", "port"], None), ["APP_DATABASE__PORT"]);
    /// assert_eq!(rules.candidates(&["token"], Some("API_TOKEN")), ["APP_API_TOKEN"]);
    /// ```
    #[must_use]
    pub fn candidates(&self, field_path: &[&str], env_override: Option<&str>) -> Vec<String> {
        let Some(last) = field_path.last() else {
            return Vec::new();
        };
        let name = match env_override {
            Some(explicit) => self.apply_override(explicit),
            None => {
                let joined = match (self.delimiter, field_path.len()) {
                    (Some(delimiter), len) if len > 1 => field_path.join(delimiter),
                    _ => (*last).to_owned(),
                };
                format!("{}{joined}", self.prefix)
            }
        };
        vec![normalize_key(&name, self.case_sensitive).into_owned()]
    }

    fn apply_override(&self, explicit: &str) -> String {
        let already_prefixed = if self.case_sensitive {
            explicit.starts_with(self.prefix)
        } else {
            explicit
                .get(..self.prefix.len())
                .is_some_and(|head| UncasedStr::new(head) == UncasedStr::new(self.prefix))
        };
        match self.override_prefix {
            OverridePrefix::Apply if !already_prefixed => format!("{}{explicit}", self.prefix),
            _ => explicit.to_owned(),
        }
    }
}

/// Normalise an env-name for comparison under the given case rule.
#[must_use]
pub fn normalize_key(key: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive || !key.chars().any(char::is_lowercase) {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(key.to_uppercase())
    }
}
