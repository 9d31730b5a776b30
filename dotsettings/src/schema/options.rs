//! Resolution options consumed from the schema layer.

use camino::Utf8PathBuf;

/// How an explicit env-name override interacts with the configured prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OverridePrefix {
    /// Prepend the prefix unless the override already starts with it.
    #[default]
    Apply,
    /// Use the override exactly as written.
    Exempt,
}

/// How many field-level errors a failed resolution reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Diagnostics {
    /// Stop at the first missing or invalid field.
    #[default]
    FirstError,
    /// Visit every field and report all failures together.
    Full,
}

/// A `.env` file consulted during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvFile {
    /// Path as configured; relative paths resolve against the working
    /// directory at resolution time.
    pub path: Utf8PathBuf,
    /// Whether absence or a read failure aborts resolution.
    pub required: bool,
}

/// Options governing where values are read from and how names are derived.
///
/// # Examples
///
/// ```
/// use dotsettings::SettingsOptions;
///
/// let options = SettingsOptions::new()
///     .env_file(".env")
///     .prefix("APP_")
///     .nested_delimiter(Some("__"))
///     .case_sensitive(false);
/// assert_eq!(options.prefix_str(), "APP_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsOptions {
    env_files: Vec<EnvFile>,
    encoding: String,
    prefix: String,
    nested_delimiter: Option<String>,
    case_sensitive: bool,
    override_prefix: OverridePrefix,
    diagnostics: Diagnostics,
}

impl Default for SettingsOptions {
    fn default() -> Self {
        Self {
            env_files: Vec::new(),
            encoding: String::from("utf-8"),
            prefix: String::new(),
            nested_delimiter: Some(String::from("__")),
            case_sensitive: false,
            override_prefix: OverridePrefix::Apply,
            diagnostics: Diagnostics::FirstError,
        }
    }
}

impl SettingsOptions {
    /// Options with the defaults: no env file, UTF-8, case-insensitive,
    /// no prefix, and `__` as the nested delimiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an optional `.env` file. Later files override earlier ones.
    #[must_use]
    pub fn env_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.env_files.push(EnvFile {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Add a `.env` file that must exist and be readable.
    #[must_use]
    pub fn required_env_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.env_files.push(EnvFile {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Encoding name used to decode env files, for example `utf-8`.
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Prefix prepended to every derived env-name.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Delimiter joining nested field paths, or `None` to resolve nested
    /// schemas from their own field names.
    #[must_use]
    pub fn nested_delimiter(mut self, delimiter: Option<&str>) -> Self {
        self.nested_delimiter = delimiter.filter(|d| !d.is_empty()).map(str::to_owned);
        self
    }

    /// Whether env-names are matched exactly rather than upper-cased.
    #[must_use]
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Prefix policy for explicit env-name overrides.
    #[must_use]
    pub const fn override_prefix(mut self, policy: OverridePrefix) -> Self {
        self.override_prefix = policy;
        self
    }

    /// Error reporting mode.
    #[must_use]
    pub const fn diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Shorthand for [`Diagnostics::Full`].
    #[must_use]
    pub const fn full_diagnostics(self) -> Self {
        self.diagnostics(Diagnostics::Full)
    }

    /// Configured env files in merge order.
    #[must_use]
    pub fn env_files(&self) -> &[EnvFile] {
        &self.env_files
    }

    /// Configured encoding name.
    #[must_use]
    pub fn encoding_name(&self) -> &str {
        &self.encoding
    }

    /// Configured prefix.
    #[must_use]
    pub fn prefix_str(&self) -> &str {
        &self.prefix
    }

    /// Configured nested delimiter.
    #[must_use]
    pub fn delimiter(&self) -> Option<&str> {
        self.nested_delimiter.as_deref()
    }

    /// Whether env-names are case-sensitive.
    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Prefix policy for explicit overrides.
    #[must_use]
    pub const fn override_policy(&self) -> OverridePrefix {
        self.override_prefix
    }

    /// Error reporting mode.
    #[must_use]
    pub const fn diagnostics_mode(&self) -> Diagnostics {
        self.diagnostics
    }
}
