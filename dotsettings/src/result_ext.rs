//! Extensions for mapping errors to `SettingsResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(SettingsError::…(e)))`
//! patterns when converting external error types into the crate's
//! `SettingsResult<T>` alias (`Result<T, Arc<SettingsError>>`).
//!
//! # Examples
//!
//! ```
//! use dotsettings::{SettingsResult, SettingsResultExt};
//!
//! fn port() -> SettingsResult<u16> {
//!     // serde_json::Error implements Into<SettingsError>
//!     serde_json::from_str("8080").into_settings()
//! }
//! # assert_eq!(port().ok(), Some(8080));
//! ```

use crate::{SettingsError, SettingsResult};
use std::sync::Arc;

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<SettingsError>` into a `SettingsResult<T>`.
pub trait SettingsResultExt<T, E> {
    /// Convert `Result<T, E>` into `SettingsResult<T>` using `Into<SettingsError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<SettingsError>`.
    fn into_settings(self) -> SettingsResult<T>;
}

impl<T, E> SettingsResultExt<T, E> for Result<T, E>
where
    E: Into<SettingsError>,
{
    fn into_settings(self) -> SettingsResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}
