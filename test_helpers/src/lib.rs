//! Fixtures shared by the `dotsettings` test suites.
//!
//! - [`figment`]: run closures inside a [`figment::Jail`] that isolates the
//!   process environment and working directory.
//! - [`env_file`]: scratch directories holding `.env` files that tests can
//!   rewrite between resolutions.
//! - [`schemas`]: canonical sample schemas.

pub mod env_file;
pub mod figment;
pub mod schemas;
