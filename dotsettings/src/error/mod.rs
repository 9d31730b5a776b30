//! Error types produced while resolving settings.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::SettingsError;

#[cfg(test)]
mod tests;
