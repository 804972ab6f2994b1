//! Error types for the cache
//!
//! Cache operations themselves are total: "not found" is an ordinary
//! return value, and set/delete cannot fail. The only fallible surface
//! is configuration loading.

use thiserror::Error;

// == Config Error Enum ==
/// Errors raised while loading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable was set to an unusable value
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// The offending environment variable
        var: &'static str,
        /// The raw value that failed to parse or validate
        value: String,
    },
}
