//! Error types for loading connection parameters.
//!
//! Building and merging DSNs never fails; these errors only come from the
//! configuration surface (files, environment variables, enum parsing).

use miette::Diagnostic;
use thiserror::Error;

/// Result type for fallible pqdsn operations.
pub type DsnResult<T> = Result<T, DsnError>;

/// Errors that can occur while loading connection parameters.
#[derive(Error, Debug, Diagnostic)]
pub enum DsnError {
    /// Error reading a configuration file.
    #[error("failed to read file: {path}")]
    #[diagnostic(code(pqdsn::io_error))]
    Io {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML, or does not match the expected shape.
    #[error("invalid configuration: {source}")]
    #[diagnostic(code(pqdsn::toml_error))]
    Toml {
        /// The TOML parser error.
        #[source]
        source: toml::de::Error,
    },

    /// An environment overlay was requested that the configuration does not define.
    #[error("unknown environment `{0}`")]
    #[diagnostic(
        code(pqdsn::unknown_environment),
        help("define it under an [environments.<name>] table")
    )]
    UnknownEnvironment(String),

    /// A required environment variable is not set.
    #[error("environment variable `{0}` is not set")]
    #[diagnostic(code(pqdsn::env_not_found))]
    EnvNotFound(String),

    /// Malformed `${...}` reference.
    #[error("invalid environment reference: {0}")]
    #[diagnostic(code(pqdsn::env_syntax))]
    InvalidEnvSyntax(String),

    /// Not one of the known SSL mode literals.
    #[error("invalid sslmode `{0}`")]
    #[diagnostic(
        code(pqdsn::invalid_sslmode),
        help("expected one of: disable, require, verify-ca, verify-full")
    )]
    InvalidSslMode(String),

    /// A value could not be converted to the field's type.
    #[error("invalid value for `{key}`: {message}")]
    #[diagnostic(code(pqdsn::invalid_value))]
    InvalidValue {
        /// The DSN key of the field.
        key: String,
        /// What was wrong with the value.
        message: String,
    },
}

impl DsnError {
    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for DsnError {
    fn from(source: toml::de::Error) -> Self {
        Self::Toml { source }
    }
}
