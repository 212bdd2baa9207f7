//! SSL options understood by the PostgreSQL driver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DsnError;

/// SSL mode for connections.
///
/// Only the modes supported by `lib/pq` are listed; `allow` and `prefer`
/// are libpq extensions the driver does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    /// No SSL.
    Disable,
    /// Always SSL, skip verification.
    Require,
    /// Always SSL, verify that the server certificate was signed by a trusted CA.
    VerifyCa,
    /// Always SSL, verify the CA signature and that the server host name
    /// matches the one in the certificate.
    VerifyFull,
}

impl SslMode {
    /// All modes, in increasing order of strictness.
    pub const ALL: [SslMode; 4] = [
        Self::Disable,
        Self::Require,
        Self::VerifyCa,
        Self::VerifyFull,
    ];

    /// The literal used in a DSN.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslMode {
    type Err = DsnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| DsnError::InvalidSslMode(s.to_string()))
    }
}
