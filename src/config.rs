//! Configuration file parsing.
//!
//! A configuration holds a base parameter set and any number of named
//! environment overlays. After the TOML is parsed, references such as
//! `${PGPASSWORD}` in text values are replaced by the variable's value.
//! Substituted values are taken verbatim; they are never parsed as TOML.
//! Numeric fields and `sslmode` must be written as literals.
//!
//! ```toml
//! [parameters]
//! dbname = "app"
//! host = "${PGHOST:-localhost}"
//! port = 5432
//!
//! [environments.production]
//! host = "db.internal"
//! sslmode = "verify-full"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::env::{self, EnvSource, ProcessEnv};
use crate::error::{DsnError, DsnResult};
use crate::params::{Parameters, merge};

/// Connection parameters with per-environment overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DsnConfig {
    /// Base parameters.
    #[serde(default)]
    pub parameters: Parameters,

    /// Overlays merged over the base parameters, by environment name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environments: BTreeMap<String, Parameters>,
}

impl DsnConfig {
    /// Load configuration from a file path, expanding references from the
    /// process environment.
    pub fn from_file(path: impl AsRef<Path>) -> DsnResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DsnError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: Self = content.parse()?;
        info!(
            path = %path.display(),
            environments = config.environments.len(),
            "DSN configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration, expanding references from `source`.
    pub fn from_str_with_env<S: EnvSource + ?Sized>(
        content: &str,
        source: &S,
    ) -> DsnResult<Self> {
        let mut config: Self = toml::from_str(content)?;

        let expand = |s: &str| env::expand(s, source);
        config.parameters.try_map_text(expand)?;
        for overlay in config.environments.values_mut() {
            overlay.try_map_text(expand)?;
        }
        Ok(config)
    }

    /// The base parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Names of the defined environments, sorted.
    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// The base parameters with the overlay for `env` merged on top.
    pub fn for_environment(&self, env: &str) -> DsnResult<Parameters> {
        let overlay = self
            .environments
            .get(env)
            .ok_or_else(|| DsnError::UnknownEnvironment(env.to_string()))?;

        debug!(
            environment = env,
            overrides = overlay.iter().count(),
            "Applying environment overlay"
        );
        Ok(merge(self.parameters.clone(), overlay))
    }

    /// Serialize back to TOML. Unset fields are omitted.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

impl FromStr for DsnConfig {
    type Err = DsnError;

    /// Parse configuration, expanding references from the process environment.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Self::from_str_with_env(content, &ProcessEnv)
    }
}
