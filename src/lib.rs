//! # pqdsn
//!
//! Type-safe construction of PostgreSQL connection strings (DSNs) in the
//! `key=value` format accepted by `lib/pq` and libpq.
//!
//! pqdsn provides:
//! - A typed [`Parameters`] set with a fixed field order
//! - Plain and escaped rendering
//! - Field-wise [`merge`] of parameter sets
//! - Loading from TOML with per-environment overlays, or from `PG*` variables
//!
//! ## Quick Start
//!
//! ```rust
//! use pqdsn::prelude::*;
//!
//! let params = Parameters::builder()
//!     .dbname("pqgotest")
//!     .user("pqgotest")
//!     .password("it's secret")
//!     .host("db.example.com")
//!     .port(1234)
//!     .sslmode(SslMode::VerifyFull)
//!     .fallback_application_name("pqdsn test")
//!     .build();
//!
//! assert_eq!(
//!     params.to_escaped_string(),
//!     r"dbname=pqgotest user=pqgotest password='it\'s secret' host=db.example.com port=1234 sslmode=verify-full fallback_application_name='pqdsn test'"
//! );
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod builder;
pub mod config;
pub mod env;
pub mod error;
#[cfg(feature = "tracing-subscriber")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing-subscriber")))]
pub mod logging;
pub mod options;
pub mod params;

pub use builder::{DsnBuilder, Mode};
pub use config::DsnConfig;
pub use error::{DsnError, DsnResult};
pub use options::SslMode;
pub use params::{Key, Parameters, ParametersBuilder, Value, merge};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::Mode;
    pub use crate::config::DsnConfig;
    pub use crate::error::{DsnError, DsnResult};
    pub use crate::options::SslMode;
    pub use crate::params::{Parameters, merge};
}
