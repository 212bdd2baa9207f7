//! Connection parameters and their DSN rendering.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::builder::{DsnBuilder, Mode};
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{DsnError, DsnResult};
use crate::options::SslMode;

/// Identity of a connection parameter.
///
/// Variants are declared in DSN emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// The name of the database to connect to.
    DbName,
    /// The user to sign in as.
    User,
    /// The user's password.
    Password,
    /// The host to connect to.
    Host,
    /// The port to bind to.
    Port,
    /// Whether or not to use SSL.
    SslMode,
    /// An application name to fall back to if one isn't provided.
    FallbackApplicationName,
    /// Maximum wait for connection, in seconds.
    ConnectTimeout,
    /// Client certificate file location.
    SslCert,
    /// Client key file location.
    SslKey,
    /// Root certificate file location.
    SslRootCert,
}

impl Key {
    /// Every key, in emission order.
    pub const ALL: [Key; 11] = [
        Self::DbName,
        Self::User,
        Self::Password,
        Self::Host,
        Self::Port,
        Self::SslMode,
        Self::FallbackApplicationName,
        Self::ConnectTimeout,
        Self::SslCert,
        Self::SslKey,
        Self::SslRootCert,
    ];

    /// The key as written in a DSN.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DbName => "dbname",
            Self::User => "user",
            Self::Password => "password",
            Self::Host => "host",
            Self::Port => "port",
            Self::SslMode => "sslmode",
            Self::FallbackApplicationName => "fallback_application_name",
            Self::ConnectTimeout => "connect_timeout",
            Self::SslCert => "sslcert",
            Self::SslKey => "sslkey",
            Self::SslRootCert => "sslrootcert",
        }
    }

    /// The libpq environment variable that carries this parameter, if any.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Self::DbName => Some("PGDATABASE"),
            Self::User => Some("PGUSER"),
            Self::Password => Some("PGPASSWORD"),
            Self::Host => Some("PGHOST"),
            Self::Port => Some("PGPORT"),
            Self::SslMode => Some("PGSSLMODE"),
            Self::FallbackApplicationName => None,
            Self::ConnectTimeout => Some("PGCONNECT_TIMEOUT"),
            Self::SslCert => Some("PGSSLCERT"),
            Self::SslKey => Some("PGSSLKEY"),
            Self::SslRootCert => Some("PGSSLROOTCERT"),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A populated parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    /// Text value.
    Text(&'a str),
    /// Numeric value.
    Int(u32),
}

/// Connection parameters as accepted by `lib/pq`.
///
/// Empty strings, zero numbers and a missing SSL mode mean "not set"; such
/// fields are left out of the DSN, out of serialized output, and never
/// override anything in [`merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// The name of the database to connect to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dbname: String,
    /// The user to sign in as.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// The user's password.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// The host to connect to. Values that start with `/` are for unix
    /// domain sockets.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// The port to bind to.
    #[serde(skip_serializing_if = "is_zero_u16")]
    pub port: u16,
    /// Whether or not to use SSL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sslmode: Option<SslMode>,
    /// An `application_name` to fall back to if one isn't provided.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fallback_application_name: String,
    /// Maximum wait for connection, in seconds. Zero means wait indefinitely.
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub connect_timeout: u32,
    /// Cert file location. The file must contain PEM encoded data.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sslcert: String,
    /// Key file location. The file must contain PEM encoded data.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sslkey: String,
    /// The location of the root certificate file. The file must contain
    /// PEM encoded data.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sslrootcert: String,
}

fn is_zero_u16(v: &u16) -> bool {
    *v == 0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

fn text(s: &str) -> Option<Value<'_>> {
    (!s.is_empty()).then_some(Value::Text(s))
}

fn int(n: u32) -> Option<Value<'static>> {
    (n != 0).then_some(Value::Int(n))
}

impl Parameters {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for parameters.
    pub fn builder() -> ParametersBuilder {
        ParametersBuilder::new()
    }

    /// The value of `key`, or `None` if that field is not set.
    pub fn get(&self, key: Key) -> Option<Value<'_>> {
        match key {
            Key::DbName => text(&self.dbname),
            Key::User => text(&self.user),
            Key::Password => text(&self.password),
            Key::Host => text(&self.host),
            Key::Port => int(u32::from(self.port)),
            Key::SslMode => self.sslmode.map(|m| Value::Text(m.as_str())),
            Key::FallbackApplicationName => text(&self.fallback_application_name),
            Key::ConnectTimeout => int(self.connect_timeout),
            Key::SslCert => text(&self.sslcert),
            Key::SslKey => text(&self.sslkey),
            Key::SslRootCert => text(&self.sslrootcert),
        }
    }

    /// Whether `key` is set.
    pub fn is_set(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterate over the set fields in DSN order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Value<'_>)> + '_ {
        Key::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    /// Render the DSN in the given mode.
    pub fn build_string(&self, mode: Mode) -> String {
        let mut b = DsnBuilder::new(mode);

        for (key, value) in self.iter() {
            match value {
                Value::Text(s) => b.add_text(key.as_str(), s),
                Value::Int(n) => b.add_int(key.as_str(), n),
            }
        }

        trace!(fields = b.len(), mode = ?mode, "Built DSN");
        b.finish()
    }

    /// Render the DSN with values written verbatim:
    ///
    /// ```text
    /// dbname=pqgotest user=pqgotest sslmode=verify-full
    /// ```
    pub fn to_dsn_string(&self) -> String {
        self.build_string(Mode::Plain)
    }

    /// Render the DSN with single quotes in values escaped by a backslash,
    /// and values containing spaces wrapped in single quotes:
    ///
    /// ```text
    /// dbname=pqgotest user='space man' password='it\'s valid'
    /// ```
    pub fn to_escaped_string(&self) -> String {
        self.build_string(Mode::Escaped)
    }

    /// Overlay `other` on `self`; see [`merge`].
    pub fn merge(self, other: &Parameters) -> Parameters {
        merge(self, other)
    }

    /// Read parameters from the libpq `PG*` environment variables.
    pub fn from_env() -> DsnResult<Self> {
        Self::from_env_source(&ProcessEnv)
    }

    /// Read parameters from the libpq `PG*` variables of `source`.
    ///
    /// Unset and empty variables leave the field empty.
    pub fn from_env_source<S: EnvSource + ?Sized>(source: &S) -> DsnResult<Self> {
        let var = |key: Key| {
            key.env_var()
                .and_then(|name| source.non_empty_var(name))
                .unwrap_or_default()
        };

        let port = var(Key::Port);
        let connect_timeout = var(Key::ConnectTimeout);
        let sslmode = var(Key::SslMode);

        Ok(Self {
            dbname: var(Key::DbName),
            user: var(Key::User),
            password: var(Key::Password),
            host: var(Key::Host),
            port: parse_number(Key::Port, &port)?,
            sslmode: if sslmode.is_empty() {
                None
            } else {
                Some(sslmode.parse()?)
            },
            fallback_application_name: String::new(),
            connect_timeout: parse_number(Key::ConnectTimeout, &connect_timeout)?,
            sslcert: var(Key::SslCert),
            sslkey: var(Key::SslKey),
            sslrootcert: var(Key::SslRootCert),
        })
    }

    /// Apply `f` to every text field, set or not. The SSL mode is typed and
    /// not visited.
    pub(crate) fn try_map_text<E>(
        &mut self,
        mut f: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<(), E> {
        for field in [
            &mut self.dbname,
            &mut self.user,
            &mut self.password,
            &mut self.host,
            &mut self.fallback_application_name,
            &mut self.sslcert,
            &mut self.sslkey,
            &mut self.sslrootcert,
        ] {
            *field = f(field.as_str())?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr<Err = std::num::ParseIntError> + Default>(
    key: Key,
    raw: &str,
) -> DsnResult<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse()
        .map_err(|e| DsnError::invalid_value(key.as_str(), format!("`{raw}`: {e}")))
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dsn_string())
    }
}

/// Overlay `over` on `base`.
///
/// Every field that is set in `over` replaces the one in `base`; fields
/// that are empty in `over` keep the value from `base`.
pub fn merge(mut base: Parameters, over: &Parameters) -> Parameters {
    fn text(dst: &mut String, src: &str) {
        if !src.is_empty() {
            src.clone_into(dst);
        }
    }

    text(&mut base.dbname, &over.dbname);
    text(&mut base.user, &over.user);
    text(&mut base.password, &over.password);
    text(&mut base.host, &over.host);
    if over.port != 0 {
        base.port = over.port;
    }
    if over.sslmode.is_some() {
        base.sslmode = over.sslmode;
    }
    text(&mut base.fallback_application_name, &over.fallback_application_name);
    if over.connect_timeout != 0 {
        base.connect_timeout = over.connect_timeout;
    }
    text(&mut base.sslcert, &over.sslcert);
    text(&mut base.sslkey, &over.sslkey);
    text(&mut base.sslrootcert, &over.sslrootcert);

    base
}

/// Builder for [`Parameters`].
#[derive(Debug, Default)]
pub struct ParametersBuilder {
    params: Parameters,
}

impl ParametersBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database name.
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.params.dbname = dbname.into();
        self
    }

    /// Set the username.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.params.user = user.into();
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.params.password = password.into();
        self
    }

    /// Set the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.params.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.params.port = port;
        self
    }

    /// Set the SSL mode.
    pub fn sslmode(mut self, mode: SslMode) -> Self {
        self.params.sslmode = Some(mode);
        self
    }

    /// Set the fallback application name.
    pub fn fallback_application_name(mut self, name: impl Into<String>) -> Self {
        self.params.fallback_application_name = name.into();
        self
    }

    /// Set the connection timeout, in seconds.
    pub fn connect_timeout(mut self, secs: u32) -> Self {
        self.params.connect_timeout = secs;
        self
    }

    /// Set the client certificate path.
    pub fn sslcert(mut self, path: impl Into<String>) -> Self {
        self.params.sslcert = path.into();
        self
    }

    /// Set the client key path.
    pub fn sslkey(mut self, path: impl Into<String>) -> Self {
        self.params.sslkey = path.into();
        self
    }

    /// Set the root certificate path.
    pub fn sslrootcert(mut self, path: impl Into<String>) -> Self {
        self.params.sslrootcert = path.into();
        self
    }

    /// Build the parameters.
    pub fn build(self) -> Parameters {
        self.params
    }
}
