//! Client configuration: which local endpoint to dial and how long to wait.
//!
//! ## Endpoint addresses
//!
//! | Address | Endpoint |
//! |---------|----------|
//! | `unix:///var/run/docker.sock` | Unix domain socket (default on POSIX) |
//! | `npipe:////./pipe/docker_engine` | Windows named pipe (default on Windows) |
//!
//! Nothing is read from the environment implicitly. Callers that want the
//! conventional `DOCKER_HOST` override ask for it with
//! [`EngineHost::from_env`]; embedding applications can also deserialise a
//! [`ClientConfig`] from their own configuration files.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Default engine address on POSIX systems.
pub const DEFAULT_UNIX_HOST: &str = "unix:///var/run/docker.sock";

/// Default engine address on Windows.
pub const DEFAULT_NPIPE_HOST: &str = "npipe:////./pipe/docker_engine";

/// Environment variable consulted by [`EngineHost::from_env`].
pub const HOST_ENV_VAR: &str = "DOCKER_HOST";

/// Bound on a single connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Engine host
// ---------------------------------------------------------------------------

/// Local endpoint the engine listens on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EngineHost {
    /// Unix domain socket at the given path.
    Unix(PathBuf),
    /// Windows named pipe, in native form (`\\.\pipe\docker_engine`).
    NamedPipe(String),
}

impl EngineHost {
    /// The default endpoint for the platform this crate was built for.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::NamedPipe(r"\\.\pipe\docker_engine".to_owned())
        } else {
            Self::Unix(PathBuf::from("/var/run/docker.sock"))
        }
    }

    /// Reads [`HOST_ENV_VAR`], falling back to [`EngineHost::platform_default`]
    /// when it is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var(HOST_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::platform_default()),
        }
    }

    /// URL scheme of the address (`unix` or `npipe`).
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Unix(_) => "unix",
            Self::NamedPipe(_) => "npipe",
        }
    }
}

impl Default for EngineHost {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl FromStr for EngineHost {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidHost {
            host: value.to_owned(),
            reason,
        };

        let (scheme, address) = value.trim().split_once("://").ok_or_else(|| invalid("missing scheme"))?;
        if address.is_empty() {
            return Err(invalid("missing address"));
        }

        match scheme {
            "unix" => Ok(Self::Unix(PathBuf::from(address))),
            // `npipe:////./pipe/name` carries the pipe path with forward slashes.
            "npipe" => Ok(Self::NamedPipe(address.replace('/', "\\"))),
            _ => Err(invalid("unsupported scheme, expected unix:// or npipe://")),
        }
    }
}

impl TryFrom<String> for EngineHost {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EngineHost> for String {
    fn from(host: EngineHost) -> Self {
        host.to_string()
    }
}

impl std::fmt::Display for EngineHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
            Self::NamedPipe(name) => write!(f, "npipe://{}", name.replace('\\', "/")),
        }
    }
}

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

/// Configuration of a [`crate::Client`], fixed for the client's lifetime.
///
/// Deserialises from e.g.
///
/// ```toml
/// host = "unix:///run/user/1000/docker.sock"
/// connect_timeout_secs = 5
/// ```
///
/// Both keys are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint every request is sent to.
    pub host: EngineHost,

    /// Bound on a single connection attempt.
    #[serde(rename = "connect_timeout_secs", deserialize_with = "duration_from_secs")]
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `host` with the default connect timeout.
    pub fn new(host: EngineHost) -> Self {
        Self {
            host,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Replaces the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(EngineHost::platform_default())
    }
}

fn duration_from_secs<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}
