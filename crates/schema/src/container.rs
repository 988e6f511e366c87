//! Container configuration, creation, inspection and wait types.
//!
//! [`Config`] holds the portable part of a container definition (image,
//! command, environment); [`HostConfig`] holds what depends on the host it
//! runs on (port bindings, mounts, auto-removal). Both are sent together in a
//! [`CreateContainerRequest`] and echoed back in a [`ContainerInspectResponse`].
//!
//! The types mirror the engine's JSON field names (`PascalCase`), keeping only
//! the fields this client works with. Unknown fields in responses are ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::mount::Mount;
use crate::network::NetworkingConfig;

/// Deserialises `null` as the type's default value.
///
/// The engine writes `null` for many empty collections.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// A container port and protocol in the engine's `"<port>/<proto>"` form,
/// e.g. `"22/tcp"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(String);

impl Port {
    /// Creates a port from its raw `"<port>/<proto>"` form.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A TCP port.
    pub fn tcp(port: u16) -> Self {
        Self(format!("{port}/tcp"))
    }

    /// A UDP port.
    pub fn udp(port: u16) -> Self {
        Self(format!("{port}/udp"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binding of a container port to a host address.
///
/// Leaving both fields empty asks the engine for an ephemeral host port on
/// all interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortBinding {
    #[serde(rename = "HostIp")]
    pub host_ip: String,
    #[serde(rename = "HostPort")]
    pub host_port: String,
}

/// The JSON encoding of a set is an object whose values are all `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Empty {}

/// Ports exposed by a container.
pub type PortSet = BTreeMap<Port, Empty>;

/// Host bindings for each container port.
pub type PortMap = BTreeMap<Port, Vec<PortBinding>>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Portable container configuration: everything that does not depend on the
/// host the container runs on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    /// User (or `user:group`) that runs the container's command.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "null_as_default")]
    pub exposed_ports: PortSet,

    /// Environment in `KEY=value` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,

    /// Image name as given by the operator (may be symbolic, e.g. `alpine`).
    pub image: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
}

/// Host-dependent container configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HostConfig {
    #[serde(skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "null_as_default")]
    pub port_bindings: PortMap,

    /// Remove the container automatically when it exits.
    pub auto_remove: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub mounts: Vec<Mount>,
}

/// Body of a container create call.
///
/// The engine expects the [`Config`] fields at the top level next to
/// `HostConfig` and `NetworkingConfig`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CreateContainerRequest {
    #[serde(flatten)]
    pub config: Config,

    #[serde(rename = "HostConfig", skip_serializing_if = "Option::is_none")]
    pub host_config: Option<HostConfig>,

    #[serde(rename = "NetworkingConfig", skip_serializing_if = "Option::is_none")]
    pub networking_config: Option<NetworkingConfig>,
}

/// Response to a successful container create call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerCreateResponse {
    /// ID of the created container.
    #[serde(rename = "Id")]
    pub id: String,

    /// Warnings raised while creating the container.
    #[serde(rename = "Warnings", default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

/// Runtime state of a container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainerState {
    /// `created`, `running`, `paused`, `restarting`, `removing`, `exited` or `dead`.
    pub status: String,
    pub running: bool,
    pub paused: bool,
    pub restarting: bool,
    #[serde(rename = "OOMKilled")]
    pub oom_killed: bool,
    pub dead: bool,
    pub pid: i64,
    pub exit_code: i64,
    pub error: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Network settings reported by inspection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkSettings {
    /// Published ports. A `None` value means the port is exposed but not
    /// bound on the host.
    #[serde(deserialize_with = "null_as_default")]
    pub ports: BTreeMap<Port, Option<Vec<PortBinding>>>,
}

/// Response of the container inspect endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainerInspectResponse {
    #[serde(rename = "Id")]
    pub id: String,
    pub created: Option<DateTime<Utc>>,
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub args: Vec<String>,
    pub state: Option<ContainerState>,
    pub image: String,
    pub resolv_conf_path: String,
    pub hostname_path: String,
    pub hosts_path: String,
    pub log_path: String,
    /// Container name, including the engine's leading `/`.
    pub name: String,
    pub restart_count: i64,
    pub driver: String,
    pub platform: String,
    pub mount_label: String,
    pub process_label: String,
    pub app_armor_profile: String,
    #[serde(rename = "ExecIDs", deserialize_with = "null_as_default")]
    pub exec_ids: Vec<String>,
    pub host_config: Option<HostConfig>,
    pub config: Option<Config>,
    pub network_settings: Option<NetworkSettings>,
}

impl ContainerInspectResponse {
    /// Container name without the engine's leading `/`.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix('/').unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Wait
// ---------------------------------------------------------------------------

/// Error detail attached to a wait response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct WaitExitError {
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// Response of the container wait endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerWaitResponse {
    /// Exit code of the container.
    #[serde(rename = "StatusCode")]
    pub status_code: i64,

    #[serde(rename = "Error", default)]
    pub error: Option<WaitExitError>,
}
