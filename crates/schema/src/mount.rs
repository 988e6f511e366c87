//! Mount specifications attached to a container's host configuration.

use serde::{Deserialize, Serialize};

/// Kind of filesystem a [`Mount`] attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountType {
    /// A host directory or file.
    Bind,
    /// A named volume managed by the engine.
    Volume,
    /// An in-memory tmpfs.
    Tmpfs,
    /// A Windows named pipe.
    Npipe,
    /// A swarm cluster volume.
    Cluster,
    /// Another image's filesystem.
    Image,
}

/// A mount (volume, bind, tmpfs, ...) inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Mount {
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MountType>,

    /// Volume name or host path, depending on [`Mount::kind`].
    ///
    /// Must be empty for tmpfs mounts.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// Path inside the container.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

impl Mount {
    /// Bind-mounts `source` on the host at `target` in the container.
    pub fn bind(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: Some(MountType::Bind),
            source: source.into(),
            target: target.into(),
            read_only: false,
        }
    }

    /// Mounts the named volume `name` at `target`.
    pub fn volume(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: Some(MountType::Volume),
            source: name.into(),
            target: target.into(),
            read_only: false,
        }
    }

    /// Marks the mount read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}
