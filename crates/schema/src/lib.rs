//! Data contracts of the container engine API.
//!
//! This crate contains every request body, response envelope and identifier
//! exchanged with the engine. The `engine-api` crate moves these values over
//! the wire; nothing here performs I/O or carries protocol logic.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Validated newtype identifiers (`ContainerId`, `NetworkId`, `ImageRef`) |
//! | [`container`] | Container config, host config, ports, create/inspect/wait envelopes |
//! | [`network`] | Network create/connect/disconnect bodies and endpoint settings |
//! | [`mount`] | Mount specifications |
//! | [`image`] | Image removal response |
//! | [`progress`] | Build/pull progress stream messages |
//!
//! Field names follow the engine's JSON (`PascalCase` for most objects,
//! `camelCase` inside progress streams). Only the fields this client uses are
//! modelled; unknown response fields are ignored.

pub mod container;
pub mod identifiers;
pub mod image;
pub mod mount;
pub mod network;
pub mod progress;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use container::{
    Config, ContainerCreateResponse, ContainerInspectResponse, ContainerState,
    ContainerWaitResponse, CreateContainerRequest, Empty, HostConfig, NetworkSettings, Port,
    PortBinding, PortMap, PortSet, WaitExitError,
};
pub use identifiers::{ContainerId, ImageRef, NetworkId};
pub use image::ImageDeleteResponseItem;
pub use mount::{Mount, MountType};
pub use network::{
    EndpointSettings, NetworkConnectOptions, NetworkCreateOptions, NetworkCreateResponse,
    NetworkDisconnectOptions, NetworkingConfig,
};
pub use progress::{ErrorDetail, ProgressMessage};
