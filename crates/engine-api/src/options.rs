//! Per-operation options and their query-string encoders.
//!
//! | Options | Operation | Keys |
//! |---------|-----------|------|
//! | [`CreateContainerOptions`] | container create | `name` |
//! | [`RemoveContainerOptions`] | container remove | `v`, `link`, `force` |
//! | [`StopOptions`] | container stop | `t`, `signal` |
//! | [`WaitCondition`] | container wait | `condition` |
//! | [`LogsOptions`] | container logs | `stdout`, `stderr`, `timestamps`, `follow`, `details`, `tail` |
//! | [`RemoveImageOptions`] | image remove | `force`, `prune_children` |
//! | [`ImageBuildOptions`] | image build | `t` (repeated), `dockerfile` |
//! | [`PullOptions`] | image pull | `fromImage`, `tag`, `platform` |

use crate::query::{Query, QueryParameters};

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// Options for creating a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateContainerOptions {
    /// Container name. The engine generates one when empty.
    pub name: String,
}

impl QueryParameters for CreateContainerOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.non_empty("name", &self.name);
        query
    }
}

/// Options for removing a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveContainerOptions {
    /// Also remove the anonymous volumes attached to the container.
    pub remove_volumes: bool,
    /// Remove the link (not the container) when the ID names a link.
    pub remove_links: bool,
    /// Kill the container first if it is running.
    pub force: bool,
}

impl QueryParameters for RemoveContainerOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query
            .flag("v", self.remove_volumes)
            .flag("link", self.remove_links)
            .flag("force", self.force);
        query
    }
}

/// Options for stopping a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopOptions {
    /// Signal sent to stop the container gracefully (e.g. `"SIGINT"`). The
    /// engine default (`SIGTERM`, or the image's `StopSignal`) applies when
    /// empty.
    pub signal: String,

    /// Seconds to wait for a graceful stop before the container is killed.
    ///
    /// - `None` uses the container's configured stop timeout, or the engine
    ///   default.
    /// - `Some(0)` kills immediately.
    /// - A negative value waits indefinitely; the container is never killed.
    pub timeout: Option<i64>,
}

impl StopOptions {
    /// Stop with the given timeout in seconds.
    pub fn with_timeout(seconds: i64) -> Self {
        Self {
            timeout: Some(seconds),
            ..Self::default()
        }
    }
}

impl QueryParameters for StopOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query.number("t", self.timeout).non_empty("signal", &self.signal);
        query
    }
}

/// Container state a wait call blocks on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WaitCondition {
    /// Any non-running state: created, exited, dead, removing or removed.
    #[default]
    NotRunning,
    /// The next transition to a non-running state. A container that is
    /// currently created or exited must first run and exit, or be removed.
    NextExit,
    /// Removal of the container.
    Removed,
}

impl WaitCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotRunning => "not-running",
            Self::NextExit => "next-exit",
            Self::Removed => "removed",
        }
    }
}

impl std::fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unset condition leaves the choice to the engine (`not-running`).
impl QueryParameters for Option<WaitCondition> {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(condition) = self {
            query.always("condition", condition.as_str());
        }
        query
    }
}

/// Options for fetching container logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogsOptions {
    pub stdout: bool,
    pub stderr: bool,
    /// Prefix every line with its timestamp.
    pub timestamps: bool,
    /// Keep the stream open and follow new output.
    pub follow: bool,
    /// Number of lines to return from the end of the log, or `"all"`.
    ///
    /// Always sent, even when empty.
    pub tail: String,
    /// Include extra details provided to the log driver.
    pub details: bool,
}

impl QueryParameters for LogsOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query
            .flag("stdout", self.stdout)
            .flag("stderr", self.stderr)
            .flag("timestamps", self.timestamps)
            .flag("follow", self.follow)
            .flag("details", self.details)
            .always("tail", &self.tail);
        query
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Options for removing an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveImageOptions {
    /// Remove the image even if it is in use by stopped containers or has
    /// other tags.
    pub force: bool,
    /// Delete untagged parent images.
    pub prune_children: bool,
}

impl QueryParameters for RemoveImageOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query
            .flag("force", self.force)
            .flag("prune_children", self.prune_children);
        query
    }
}

/// Options for building an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuildOptions {
    /// `name:tag` references to apply to the built image.
    pub tags: Vec<String>,
    /// Path of the Dockerfile inside the build context. The engine uses
    /// `Dockerfile` when empty.
    pub dockerfile: String,
}

impl QueryParameters for ImageBuildOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query
            .repeated("t", &self.tags)
            .non_empty("dockerfile", &self.dockerfile);
        query
    }
}

/// Options for pulling an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullOptions {
    /// Image to pull, e.g. `"alpine"` or `"alpine:3.20"`.
    pub from_image: String,
    /// Tag to pull when not part of `from_image`.
    pub tag: String,
    /// `os[/arch[/variant]]` to pull for a multi-platform image.
    pub platform: String,
}

impl PullOptions {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            from_image: image.into(),
            ..Self::default()
        }
    }
}

impl QueryParameters for PullOptions {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        query
            .always("fromImage", &self.from_image)
            .non_empty("tag", &self.tag)
            .non_empty("platform", &self.platform);
        query
    }
}
