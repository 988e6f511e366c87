//! Image removal responses.

use serde::Deserialize;

/// One entry of an image removal response.
///
/// Removing a tagged image produces one `untagged` entry per removed tag and
/// one `deleted` entry per removed layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ImageDeleteResponseItem {
    /// ID of an image that was deleted.
    #[serde(rename = "Deleted")]
    pub deleted: Option<String>,

    /// Reference of an image that was untagged.
    #[serde(rename = "Untagged")]
    pub untagged: Option<String>,
}
