//! Messages of the newline-delimited JSON progress streams produced by image
//! builds and pulls.

use serde::Deserialize;

/// Error reported inside a progress stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub code: Option<i64>,
    pub message: String,
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// One line of a progress stream.
///
/// Build streams mostly carry `stream` (raw build output, newline included);
/// pull streams carry `status`, `id` and `progress`. A failure is reported
/// through `errorDetail`, after which the engine may keep sending lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ProgressMessage {
    pub stream: Option<String>,
    pub status: Option<String>,
    pub id: Option<String>,
    pub progress: Option<String>,
    #[serde(rename = "errorDetail")]
    pub error_detail: Option<ErrorDetail>,
}
