//! Network request bodies and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-network endpoint settings for a container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EndpointSettings {
    /// Extra DNS names under which the container is reachable on the network.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "crate::container::null_as_default")]
    pub aliases: Vec<String>,
}

/// Networking configuration applied when a container is created, keyed by
/// network name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkingConfig {
    pub endpoints_config: BTreeMap<String, EndpointSettings>,
}

/// Body of a network create call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkCreateOptions {
    pub name: String,

    /// Network driver, e.g. `"bridge"` or `"overlay"`. The engine default
    /// applies when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub driver: String,
}

/// Body of a network connect call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkConnectOptions {
    pub container: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_config: Option<EndpointSettings>,
}

/// Body of a network disconnect call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkDisconnectOptions {
    pub container: String,
    /// Disconnect even if the container is not running.
    pub force: bool,
}

/// Response to a successful network create call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkCreateResponse {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "Warning", default)]
    pub warning: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_connect_body_omits_missing_endpoint_config() {
        let body = NetworkConnectOptions { container: "c1".into(), endpoint_config: None };
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({"Container": "c1"}));
    }

    #[test]
    fn test_connect_body_with_aliases() {
        let body = NetworkConnectOptions {
            container: "c1".into(),
            endpoint_config: Some(EndpointSettings { aliases: vec!["web".into()] }),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"Container": "c1", "EndpointConfig": {"Aliases": ["web"]}})
        );
    }

    #[test]
    fn test_create_response_without_warning() {
        let resp: NetworkCreateResponse = serde_json::from_str(r#"{"Id":"22be93d5"}"#).unwrap();
        assert_eq!(resp.id, "22be93d5");
        assert_eq!(resp.warning, "");
    }
}
