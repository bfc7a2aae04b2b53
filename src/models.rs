use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Listing of configuration entries, keyed by service path and then by key
pub type ServicePathConfigs = BTreeMap<String, BTreeMap<String, String>>;

/// Request body for PUT /service_paths/key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WriteKeyRequest {
    pub path: String,
    pub key: String,
    pub value: String,
}

/// Request body for DELETE /service_paths/keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteKeysRequest {
    pub path: String,
    pub keys: Vec<String>,
}

/// Query parameters for GET /service_paths/key
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReadKeyQuery {
    /// Service path the key lives under
    #[serde(rename = "service-path")]
    pub service_path: String,
    /// Key to read
    pub key: String,
}

/// Query parameters for GET /service_paths
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Service path to list (default: `/`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Include every service path nested below `path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}
