//! Sentinel-returning adapter over [`ConfmanClient`]
//!
//! Callers written against the older contract expect failures to come back as
//! default values instead of errors: an empty sequence for listings, an empty
//! string for reads and `false` for writes and deletes. Every failure is
//! logged through `tracing` before the default is returned, which is the only
//! way to tell "nothing there" from "request failed" with this adapter.

use serde_json::value::RawValue;

use super::{ConfmanClient, ServicePathListing};

/// [`ConfmanClient`] with errors collapsed into default values
#[derive(Clone, Debug)]
pub struct LenientConfmanClient {
    inner: ConfmanClient,
}

impl LenientConfmanClient {
    pub fn new(inner: ConfmanClient) -> Self {
        Self { inner }
    }

    /// The wrapped client, for callers that want the error
    pub fn inner(&self) -> &ConfmanClient {
        &self.inner
    }

    /// Recursive listing of every service path, or an empty sequence on failure
    pub async fn get_service_path_configs(&self) -> ServicePathListing {
        match self.inner.get_service_path_configs().await {
            Ok(configs) => configs,
            Err(err) => {
                tracing::warn!(
                    path = crate::routes::SERVICE_PATHS,
                    error = %err,
                    "failed to retrieve service paths"
                );
                empty_sequence()
            }
        }
    }

    /// Value of `key` under `path`, or an empty string on failure
    pub async fn read_service_path_key(&self, path: &str, key: &str) -> String {
        match self.inner.read_service_path_key(path, key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(service_path = path, key, error = %err, "failed to read key");
                String::new()
            }
        }
    }

    /// `true` if the value was stored
    pub async fn write_service_path_key(&self, path: &str, key: &str, value: &str) -> bool {
        match self.inner.write_service_path_key(path, key, value).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(service_path = path, key, error = %err, "failed to write key");
                false
            }
        }
    }

    /// `true` if the backend accepted the whole batch
    pub async fn delete_service_path_keys<S: AsRef<str>>(&self, path: &str, keys: &[S]) -> bool {
        match self.inner.delete_service_path_keys(path, keys).await {
            Ok(()) => true,
            Err(err) => {
                let keys: Vec<&str> = keys.iter().map(|k| k.as_ref()).collect();
                tracing::warn!(service_path = path, ?keys, error = %err, "failed to delete keys");
                false
            }
        }
    }
}

fn empty_sequence() -> ServicePathListing {
    RawValue::from_string("[]".to_string()).unwrap_or_else(|_| unreachable!("`[]` is valid JSON"))
}

impl From<ConfmanClient> for LenientConfmanClient {
    fn from(inner: ConfmanClient) -> Self {
        Self::new(inner)
    }
}
