use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::ServicePathConfigs;

/// Shareable in-memory configuration store for use across async handlers
///
/// Entries are grouped by service path. Service paths are stored verbatim;
/// nesting is only interpreted by [`MemoryStore::path_read`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<ServicePathConfigs>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given listing
    pub fn with_configs(configs: ServicePathConfigs) -> Self {
        Self {
            inner: Arc::new(RwLock::new(configs)),
        }
    }

    /// Load a store from a JSON file shaped like the listing response,
    /// e.g. `{"/svc/a": {"k1": "v1"}}`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a listing
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        let configs: ServicePathConfigs = serde_json::from_str(&raw)
            .with_context(|| format!("Seed file {} is not a service path listing", path.display()))?;

        tracing::info!(
            "Seeded store with {} service paths from {}",
            configs.len(),
            path.display()
        );
        Ok(Self::with_configs(configs))
    }

    /// Read the entries of a service path
    ///
    /// # Arguments
    /// * `path` - Service path to read; `/` is the root of every path
    /// * `recursive` - Also include every service path nested below `path`
    ///
    /// # Returns
    /// A listing containing only service paths that hold at least one key
    pub async fn path_read(&self, path: &str, recursive: bool) -> ServicePathConfigs {
        let prefix = path.trim_end_matches('/');
        let configs = self.inner.read().await;

        let listing: ServicePathConfigs = configs
            .iter()
            .filter(|(service_path, _)| {
                let service_path = service_path.trim_end_matches('/');
                if service_path == prefix {
                    return true;
                }
                recursive
                    && service_path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .map(|(service_path, keys)| (service_path.clone(), keys.clone()))
            .collect();

        tracing::debug!(
            "Read {} service paths under {} (recursive: {})",
            listing.len(),
            path,
            recursive
        );
        listing
    }

    /// Read a single value
    ///
    /// # Returns
    /// * `Some(value)` - Key exists under the service path
    /// * `None` - Service path or key is unknown
    pub async fn read(&self, path: &str, key: &str) -> Option<String> {
        let configs = self.inner.read().await;
        configs.get(path).and_then(|keys| keys.get(key)).cloned()
    }

    /// Create or overwrite a single value
    pub async fn write(&self, path: &str, key: &str, value: &str) {
        let mut configs = self.inner.write().await;
        configs
            .entry(path.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());

        tracing::debug!("Wrote key {} under {}", key, path);
    }

    /// Remove exactly the given keys from a service path
    ///
    /// Keys that do not exist are ignored. A service path left without keys
    /// is dropped from the store.
    ///
    /// # Returns
    /// The number of keys that were removed
    pub async fn delete_keys(&self, path: &str, keys: &[String]) -> usize {
        let mut configs = self.inner.write().await;
        let Some(entries) = configs.get_mut(path) else {
            return 0;
        };

        let removed = keys.iter().filter(|key| entries.remove(key.as_str()).is_some()).count();
        if entries.is_empty() {
            configs.remove(path);
        }

        tracing::debug!("Deleted {} of {} keys under {}", removed, keys.len(), path);
        removed
    }
}
