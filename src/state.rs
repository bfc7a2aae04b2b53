use crate::config::ServerConfig;
use crate::store::MemoryStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub config: Arc<ServerConfig>,
}
