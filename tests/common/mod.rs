//! Helpers shared by the integration tests
#![allow(dead_code)]

use axum::Router;
use confman::config::ServerConfig;
use confman::routes;
use confman::state::AppState;
use confman::store::MemoryStore;
use std::io;
use std::sync::{Arc, Mutex};

/// Collects formatted log output so tests can assert on diagnostics
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture WARN and above on the current thread until the guard drops
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

pub fn test_state(store: MemoryStore) -> AppState {
    AppState {
        store,
        config: Arc::new(ServerConfig {
            service_host: "127.0.0.1".to_string(),
            service_port: 0,
            seed_file: None,
        }),
    }
}

/// Serve `router` on an ephemeral port and return its base URL
pub async fn serve_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

/// Serve the reference backend over `store` and return its base URL
pub async fn spawn_backend(store: MemoryStore) -> String {
    serve_router(routes::app(test_state(store))).await
}
