use std::env;
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Context, Result};

/// Settings for talking to a confman backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_api_base_url: String,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let backend_api_base_url = env::var("BACKEND_API_BASE_URL")
            .context("BACKEND_API_BASE_URL environment variable is required")?;

        let request_timeout = match env::var("CONFMAN_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .context("CONFMAN_REQUEST_TIMEOUT_SECS must be a positive number of seconds")?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(ClientConfig {
            backend_api_base_url,
            request_timeout,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Client configuration loaded:");
        tracing::info!("  Backend API: {}", self.backend_api_base_url);
        match self.request_timeout {
            Some(timeout) => tracing::info!("  Request timeout: {}s", timeout.as_secs()),
            None => tracing::info!("  Request timeout: none"),
        }
    }
}

/// Settings for the in-memory reference backend
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub service_host: String,
    pub service_port: u16,
    pub seed_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string());

        let seed_file = env::var("CONFMAN_SEED_FILE").ok().map(PathBuf::from);

        Ok(ServerConfig {
            service_host,
            service_port,
            seed_file,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Server configuration loaded:");
        tracing::info!("  Seed file: {}",
            self.seed_file
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none (starting empty)".to_string()));
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests in this module share process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BACKEND_API_BASE_URL");
            env::remove_var("CONFMAN_REQUEST_TIMEOUT_SECS");
            env::remove_var("SERVICE_PORT");
            env::remove_var("SERVICE_HOST");
            env::remove_var("CONFMAN_SEED_FILE");
        }
    }

    #[test]
    fn test_client_config_with_all_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("BACKEND_API_BASE_URL", "http://confman.internal:8000");
            env::set_var("CONFMAN_REQUEST_TIMEOUT_SECS", "15");
        }

        let config = ClientConfig::from_env().unwrap();

        assert_eq!(config.backend_api_base_url, "http://confman.internal:8000");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_client_config_missing_base_url() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();

        let result = ClientConfig::from_env();
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("BACKEND_API_BASE_URL"));
    }

    #[test]
    fn test_client_config_rejects_zero_timeout() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("BACKEND_API_BASE_URL", "http://localhost:8000");
            env::set_var("CONFMAN_REQUEST_TIMEOUT_SECS", "0");
        }

        let result = ClientConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("CONFMAN_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_server_config_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.service_port, 8000);
        assert_eq!(config.service_host, "127.0.0.1");
        assert_eq!(config.seed_file, None);
    }

    #[test]
    fn test_server_config_with_all_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("SERVICE_PORT", "9090");
            env::set_var("SERVICE_HOST", "0.0.0.0");
            env::set_var("CONFMAN_SEED_FILE", "/etc/confman/seed.json");
        }

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.service_port, 9090);
        assert_eq!(config.service_host, "0.0.0.0");
        assert_eq!(config.seed_file, Some(PathBuf::from("/etc/confman/seed.json")));
    }

    #[test]
    fn test_invalid_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("SERVICE_PORT", "not-a-number");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("SERVICE_PORT", "99999");
        }

        let result = ServerConfig::from_env();
        assert!(result.is_err());
    }
}
