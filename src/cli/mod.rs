//! Command-line interface for the `confman` binary.
//!
//! Client commands talk to a backend through [`ConfmanClient`]; `serve` runs
//! the in-memory reference backend.

pub mod deploy;
pub mod exec;
pub mod output;

pub use deploy::{deploy_command, DeployOptions};
pub use exec::exec_command;
pub use output::OutputFormat;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::client::ConfmanClient;
use crate::config::{ClientConfig, ServerConfig};
use crate::routes;
use crate::service_path::{format_service_name, parse_service_paths};
use crate::state::AppState;
use crate::store::MemoryStore;
use output::{display_value, write_structured};

const MASKED_VALUE: &str = "***";

/// Manage configuration stored under hierarchical service paths.
#[derive(Parser, Debug)]
#[command(name = "confman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the confman backend.
    ///
    /// Falls back to the BACKEND_API_BASE_URL environment variable.
    #[arg(long = "backend-url", value_name = "URL", global = true)]
    pub backend_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configuration of every service path
    List {
        /// Only show these service paths, e.g. `billing/dev+prod,search/prod`
        service_paths: Option<String>,

        /// Show values instead of `***`
        #[arg(long = "reveal", env = "CONFMAN_REVEAL_VALUES")]
        reveal: bool,

        /// Format of output
        #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text, env = "CONFMAN_DEFAULT_FORMAT")]
        format: OutputFormat,
    },
    /// Read keys of a service
    Read {
        /// Name of the service
        service: String,
        /// Names of the keys to read
        #[arg(required = true)]
        keys: Vec<String>,
        /// Print only the value (only works for a single key)
        #[arg(short = 'q', long = "quiet")]
        quiet: bool,
        /// Format of output
        #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text, env = "CONFMAN_DEFAULT_FORMAT")]
        format: OutputFormat,
    },
    /// Create or overwrite a single key
    Write {
        /// Name of the service
        service: String,
        key: String,
        value: String,
    },
    /// Delete keys from a service
    Delete {
        /// Name of the service
        service: String,
        /// Keys to delete
        #[arg(required_unless_present = "delete_all", conflicts_with = "delete_all")]
        keys: Vec<String>,
        /// Delete every key of the service
        #[arg(long = "delete-all-keys")]
        delete_all: bool,
        /// Format of output
        #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text, env = "CONFMAN_DEFAULT_FORMAT")]
        format: OutputFormat,
    },
    /// Deploy configuration from `.yml` files
    Deploy {
        /// File or folder containing configuration
        path: PathBuf,
        /// Base path from which to determine service paths, defaults to the working directory
        #[arg(long = "base", value_name = "DIR")]
        base: Option<PathBuf>,
        /// Remove keys from the backend which don't exist in the given configuration
        #[arg(long = "define")]
        define: bool,
        /// Assume yes to key deletion prompts (used with `--define`)
        #[arg(short = 'y', long = "assume-yes")]
        assume_yes: bool,
    },
    /// Run a command with the configuration of the given service paths in its environment
    Exec {
        /// Name of the service(s), e.g. `billing/prod,shared/prod`
        service_paths: String,
        /// Command to execute, defaults to $SHELL
        #[arg(env = "SHELL")]
        command: String,
        /// Command arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Serve the in-memory backend over HTTP
    Serve {
        /// JSON file to seed the store with, e.g. `{"/svc/a": {"k1": "v1"}}`
        #[arg(long = "seed", value_name = "PATH")]
        seed: Option<PathBuf>,
    },
}

/// Dispatch a parsed command line, writing command output to stdout
pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        backend_url,
        command,
        ..
    } = cli;

    match command {
        Commands::Serve { seed } => {
            let mut config = ServerConfig::from_env()?;
            if seed.is_some() {
                config.seed_file = seed;
            }
            serve(config).await
        }
        Commands::List {
            service_paths,
            reveal,
            format,
        } => {
            let client = client_from(backend_url)?;
            let mut stdout = std::io::stdout().lock();
            list_command(&client, service_paths.as_deref(), format, reveal, &mut stdout).await
        }
        Commands::Read {
            service,
            keys,
            quiet,
            format,
        } => {
            let client = client_from(backend_url)?;
            let mut stdout = std::io::stdout().lock();
            read_command(&client, &service, &keys, quiet, format, &mut stdout).await
        }
        Commands::Write { service, key, value } => {
            let client = client_from(backend_url)?;
            let mut stdout = std::io::stdout().lock();
            write_command(&client, &service, &key, &value, &mut stdout).await
        }
        Commands::Delete {
            service,
            keys,
            delete_all,
            format,
        } => {
            let client = client_from(backend_url)?;
            let mut stdout = std::io::stdout().lock();
            delete_command(&client, &service, &keys, delete_all, format, &mut stdout).await
        }
        Commands::Deploy {
            path,
            base,
            define,
            assume_yes,
        } => {
            let base = match base {
                Some(base) => base,
                None => std::env::current_dir().context("Failed to determine working directory")?,
            };
            let options = DeployOptions {
                path,
                base,
                define,
                assume_yes,
            };
            let client = client_from(backend_url)?;
            let mut stdin = std::io::stdin().lock();
            let mut stdout = std::io::stdout().lock();
            deploy_command(&client, &options, &mut stdin, &mut stdout).await
        }
        Commands::Exec {
            service_paths,
            command,
            args,
        } => {
            let client = client_from(backend_url)?;
            exec_command(&client, &service_paths, &command, &args).await
        }
    }
}

fn client_from(backend_url: Option<String>) -> Result<ConfmanClient> {
    let config = match backend_url {
        Some(backend_api_base_url) => ClientConfig {
            backend_api_base_url,
            request_timeout: None,
        },
        None => ClientConfig::from_env()?,
    };
    config.log_startup();

    ConfmanClient::from_config(&config).context("Failed to create confman client")
}

/// Own keys of one service path, values rendered as text
pub async fn read_all(client: &ConfmanClient, service_path: &str) -> Result<BTreeMap<String, String>> {
    let listing = client
        .list_service_path(service_path, false)
        .await
        .with_context(|| format!("Failed to list {service_path}"))?;
    let listing: Value = serde_json::from_str(listing.get())?;

    match listing.get(service_path) {
        Some(Value::Object(entries)) => Ok(entries
            .iter()
            .map(|(key, value)| (key.clone(), display_value(value)))
            .collect()),
        Some(other) => bail!("Unexpected configuration for {service_path}: {other}"),
        None => Ok(BTreeMap::new()),
    }
}

pub async fn list_command(
    client: &ConfmanClient,
    service_paths: Option<&str>,
    format: OutputFormat,
    reveal: bool,
    w: &mut impl Write,
) -> Result<()> {
    let listing = client
        .get_service_path_configs()
        .await
        .context("Failed to list service paths")?;
    let mut configs: Value = serde_json::from_str(listing.get())?;

    if let Value::Object(map) = &mut configs {
        if let Some(filter) = service_paths {
            let wanted: BTreeSet<String> = parse_service_paths(filter).into_iter().collect();
            map.retain(|service_path, _| wanted.contains(service_path));
        }
        if !reveal {
            for entries in map.values_mut() {
                if let Value::Object(entries) = entries {
                    for value in entries.values_mut() {
                        *value = Value::String(MASKED_VALUE.to_string());
                    }
                }
            }
        }
    }

    let Value::Object(map) = &configs else {
        return write_structured(format, w, &configs);
    };
    if format != OutputFormat::Text {
        return write_structured(format, w, &configs);
    }

    for (i, (service_path, entries)) in map.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, "Config for '{service_path}'")?;
        match entries {
            Value::Object(entries) => {
                for (key, value) in entries {
                    writeln!(w, "{key} = {}", display_value(value))?;
                }
            }
            other => writeln!(w, "{other}")?,
        }
    }
    Ok(())
}

pub async fn read_command(
    client: &ConfmanClient,
    service: &str,
    keys: &[String],
    quiet: bool,
    format: OutputFormat,
    w: &mut impl Write,
) -> Result<()> {
    let service_path = format_service_name(service);

    let mut config = BTreeMap::new();
    for key in keys {
        let value = client
            .read_service_path_key(&service_path, key)
            .await
            .with_context(|| format!("Failed to read {key} under {service_path}"))?;
        config.insert(key.as_str(), value);
    }

    if quiet && config.len() == 1 {
        if let Some(value) = config.values().next() {
            write!(w, "{value}")?;
        }
        return Ok(());
    }

    if format != OutputFormat::Text {
        return write_structured(format, w, &BTreeMap::from([(service_path.as_str(), &config)]));
    }

    for (key, value) in &config {
        writeln!(w, "{service_path}/{key} = {value}")?;
    }
    Ok(())
}

pub async fn write_command(
    client: &ConfmanClient,
    service: &str,
    key: &str,
    value: &str,
    w: &mut impl Write,
) -> Result<()> {
    let service_path = format_service_name(service);
    client
        .write_service_path_key(&service_path, key, value)
        .await
        .with_context(|| format!("Failed to write {key} under {service_path}"))?;

    writeln!(w, "Wrote {service_path}/{key}")?;
    Ok(())
}

/// Delete `keys`, or with `delete_all` every key the service currently has
pub async fn delete_command(
    client: &ConfmanClient,
    service: &str,
    keys: &[String],
    delete_all: bool,
    format: OutputFormat,
    w: &mut impl Write,
) -> Result<()> {
    let service_path = format_service_name(service);

    let keys: Vec<String> = if delete_all {
        read_all(client, &service_path).await?.into_keys().collect()
    } else {
        keys.to_vec()
    };

    if !keys.is_empty() {
        client
            .delete_service_path_keys(&service_path, &keys)
            .await
            .with_context(|| format!("Failed to delete keys under {service_path}"))?;
    }

    if format != OutputFormat::Text {
        return write_structured(format, w, &BTreeMap::from([(service_path.as_str(), &keys)]));
    }

    for key in &keys {
        writeln!(w, "Deleted {service_path}/{key}")?;
    }
    Ok(())
}

/// Run the in-memory backend until the process is interrupted
pub async fn serve(config: ServerConfig) -> Result<()> {
    config.log_startup();

    let store = match &config.seed_file {
        Some(path) => MemoryStore::from_json_file(path)?,
        None => MemoryStore::new(),
    };

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let state = AppState {
        store,
        config: Arc::new(config),
    };

    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
        .await
        .context("Server error")?;

    Ok(())
}

/// Resolves once `signal` fires
///
/// If the signal handler cannot be installed this never resolves and the
/// server runs until the process is killed.
async fn wait_for_shutdown(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(err) => {
            tracing::error!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
