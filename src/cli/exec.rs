//! `exec`: run a command with service path configuration in its environment

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::process::Command;

use super::read_all;
use crate::client::ConfmanClient;
use crate::service_path::parse_service_paths;

/// Merge the configuration of every listed service path, later paths winning
pub async fn collect_environment(
    client: &ConfmanClient,
    service_paths: &str,
) -> Result<BTreeMap<String, String>> {
    let mut config = BTreeMap::new();
    for service_path in parse_service_paths(service_paths) {
        config.extend(read_all(client, &service_path).await?);
    }
    Ok(config)
}

/// Build `program args...` with `config` added to the inherited environment
///
/// Also returns the names of variables that the configuration overrides.
pub fn build_command(
    program: &str,
    args: &[String],
    config: &BTreeMap<String, String>,
) -> (Command, Vec<String>) {
    let overwritten = config
        .keys()
        .filter(|key| std::env::var_os(key).is_some())
        .cloned()
        .collect();

    let mut command = Command::new(program);
    command.args(args).envs(config);
    (command, overwritten)
}

/// Replace this process with the command; only returns on failure
pub async fn exec_command(
    client: &ConfmanClient,
    service_paths: &str,
    program: &str,
    args: &[String],
) -> Result<()> {
    let config = collect_environment(client, service_paths).await?;
    let (command, overwritten) = build_command(program, args, &config);
    for key in overwritten {
        tracing::warn!("overwriting environment variable {}", key);
    }

    tracing::debug!("Executing {} with {} configured variables", program, config.len());
    run(command).with_context(|| format!("Failed to execute {program}"))
}

#[cfg(unix)]
fn run(mut command: Command) -> Result<()> {
    use std::os::unix::process::CommandExt;

    Err(command.exec().into())
}

#[cfg(not(unix))]
fn run(mut command: Command) -> Result<()> {
    let status = command.status()?;
    std::process::exit(status.code().unwrap_or(1))
}
