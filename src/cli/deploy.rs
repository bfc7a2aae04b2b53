//! `deploy`: push `.yml` configuration files to the backend
//!
//! Every file holds the flat key/value configuration of one service path. The
//! service path is the file's location relative to a base directory with the
//! extension dropped, so `<base>/billing/prod.yml` deploys to `/billing/prod`.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::read_all;
use crate::client::ConfmanClient;
use crate::service_path::format_service_name;

const CONFIG_EXTENSION: &str = "yml";

/// Configuration read from one file
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub path: PathBuf,
    pub config: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// File or directory to deploy
    pub path: PathBuf,
    /// Directory that service paths are relative to
    pub base: PathBuf,
    /// Delete keys that the file does not mention
    pub define: bool,
    /// Skip the confirmation before deleting keys
    pub assume_yes: bool,
}

pub async fn deploy_command(
    client: &ConfmanClient,
    options: &DeployOptions,
    rd: &mut impl BufRead,
    w: &mut impl Write,
) -> Result<()> {
    let base = std::path::absolute(&options.base)
        .with_context(|| format!("Invalid base path {}", options.base.display()))?;

    for service_config in read_service_configs(&options.path)? {
        let service_path = file_path_to_service_path(&base, &service_config.path)?;

        if options.define {
            handle_define(client, &service_path, &service_config.config, options.assume_yes, rd, w)
                .await?;
        }

        for (key, value) in &service_config.config {
            writeln!(w, "Updating {service_path} {key} = {value}")?;
            client
                .write_service_path_key(&service_path, key, value)
                .await
                .with_context(|| format!("Failed to write {key} under {service_path}"))?;
        }
    }
    Ok(())
}

/// Delete the keys of `service_path` that `new_config` lacks, after asking
async fn handle_define(
    client: &ConfmanClient,
    service_path: &str,
    new_config: &BTreeMap<String, String>,
    assume_yes: bool,
    rd: &mut impl BufRead,
    w: &mut impl Write,
) -> Result<()> {
    let existing = read_all(client, service_path).await?;
    let stale: Vec<String> = existing
        .into_keys()
        .filter(|key| !new_config.contains_key(key))
        .collect();

    if stale.is_empty() {
        return Ok(());
    }

    if !assume_yes {
        write!(
            w,
            "Are you sure that you want to delete the following keys: {stale:?}?\nyes/no: "
        )?;
        w.flush()?;

        let mut answer = String::new();
        rd.read_line(&mut answer).context("Failed to read answer")?;
        if !answer.trim().to_lowercase().starts_with('y') {
            bail!("user aborted key deletion");
        }
    }

    tracing::info!("Deleting {} keys under {}", stale.len(), service_path);
    client
        .delete_service_path_keys(service_path, &stale)
        .await
        .with_context(|| format!("Failed to delete keys under {service_path}"))
}

/// Read a single configuration file, or every `.yml` file below a directory
pub fn read_service_configs(path: &Path) -> Result<Vec<ServiceConfig>> {
    let path = std::path::absolute(path)
        .with_context(|| format!("Invalid configuration path {}", path.display()))?;

    if path.is_file() {
        if !has_config_extension(&path) {
            bail!(
                "Failed to parse file {}: only .{CONFIG_EXTENSION} configuration is supported",
                path.display()
            );
        }
        return Ok(vec![read_service_config(path)?]);
    }

    let mut configs = Vec::new();
    for entry in WalkDir::new(&path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        if entry.file_type().is_file() && has_config_extension(entry.path()) {
            configs.push(read_service_config(entry.into_path())?);
        }
    }
    Ok(configs)
}

fn has_config_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CONFIG_EXTENSION)
}

fn read_service_config(path: PathBuf) -> Result<ServiceConfig> {
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_yml(&contents).with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(ServiceConfig { path, config })
}

/// Only flat mappings of scalars are accepted
fn parse_yml(contents: &str) -> Result<BTreeMap<String, String>> {
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(contents)?;
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => bail!("value of {key} must be a string, number or boolean"),
            };
            Ok((key, value))
        })
        .collect()
}

/// `<base>/billing/prod.yml` becomes `/billing/prod`
pub fn file_path_to_service_path(base: &Path, file: &Path) -> Result<String> {
    let relative = file.strip_prefix(base).with_context(|| {
        format!("{} is not below base path {}", file.display(), base.display())
    })?;

    let name: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    Ok(format_service_name(&name.join("/")))
}
