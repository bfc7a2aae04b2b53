//! Output formats shared by the client commands

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    #[value(alias = "txt")]
    Text,
    Json,
    Yaml,
}

/// Write `value` as pretty JSON or YAML
///
/// Text output is command specific; for `Text` this falls back to pretty JSON.
pub fn write_structured<T: Serialize + ?Sized>(
    format: OutputFormat,
    w: &mut impl Write,
    value: &T,
) -> Result<()> {
    match format {
        OutputFormat::Yaml => write!(w, "{}", serde_yaml::to_string(value)?)?,
        OutputFormat::Json | OutputFormat::Text => {
            writeln!(w, "{}", serde_json::to_string_pretty(value)?)?
        }
    }
    Ok(())
}

/// Strings print without quotes, anything else as JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
