//! Shared helpers for the subcommands: configuration, input and output.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use hashlit_config::{load_config, load_config_from_str, ConfigError, HashlitConfig};
use hashlit_conformance::Literal;
use serde::de::DeserializeOwned;

use crate::GlobalArgs;

/// Loads the configuration named by `--config`, or `hashlit.toml` in the
/// current directory if present, or the defaults.
pub fn load_settings(global: &GlobalArgs) -> Result<HashlitConfig, Box<dyn Error>> {
    if let Some(path) = &global.config {
        let content =
            fs::read_to_string(path).map_err(|e| format!("cannot read config '{path}': {e}"))?;
        return Ok(load_config_from_str(&content)?);
    }
    match load_config(Path::new(".")) {
        Ok(config) => Ok(config),
        Err(ConfigError::IoError(e)) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no hashlit.toml found, using defaults");
            Ok(HashlitConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Reads and parses a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("cannot read '{path}': {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid JSON in '{path}': {e}").into())
}

/// Reads a literal file.
pub fn read_literal(path: &str) -> Result<Literal, Box<dyn Error>> {
    read_json(path)
}

/// Writes `bytes` to `output`, or to stdout if no path is given.
pub fn write_output(output: Option<&str>, bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            fs::write(path, bytes).map_err(|e| format!("cannot write '{path}': {e}"))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Serializes `value` as pretty JSON with a trailing newline.
pub fn to_json_bytes<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_with_config(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
        }
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[index]\nverify = true\n").unwrap();
        let config = load_settings(&global_with_config(Some(path.display().to_string()))).unwrap();
        assert!(config.index.verify);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_settings(&global_with_config(Some("/nonexistent/hashlit.toml".into())))
            .unwrap_err();
        assert!(err.to_string().contains("cannot read config"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[index]\nmax_table_size = 3\n").unwrap();
        let err = load_settings(&global_with_config(Some(path.display().to_string()))).unwrap_err();
        assert!(err.to_string().starts_with("validation error"));
    }

    #[test]
    fn read_literal_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lit.json");
        fs::write(&path, "{not json").unwrap();
        let path = path.display().to_string();
        let err = read_literal(&path).unwrap_err();
        assert!(err.to_string().contains(&path));
    }

    #[test]
    fn write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let path = path.display().to_string();
        write_output(Some(&path), b"{}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
