use anyhow::Context;
use predict_client::DEFAULT_ENDPOINT;
use protocol::{Field, FormInput};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/crossell.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CrossellConfig {
    pub(crate) endpoint: Option<String>,
    /// `tracing` filter directives used when `RUST_LOG` is unset.
    pub(crate) log_filter: Option<String>,
    #[serde(default)]
    pub(crate) defaults: BTreeMap<String, String>,
}

impl CrossellConfig {
    /// Endpoint after applying the command-line override.
    pub(crate) fn endpoint(&self, cli_override: Option<&str>) -> String {
        cli_override
            .or(self.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT)
            .to_string()
    }

    /// Built-in defaults with the `[defaults]` table layered on top.
    pub(crate) fn initial_form(&self) -> anyhow::Result<FormInput> {
        let mut form = FormInput::default();
        for (name, value) in &self.defaults {
            let field = Field::from_name(name)
                .with_context(|| format!("unknown field {name:?} in [defaults]"))?;
            form.set(field, value.clone());
        }
        Ok(form)
    }
}

/// Loads the config at `path`, or the default location when `path` is
/// `None`. Only the default location is allowed to be missing.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<(CrossellConfig, PathBuf)> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    if !required && !path.exists() {
        return Ok((CrossellConfig::default(), path));
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: CrossellConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .initial_form()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok((config, path))
}
