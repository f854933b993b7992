//! Config file and environment loading

use crate::domain::Config;
use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "SRCPACK_";

/// Config file names looked up in the working directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "srcpack.toml",
    ".srcpack.toml",
    "srcpack.yml",
    ".srcpack.yml",
    "srcpack.yaml",
    ".srcpack.yaml",
];

/// Load defaults, then the config file, then `SRCPACK_*` variables.
///
/// An explicitly named config file must exist and parse. A discovered one
/// that fails to parse is reported and skipped.
pub fn load_config(working_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();
    let config_file = match config_path {
        Some(path) => {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => discover_config(working_dir),
    };

    let mut figment = defaults();
    if let Some(file) = config_file {
        match with_file(defaults(), &file) {
            Ok(layered) => {
                tracing::debug!("loaded config from {}", file.display());
                figment = layered;
            }
            Err(e) if explicit => return Err(e),
            Err(e) => {
                tracing::warn!("ignoring auto-discovered config {}: {:#}", file.display(), e);
            }
        }
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("invalid configuration in SRCPACK_* environment variables")
}

pub fn discover_config(working_dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| working_dir.join(name)).find(|path| path.is_file())
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(Config::default()))
}

/// Layer `file` over `figment`, checking that the result still extracts.
fn with_file(figment: Figment, file: &Path) -> Result<Figment> {
    let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let layered = match ext.as_str() {
        "toml" => figment.merge(Toml::file(file)),
        "yaml" | "yml" => figment.merge(Yaml::file(file)),
        other => bail!("unsupported config extension '.{}' for file {}", other, file.display()),
    };

    layered
        .extract::<Config>()
        .with_context(|| format!("invalid config file: {}", file.display()))?;
    Ok(layered)
}
