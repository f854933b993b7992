//! CLI-over-config merging

use crate::domain::Config;

/// Settings given on the command line. Empty lists, `false` flags and a
/// missing format leave the loaded configuration untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub no_ignore: bool,
    pub hidden: bool,
    pub format: Option<String>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if !cli.exclude.is_empty() {
        config.exclude = split_patterns(&cli.exclude);
    }
    if !cli.include.is_empty() {
        config.include = split_patterns(&cli.include);
    }
    config.no_ignore |= cli.no_ignore;
    config.hidden |= cli.hidden;
    if let Some(format) = cli.format {
        config.format = format;
    }
    config
}

/// Flags may repeat and each value may hold several comma-separated patterns.
fn split_patterns(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}
