//! Command-line interface for srcpack
//!
//! A single command: expand the given paths and globs, filter them, and pack
//! the surviving files into one Markdown or Org document.

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::detect::ContentDetector;
use crate::execute::Executor;
use crate::filter::{FilterManager, FilterOptions};
use crate::output::{open_sinks, Sink};
use crate::plan::Planner;
use crate::render::formatter_for;

mod dry_run;
mod stdin;

pub use dry_run::print_dry_run;
pub use stdin::{read_targets, StdinMode};

/// Pack multiple source files into a single context document
#[derive(Parser, Debug)]
#[command(name = "srcpack")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Paths or glob patterns to search for files.
    /// If omitted, input must be provided via stdin flags or --include
    #[arg(value_name = "PATH_OR_GLOB")]
    pub targets: Vec<String>,

    /// Include hidden files and directories
    #[arg(short = 'H', long)]
    pub hidden: bool,

    /// Do not respect .gitignore files
    #[arg(short = 'I', long)]
    pub no_ignore: bool,

    /// Unrestricted search, alias for --hidden --no-ignore
    #[arg(short = 'u', long)]
    pub unrestricted: bool,

    /// Exclude files/directories matching these globs (repeatable or comma-separated)
    #[arg(short = 'E', long, value_name = "GLOB", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Force-include files matching these globs, bypassing ignore rules
    #[arg(long, value_name = "GLOB", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Output format (markdown, md, org) [default: markdown]
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Copy output to the system clipboard
    #[arg(short = 'c', long)]
    pub clipboard: bool,

    /// Read NUL-separated paths from stdin (e.g. 'find . -print0')
    #[arg(short = '0', long = "from-stdin-0", conflicts_with = "from_stdin_line")]
    pub from_stdin_0: bool,

    /// Read newline-separated paths from stdin (e.g. 'ls -1')
    #[arg(short = 'l', long)]
    pub from_stdin_line: bool,

    /// Print the files that would be processed without generating output
    #[arg(long)]
    pub dry_run: bool,

    /// Path to config file (srcpack.toml or .srcpack.yml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    fn stdin_mode(&self) -> Option<StdinMode> {
        if self.from_stdin_0 {
            Some(StdinMode::Nul)
        } else if self.from_stdin_line {
            Some(StdinMode::Line)
        } else {
            None
        }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            exclude: self.exclude.clone(),
            include: self.include.clone(),
            no_ignore: self.no_ignore || self.unrestricted,
            hidden: self.hidden || self.unrestricted,
            format: self.format.clone(),
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let working_dir = std::env::current_dir().context("failed to determine current directory")?;
    pack(&cli, &working_dir)
}

fn pack(cli: &Cli, working_dir: &Path) -> Result<()> {
    let file_config = load_config(working_dir, cli.config.as_deref())?;
    let config = merge_cli_with_config(file_config, cli.overrides());
    let stdin_mode = cli.stdin_mode();

    if cli.targets.is_empty() && config.include.is_empty() && stdin_mode.is_none() {
        bail!("no target paths provided, and no input from stdin specified");
    }

    let formatter = formatter_for(&config.format)?;

    let filter = FilterManager::new(FilterOptions {
        exclude_patterns: config.exclude.clone(),
        include_patterns: config.include.clone(),
        disable_gitignore: config.no_ignore,
        allow_dotfiles: config.hidden,
        working_dir: working_dir.to_path_buf(),
    })
    .context("failed to initialize filter manager")?;

    let mut targets = cli.targets.clone();
    if let Some(mode) = stdin_mode {
        let from_stdin = read_targets(io::stdin().lock(), mode)
            .with_context(|| format!("failed to read {} paths from stdin", mode.describe()))?;
        tracing::debug!("read {} targets from stdin", from_stdin.len());
        targets.extend(from_stdin);
    }

    let detector = ContentDetector::new();
    let plan = Planner::new(&filter, &detector).plan(&targets);

    if cli.dry_run {
        let mut stdout = io::stdout().lock();
        return print_dry_run(&mut stdout, &plan, &config.format)
            .context("failed to print dry run");
    }

    let mut sinks = open_sinks(cli.output.as_deref(), cli.clipboard)?;
    Executor::new(formatter.as_ref(), &mut sinks)
        .execute(&plan)
        .context("execution phase failed")?;
    sinks.finish().context("failed to finish writing output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_about_comes_from_doc_comment() {
        let about = Cli::command().get_about().map(|a| a.to_string()).unwrap_or_default();
        assert_eq!(about, "Pack multiple source files into a single context document");
    }

    #[test]
    fn test_unrestricted_sets_both_flags() {
        let cli = Cli::parse_from(["srcpack", "-u", "src"]);
        let overrides = cli.overrides();
        assert!(overrides.hidden);
        assert!(overrides.no_ignore);
    }

    #[test]
    fn test_repeated_and_comma_separated_patterns() {
        let cli = Cli::parse_from([
            "srcpack",
            "-E",
            "a/**,b/**",
            "--exclude",
            "c",
            "--include",
            ".env",
        ]);
        assert_eq!(cli.exclude, vec!["a/**", "b/**", "c"]);
        assert_eq!(cli.include, vec![".env"]);
        assert!(cli.targets.is_empty());
    }

    #[test]
    fn test_stdin_modes_conflict() {
        let err = Cli::try_parse_from(["srcpack", "-0", "-l"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_stdin_mode_selection() {
        assert_eq!(Cli::parse_from(["srcpack", "-0"]).stdin_mode(), Some(StdinMode::Nul));
        assert_eq!(Cli::parse_from(["srcpack", "-l"]).stdin_mode(), Some(StdinMode::Line));
        assert_eq!(Cli::parse_from(["srcpack", "x"]).stdin_mode(), None);
    }
}
