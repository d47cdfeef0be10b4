mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use diffgate::config::{FileConfig, LogConfig, LogFormat, LogLevel};
use diffgate::{DiffGate, GateConfig};

const EXIT_TRIGGER: u8 = 0;
const EXIT_NO_TRIGGER: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "diffgate")]
#[command(about = "Exit 0 when the changes between two commits should trigger a pipeline, 1 otherwise")]
#[command(version)]
struct Cli {
    /// Target commit hash to compare
    #[arg(short, long = "target-commit-hash")]
    target_commit_hash: String,

    /// The commit with new changes
    #[arg(short, long = "change-commit-hash")]
    change_commit_hash: String,

    /// Include list files (relative to the repository root, glob expressions are supported)
    #[arg(short, long = "include-list", required_unless_present = "config")]
    include_list: Vec<String>,

    /// Exclude list files (relative to the repository root, glob expressions are supported)
    #[arg(short, long = "exclude-list")]
    exclude_list: Vec<String>,

    /// Git repository directory, default value is the current directory
    #[arg(short = 'l', long = "git-local-dir")]
    git_local_dir: Option<PathBuf>,

    /// Ignore commits from the following author e-mail
    #[arg(short = 'a', long = "ignore-authors")]
    ignore_authors: Vec<String>,

    /// TOML file with [gate] and [log] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Log output: pretty or json
    #[arg(long)]
    log_format: Option<LogFormat>,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::from(EXIT_TRIGGER),
        Ok(false) => ExitCode::from(EXIT_NO_TRIGGER),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    logging::init(&LogConfig::resolve(
        &file_config.log,
        cli.log_level,
        cli.log_format,
    ))?;

    let root = match cli.git_local_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Could not determine the current directory")?,
    };

    let gate_config = GateConfig {
        root,
        target: cli.target_commit_hash,
        change: cli.change_commit_hash,
        include: merge(file_config.gate.include, cli.include_list),
        exclude: merge(file_config.gate.exclude, cli.exclude_list),
        ignore_authors: merge(file_config.gate.ignore_authors, cli.ignore_authors),
    };

    let gate = DiffGate::new(gate_config).context("Could not set up the diff gate")?;
    let trigger = gate.evaluate().context("Could not evaluate the diff gate")?;

    Ok(trigger)
}

/// Config file entries first, then command-line entries
fn merge(mut from_file: Vec<String>, from_cli: Vec<String>) -> Vec<String> {
    from_file.extend(from_cli);
    from_file
}
