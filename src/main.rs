use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use colored::*;

use squelch_lib::exit_codes::{PENDING_CHANGES, SUCCESS, exit};
use squelch_lib::init::create_default_config;
use squelch_lib::pipeline::{self, RunOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or globs to lint; defaults to every project member
    #[arg(required = false)]
    paths: Vec<String>,

    /// Path or directory of the project manifest (project.json)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Exclude files matching a glob; may be given multiple times
    #[arg(short, long, action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Lint configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report files that would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Show each lint failure as it is suppressed
    #[arg(short, long)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,

    /// Command to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default squelch.json in the current directory
    Init,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run_command(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            exit::tool_error();
        }
    }
}

fn run_command(cli: &Cli) -> anyhow::Result<i32> {
    if let Some(Commands::Init) = cli.command {
        return run_init();
    }

    if cli.project.is_none() && cli.paths.is_empty() {
        anyhow::bail!("No files specified. Use --project to lint a project folder.");
    }

    let options = RunOptions {
        files: cli.paths.clone(),
        project: cli.project.clone(),
        exclude: cli.exclude.clone(),
        config: cli.config.clone(),
    };
    let outcome = pipeline::run(&options)?;

    for warning in &outcome.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    if cli.verbose && !cli.quiet {
        for failure in &outcome.failures {
            println!("{failure}");
        }
    }

    if cli.dry_run {
        for path in outcome.updated.keys() {
            println!("Would update {}", path.display());
        }
        if !cli.quiet && outcome.updated.is_empty() {
            println!("{} file(s) checked, nothing to update", outcome.files_checked);
        }
        return Ok(if outcome.updated.is_empty() { SUCCESS } else { PENDING_CHANGES });
    }

    if !cli.quiet {
        for path in outcome.updated.keys() {
            println!("Writing updated source for {}", path.display());
        }
    }
    for error in pipeline::write_updates(&outcome) {
        eprintln!("{} {error}", "Error:".red().bold());
    }
    Ok(SUCCESS)
}

fn run_init() -> anyhow::Result<i32> {
    if create_default_config("squelch.json")? {
        println!("Created default configuration at squelch.json");
        Ok(SUCCESS)
    } else {
        anyhow::bail!("squelch.json already exists in the current directory");
    }
}
