mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, check, normalize, tree, ApplyArgs, CheckArgs, NormalizeArgs, TreeArgs};
use tracing_subscriber::EnvFilter;

/// Cardkit CLI - inspect and edit card documents
#[derive(Parser, Debug)]
#[command(name = "cardkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log edits and rejected commands
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a document and report its structure
    Check(CheckArgs),

    /// Import a document, assign missing ids and export it again
    Normalize(NormalizeArgs),

    /// Replay a JSON command script against a document
    Apply(ApplyArgs),

    /// Print the node tree with paths
    Tree(TreeArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = config::Config::load(&cwd)?;

    match cli.command {
        Command::Check(args) => check(args, &config),
        Command::Normalize(args) => normalize(args, &config),
        Command::Apply(args) => apply(args, &config),
        Command::Tree(args) => tree(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
