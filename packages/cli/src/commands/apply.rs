use super::{render, write_output};
use crate::config::Config;
use anyhow::{bail, Context, Result};
use cardkit_editor::{Command, DocumentStore, EditOutcome};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Document JSON file
    pub input: PathBuf,

    /// JSON array of commands
    pub script: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop at the first rejected command
    #[arg(long)]
    pub strict: bool,
}

pub fn apply(args: ApplyArgs, config: &Config) -> Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("reading {}", args.script.display()))?;
    let commands: Vec<Command> = serde_json::from_str(&script)
        .with_context(|| format!("parsing commands in {}", args.script.display()))?;

    let mut store = DocumentStore::new(config.editor.clone());
    store
        .import_json(&source)
        .with_context(|| format!("importing {}", args.input.display()))?;

    let mut rejected = 0;
    for (step, command) in commands.into_iter().enumerate() {
        let name = command_name(&command);
        match store.execute(command) {
            EditOutcome::Applied => eprintln!("   {} {:>3} {}", "✓".green(), step + 1, name),
            EditOutcome::Unchanged(reason) => {
                eprintln!("   {} {:>3} {} ({:?})", "•".yellow(), step + 1, name, reason)
            }
            EditOutcome::Rejected(err) => {
                eprintln!("   {} {:>3} {}: {}", "✗".red(), step + 1, name, err);
                rejected += 1;
                if args.strict {
                    bail!("command {} ({}) was rejected: {}", step + 1, name, err);
                }
            }
        }
    }

    let json = render(store.document(), config)?;
    write_output(&json, args.output.as_ref())?;

    eprintln!();
    eprintln!(
        "✨ {} {} undo level(s), {} rejected",
        if rejected > 0 { "Done".yellow().bold() } else { "Done".green().bold() },
        store.history().undo_levels(),
        rejected
    );
    Ok(())
}

fn command_name(command: &Command) -> String {
    serde_json::to_value(command)
        .ok()
        .and_then(|value| value.get("command").and_then(|name| name.as_str()).map(str::to_string))
        .unwrap_or_else(|| "command".to_string())
}
