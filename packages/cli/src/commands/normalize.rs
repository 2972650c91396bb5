use super::{read_document, render, write_output};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Document JSON file
    pub input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn normalize(args: NormalizeArgs, config: &Config) -> Result<()> {
    let imported = read_document(&args.input, config)?;
    let json = render(&imported.document, config)?;
    write_output(&json, args.output.as_ref())?;

    eprintln!(
        "{} {} ({} id(s) generated)",
        "✓".green(),
        args.input.display(),
        imported.generated_ids.len()
    );
    Ok(())
}
