use super::read_document;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document JSON file
    pub input: PathBuf,
}

pub fn check(args: CheckArgs, config: &Config) -> Result<()> {
    let imported = read_document(&args.input, config)?;
    let doc = &imported.document;

    let containers = doc.elements.iter().filter(|node| node.is_container()).count();

    println!("{} {}", "✓".green(), args.input.display());
    println!("   Nodes:      {}", doc.node_count());
    println!("   Top level:  {} ({} containers)", doc.elements.len(), containers);

    if imported.generated_ids.is_empty() {
        println!("   Ids:        all present");
    } else {
        println!(
            "   {} {} node(s) were missing a usable id:",
            "Ids:".yellow(),
            imported.generated_ids.len()
        );
        for path in &imported.generated_ids {
            println!("     {}", path);
        }
        println!("   Run {} to write them back", "cardkit normalize".bold());
    }

    Ok(())
}
