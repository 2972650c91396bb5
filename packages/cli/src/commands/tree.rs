use super::read_document;
use crate::config::Config;
use anyhow::Result;
use cardkit_document::visitor::{walk_column, walk_node, Visitor};
use cardkit_document::{Column, ColumnWidth, Document, Node, Path};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Document JSON file
    pub input: PathBuf,

    /// Show node ids
    #[arg(long)]
    pub ids: bool,
}

pub fn tree(args: TreeArgs, config: &Config) -> Result<()> {
    let imported = read_document(&args.input, config)?;
    for line in render_tree(&imported.document, args.ids) {
        println!("{}", line);
    }
    Ok(())
}

struct TreePrinter {
    lines: Vec<String>,
    depth: usize,
    show_ids: bool,
}

impl Visitor for TreePrinter {
    fn visit_node(&mut self, node: &Arc<Node>, path: &Path) {
        let indent = "  ".repeat(self.depth);
        let mut line = format!("{}{}  {}", indent, node.label(), path.to_string().dimmed());
        if self.show_ids {
            line.push_str(&format!("  #{}", node.id()));
        }
        self.lines.push(line);

        self.depth += 1;
        walk_node(self, node, path);
        self.depth -= 1;
    }

    fn visit_column(&mut self, column: &Column, path: &Path) {
        let width = match column.width {
            ColumnWidth::Weighted => format!("weight {}", column.weight),
            ColumnWidth::Auto => "auto".to_string(),
        };
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{}column ({})  {}", indent, width, path.to_string().dimmed()));

        self.depth += 1;
        walk_column(self, column, path);
        self.depth -= 1;
    }
}

fn render_tree(doc: &Document, show_ids: bool) -> Vec<String> {
    let mut printer = TreePrinter {
        lines: Vec::new(),
        depth: 0,
        show_ids,
    };
    printer.visit_document(doc);
    printer.lines
}
