pub mod apply;
pub mod check;
pub mod normalize;
pub mod tree;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use normalize::{normalize, NormalizeArgs};
pub use tree::{tree, TreeArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use cardkit_document::{export_string, export_value, import_str, Document, IdGenerator, Imported};
use std::fs;
use std::path::{Path, PathBuf};

/// Read and import a document file
pub(crate) fn read_document(path: &Path, config: &Config) -> Result<Imported> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut ids = IdGenerator::new(&config.editor.id_seed);
    let imported =
        import_str(&source, &mut ids).with_context(|| format!("importing {}", path.display()))?;
    Ok(imported)
}

pub(crate) fn render(doc: &Document, config: &Config) -> Result<String> {
    let json = if config.pretty {
        export_string(doc)?
    } else {
        serde_json::to_string(&export_value(doc)?)?
    };
    Ok(json)
}

/// Write to `output`, or stdout when not given
pub(crate) fn write_output(json: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{}\n", json))
            .with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
