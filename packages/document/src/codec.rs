//! # Import / Export
//!
//! JSON payloads look like the exported document:
//!
//! ```json
//! { "header": { "title": "Survey" }, "spacing": 8,
//!   "elements": [ { "type": "form", "id": "f1", "elements": [ { "type": "input" } ] } ] }
//! ```
//!
//! A bare array is accepted as the element list. Before a payload becomes a
//! `Document`, every node is given a usable id: missing, empty or duplicated
//! ids are replaced with generated ones, numeric ids are kept as strings.
//! Missing kind fields take their defaults. The nesting and id invariants are
//! asserted last; a payload that breaks them is rejected.

use crate::document::Document;
use crate::error::ImportError;
use crate::id_generator::IdGenerator;
use crate::node::NodeKind;
use crate::path::Path;
use crate::validate::check_invariants;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct Imported {
    pub document: Document,
    /// Paths of nodes whose id was generated during import
    pub generated_ids: Vec<Path>,
}

/// Import a JSON document payload
pub fn import_str(input: &str, ids: &mut IdGenerator) -> Result<Imported, ImportError> {
    let value: Value = serde_json::from_str(input)?;
    import_value(value, ids)
}

/// Import an already-parsed JSON payload
pub fn import_value(value: Value, ids: &mut IdGenerator) -> Result<Imported, ImportError> {
    let mut payload = match value {
        Value::Object(map) => map,
        Value::Array(elements) => {
            let mut map = Map::new();
            map.insert("elements".to_string(), Value::Array(elements));
            map
        }
        other => {
            return Err(ImportError::Malformed(format!(
                "expected an object or an array of elements, found {}",
                json_type(&other)
            )))
        }
    };

    let elements = payload
        .entry("elements")
        .or_insert_with(|| Value::Array(Vec::new()));
    let elements = elements
        .as_array_mut()
        .ok_or_else(|| ImportError::Malformed("'elements' must be an array".to_string()))?;

    // First pass: every usable id is reserved so generated ids never collide
    // with ids that appear later in the payload.
    let mut taken = HashSet::new();
    walk_payload(elements, &Path::root(), &mut |node, _| {
        if let Some(id) = usable_id(node) {
            taken.insert(id);
        }
        Ok(())
    })?;

    // Second pass: the first occurrence of an id keeps it, everything else
    // gets a fresh one.
    let mut claimed = HashSet::new();
    let mut generated_ids = Vec::new();
    walk_payload(elements, &Path::root(), &mut |node, path| {
        let id = match usable_id(node) {
            Some(id) if claimed.insert(id.clone()) => id,
            _ => {
                let id = ids.fresh_id(&taken);
                taken.insert(id.clone());
                claimed.insert(id.clone());
                generated_ids.push(path.clone());
                id
            }
        };
        node.insert("id".to_string(), Value::String(id));
        Ok(())
    })?;

    let document: Document = serde_json::from_value(Value::Object(payload))?;
    check_invariants(&document)?;

    debug!(
        nodes = document.node_count(),
        generated = generated_ids.len(),
        "Imported document"
    );

    Ok(Imported {
        document,
        generated_ids,
    })
}

/// Serialize `doc` to the payload shape, internal-only fields stripped
pub fn export_value(doc: &Document) -> Result<Value, serde_json::Error> {
    serde_json::to_value(doc)
}

/// Serialize `doc` as pretty-printed JSON
pub fn export_string(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

type NodeFn<'a> = dyn FnMut(&mut Map<String, Value>, &Path) -> Result<(), ImportError> + 'a;

fn walk_payload(
    elements: &mut [Value],
    path: &Path,
    f: &mut NodeFn<'_>,
) -> Result<(), ImportError> {
    for (index, item) in elements.iter_mut().enumerate() {
        let node_path = path.clone().index(index);
        let node = item.as_object_mut().ok_or_else(|| {
            ImportError::Malformed(format!("node at {} is not an object", node_path))
        })?;

        let kind = match node.get("type") {
            Some(Value::String(kind)) => kind
                .parse::<NodeKind>()
                .map_err(|_| ImportError::UnknownKind {
                    path: node_path.clone(),
                    kind: kind.clone(),
                })?,
            Some(other) => {
                return Err(ImportError::UnknownKind {
                    path: node_path,
                    kind: other.to_string(),
                })
            }
            None => {
                return Err(ImportError::MissingField {
                    path: node_path,
                    field: "type",
                })
            }
        };

        f(node, &node_path)?;

        match kind {
            NodeKind::Form => {
                if let Some(children) = node.get_mut("elements") {
                    let children = children
                        .as_array_mut()
                        .ok_or_else(|| malformed_list("elements", &node_path))?;
                    walk_payload(children, &node_path.clone().elements(), f)?;
                }
            }
            NodeKind::ColumnSet => {
                if let Some(columns) = node.get_mut("columns") {
                    let columns = columns
                        .as_array_mut()
                        .ok_or_else(|| malformed_list("columns", &node_path))?;
                    for (column_index, column) in columns.iter_mut().enumerate() {
                        let column_path = node_path.clone().columns().index(column_index);
                        let column = column.as_object_mut().ok_or_else(|| {
                            ImportError::Malformed(format!(
                                "column at {} is not an object",
                                column_path
                            ))
                        })?;
                        if let Some(children) = column.get_mut("elements") {
                            let children = children
                                .as_array_mut()
                                .ok_or_else(|| malformed_list("elements", &column_path))?;
                            walk_payload(children, &column_path.elements(), f)?;
                        }
                    }
                }
            }
            NodeKind::Text
            | NodeKind::Input
            | NodeKind::Button
            | NodeKind::Image
            | NodeKind::ImageCombination
            | NodeKind::Select
            | NodeKind::MultiSelect
            | NodeKind::Divider
            | NodeKind::RichText
            | NodeKind::Title => {}
        }
    }
    Ok(())
}

fn malformed_list(field: &str, path: &Path) -> ImportError {
    ImportError::Malformed(format!("'{}' of {} must be an array", field, path))
}

fn usable_id(node: &Map<String, Value>) -> Option<String> {
    match node.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
