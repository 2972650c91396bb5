use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Node kinds known to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Form,
    ColumnSet,
    Text,
    Input,
    Button,
    Image,
    ImageCombination,
    Select,
    MultiSelect,
    Divider,
    RichText,
    Title,
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Form,
        NodeKind::ColumnSet,
        NodeKind::Text,
        NodeKind::Input,
        NodeKind::Button,
        NodeKind::Image,
        NodeKind::ImageCombination,
        NodeKind::Select,
        NodeKind::MultiSelect,
        NodeKind::Divider,
        NodeKind::RichText,
        NodeKind::Title,
    ];

    /// Container kinds own child collections and may only live at the root
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Form | NodeKind::ColumnSet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Form => "form",
            NodeKind::ColumnSet => "column_set",
            NodeKind::Text => "text",
            NodeKind::Input => "input",
            NodeKind::Button => "button",
            NodeKind::Image => "image",
            NodeKind::ImageCombination => "image_combination",
            NodeKind::Select => "select",
            NodeKind::MultiSelect => "multi_select",
            NodeKind::Divider => "divider",
            NodeKind::RichText => "rich_text",
            NodeKind::Title => "title",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown node kind: {}", s))
    }
}

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Form(Form),
    ColumnSet(ColumnSet),
    Text(Text),
    Input(Input),
    Button(Button),
    Image(Image),
    ImageCombination(ImageCombination),
    Select(Select),
    MultiSelect(MultiSelect),
    Divider(Divider),
    RichText(RichText),
    Title(Title),
}

/// Form container; owns a flat list of leaf elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Form {
    pub id: String,
    pub name: String,
    pub elements: Vec<Arc<Node>>,
    /// Canvas folding state, never exported
    #[serde(skip_serializing)]
    pub collapsed: bool,
}

/// Horizontal column layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSet {
    pub id: String,
    pub flex_mode: FlexMode,
    pub horizontal_spacing: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_style: Option<String>,
    pub columns: Vec<Column>,
    #[serde(skip_serializing)]
    pub collapsed: bool,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self {
            id: String::new(),
            flex_mode: FlexMode::default(),
            horizontal_spacing: 8,
            background_style: None,
            columns: vec![Column::default(), Column::default()],
            collapsed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexMode {
    #[default]
    None,
    Stretch,
    Flow,
    Bisect,
    Trisect,
}

/// One column of a column set. Columns are slots, not nodes: they carry no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub width: ColumnWidth,
    pub weight: u32,
    pub vertical_align: VerticalAlign,
    pub elements: Vec<Arc<Node>>,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            width: ColumnWidth::Weighted,
            weight: 1,
            vertical_align: VerticalAlign::Top,
            elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnWidth {
    Auto,
    #[default]
    Weighted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    pub id: String,
    pub name: String,
    pub label: String,
    pub placeholder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Button {
    pub id: String,
    pub text: String,
    pub action: ButtonAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    #[default]
    Callback,
    Link,
    FormSubmit,
    FormReset,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: String,
    pub img_key: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<String>,
    pub preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCombination {
    pub id: String,
    pub img_keys: Vec<String>,
    pub combination_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Select {
    pub id: String,
    pub name: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_option: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSelect {
    pub id: String,
    pub name: String,
    pub placeholder: String,
    pub options: Vec<SelectOption>,
    pub required: bool,
    pub initial_options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Divider {
    pub id: String,
}

/// Rich text body is owned by the external rich-text editor and kept opaque
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichText {
    pub id: String,
    pub content: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Title {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub level: u8,
}

impl Node {
    /// Create a node of `kind` with default fields, as dropped from the palette
    pub fn new(kind: NodeKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            NodeKind::Form => Node::Form(Form { id, ..Default::default() }),
            NodeKind::ColumnSet => Node::ColumnSet(ColumnSet { id, ..Default::default() }),
            NodeKind::Text => Node::Text(Text { id, ..Default::default() }),
            NodeKind::Input => Node::Input(Input { id, ..Default::default() }),
            NodeKind::Button => Node::Button(Button { id, ..Default::default() }),
            NodeKind::Image => Node::Image(Image { id, ..Default::default() }),
            NodeKind::ImageCombination => {
                Node::ImageCombination(ImageCombination { id, ..Default::default() })
            }
            NodeKind::Select => Node::Select(Select { id, ..Default::default() }),
            NodeKind::MultiSelect => Node::MultiSelect(MultiSelect { id, ..Default::default() }),
            NodeKind::Divider => Node::Divider(Divider { id }),
            NodeKind::RichText => Node::RichText(RichText { id, ..Default::default() }),
            NodeKind::Title => Node::Title(Title { id, level: 1, ..Default::default() }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Form(_) => NodeKind::Form,
            Node::ColumnSet(_) => NodeKind::ColumnSet,
            Node::Text(_) => NodeKind::Text,
            Node::Input(_) => NodeKind::Input,
            Node::Button(_) => NodeKind::Button,
            Node::Image(_) => NodeKind::Image,
            Node::ImageCombination(_) => NodeKind::ImageCombination,
            Node::Select(_) => NodeKind::Select,
            Node::MultiSelect(_) => NodeKind::MultiSelect,
            Node::Divider(_) => NodeKind::Divider,
            Node::RichText(_) => NodeKind::RichText,
            Node::Title(_) => NodeKind::Title,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Form(n) => &n.id,
            Node::ColumnSet(n) => &n.id,
            Node::Text(n) => &n.id,
            Node::Input(n) => &n.id,
            Node::Button(n) => &n.id,
            Node::Image(n) => &n.id,
            Node::ImageCombination(n) => &n.id,
            Node::Select(n) => &n.id,
            Node::MultiSelect(n) => &n.id,
            Node::Divider(n) => &n.id,
            Node::RichText(n) => &n.id,
            Node::Title(n) => &n.id,
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let slot = match self {
            Node::Form(n) => &mut n.id,
            Node::ColumnSet(n) => &mut n.id,
            Node::Text(n) => &mut n.id,
            Node::Input(n) => &mut n.id,
            Node::Button(n) => &mut n.id,
            Node::Image(n) => &mut n.id,
            Node::ImageCombination(n) => &mut n.id,
            Node::Select(n) => &mut n.id,
            Node::MultiSelect(n) => &mut n.id,
            Node::Divider(n) => &mut n.id,
            Node::RichText(n) => &mut n.id,
            Node::Title(n) => &mut n.id,
        };
        *slot = id.into();
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Direct children in document order (a column set yields its columns' elements)
    pub fn children(&self) -> Box<dyn Iterator<Item = &Arc<Node>> + '_> {
        match self {
            Node::Form(form) => Box::new(form.elements.iter()),
            Node::ColumnSet(set) => Box::new(set.columns.iter().flat_map(|c| c.elements.iter())),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children().map(|child| child.subtree_len()).sum::<usize>()
    }

    /// Short human label for trees and logs
    pub fn label(&self) -> String {
        let text = match self {
            Node::Form(n) => n.name.as_str(),
            Node::Text(n) => n.content.as_str(),
            Node::Input(n) => n.label.as_str(),
            Node::Button(n) => n.text.as_str(),
            Node::Image(n) => n.alt.as_str(),
            Node::Select(n) => n.name.as_str(),
            Node::MultiSelect(n) => n.name.as_str(),
            Node::Title(n) => n.title.as_str(),
            _ => "",
        };
        if text.is_empty() {
            self.kind().to_string()
        } else {
            format!("{} \"{}\"", self.kind(), text)
        }
    }
}
