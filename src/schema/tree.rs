//! Typed schema tree handed over by the document parser

use serde::{Deserialize, Serialize};

/// Attributes of a `field` declaration as they appear in the source document.
///
/// Both attributes are optional here; the compiler rejects missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    #[serde(default)]
    pub id: Option<String>,
    /// Primitive type name, optionally suffixed with `[N]`
    #[serde(default, rename = "type")]
    pub type_spec: Option<String>,
}

impl FieldNode {
    pub fn new(id: impl Into<String>, type_spec: impl Into<String>) -> Self {
        Self { id: Some(id.into()), type_spec: Some(type_spec.into()) }
    }
}

/// A node of the schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaNode {
    /// Document root
    Root {
        #[serde(default)]
        children: Vec<SchemaNode>,
    },
    /// A named struct; nests its children under `id`
    Struct {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        children: Vec<SchemaNode>,
    },
    /// Transparent grouping of field declarations
    Fields {
        #[serde(default)]
        children: Vec<SchemaNode>,
    },
    /// A single field declaration
    Field(FieldNode),
}

impl SchemaNode {
    pub fn root(children: Vec<SchemaNode>) -> Self {
        SchemaNode::Root { children }
    }

    pub fn structure(id: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        SchemaNode::Struct { id: Some(id.into()), children }
    }

    pub fn fields(children: Vec<SchemaNode>) -> Self {
        SchemaNode::Fields { children }
    }

    pub fn field(id: impl Into<String>, type_spec: impl Into<String>) -> Self {
        SchemaNode::Field(FieldNode::new(id, type_spec))
    }

    /// Child nodes; fields have none.
    pub fn children(&self) -> &[SchemaNode] {
        match self {
            SchemaNode::Root { children }
            | SchemaNode::Struct { children, .. }
            | SchemaNode::Fields { children } => children,
            SchemaNode::Field(_) => &[],
        }
    }

    /// Node kind as written in documents.
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Root { .. } => "root",
            SchemaNode::Struct { .. } => "struct",
            SchemaNode::Fields { .. } => "fields",
            SchemaNode::Field(_) => "field",
        }
    }
}
