//! Schema compiler: typed schema tree to field plan and shape tree.
//!
//! Compilation runs two independent walks over the same tree:
//!
//! 1. A pre-order search collects every field declaration at any depth, in
//!    document order. Array declarations (`type[N]`) are expanded into `N`
//!    indexed entries. The result is the flat [`FieldPlan`], whose order alone
//!    defines byte offsets.
//! 2. A structural walk groups field identifiers under their enclosing struct
//!    identifiers. The result is the [`ShapeTree`] used to present values.

use crate::error::CompileError;
use crate::types::{FieldKey, FieldPlan, PlanEntry, PrimitiveType, ShapeTree};

use super::tree::{FieldNode, SchemaNode};

/// A validated field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub id: String,
    pub primitive: PrimitiveType,
    /// Element count for fixed-size array declarations
    pub array_len: Option<usize>,
}

impl FieldDecl {
    /// Validate the attributes of a field node.
    pub fn from_node(node: &FieldNode) -> Result<Self, CompileError> {
        let id = node
            .id
            .as_deref()
            .ok_or(CompileError::MissingAttribute { node: "field", attribute: "id" })?;
        let type_spec = node
            .type_spec
            .as_deref()
            .ok_or(CompileError::MissingAttribute { node: "field", attribute: "type" })?;

        let (base, array_len) =
            parse_type_spec(type_spec).ok_or_else(|| CompileError::InvalidArrayLength {
                id: id.to_string(),
                type_spec: type_spec.to_string(),
            })?;
        let primitive = PrimitiveType::from_type_name(base).ok_or_else(|| {
            CompileError::UnknownType { id: id.to_string(), type_name: base.to_string() }
        })?;

        Ok(Self { id: id.to_string(), primitive, array_len })
    }

    /// Plan entries for this declaration: one per array element, or one unindexed entry.
    pub fn expand(&self) -> Vec<PlanEntry> {
        match self.array_len {
            Some(len) => (0..len)
                .map(|index| PlanEntry::new(FieldKey::element(&self.id, index), self.primitive))
                .collect(),
            None => vec![PlanEntry::new(FieldKey::scalar(&self.id), self.primitive)],
        }
    }
}

/// Split `base[N]` into its base type and element count.
///
/// Returns `None` for a malformed suffix or a zero count. Specs without
/// brackets pass through with no count.
pub fn parse_type_spec(spec: &str) -> Option<(&str, Option<usize>)> {
    let spec = spec.trim();
    let Some(open) = spec.find('[') else {
        return Some((spec, None));
    };

    let base = spec[..open].trim();
    let count = spec[open + 1..].strip_suffix(']')?.trim();
    let len = count.parse::<usize>().ok().filter(|&len| len > 0)?;
    Some((base, Some(len)))
}

/// Compiled artifacts of one schema load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSchema {
    plan: FieldPlan,
    shape: ShapeTree,
    generation: u64,
}

impl CompiledSchema {
    pub fn plan(&self) -> &FieldPlan {
        &self.plan
    }

    pub fn shape(&self) -> &ShapeTree {
        &self.shape
    }

    /// Install counter assigned by the [`Unpacker`](crate::Unpacker); 0 until installed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

/// Compile a schema tree into its field plan and shape tree.
pub fn compile(tree: &SchemaNode) -> Result<CompiledSchema, CompileError> {
    let mut declarations = Vec::new();
    collect_fields(tree, &mut declarations);
    if declarations.is_empty() {
        return Err(CompileError::EmptySchema);
    }

    let mut entries = Vec::with_capacity(declarations.len());
    for node in declarations {
        entries.extend(FieldDecl::from_node(node)?.expand());
    }

    let mut shape = ShapeTree::new();
    build_shape(tree, &mut shape)?;

    Ok(CompiledSchema { plan: FieldPlan::new(entries), shape, generation: 0 })
}

/// Pre-order search for field declarations.
fn collect_fields<'a>(node: &'a SchemaNode, out: &mut Vec<&'a FieldNode>) {
    match node {
        SchemaNode::Field(field) => out.push(field),
        _ => {
            for child in node.children() {
                collect_fields(child, out);
            }
        }
    }
}

/// Insert the shape of `node` into `shape`, which represents its enclosing container.
fn build_shape(node: &SchemaNode, shape: &mut ShapeTree) -> Result<(), CompileError> {
    match node {
        SchemaNode::Field(field) => {
            let id = field
                .id
                .as_deref()
                .ok_or(CompileError::MissingAttribute { node: "field", attribute: "id" })?;
            shape.insert_leaf(id);
        }
        SchemaNode::Struct { id, children } => {
            let id = id
                .as_deref()
                .ok_or(CompileError::MissingAttribute { node: "struct", attribute: "id" })?;
            let mut nested = ShapeTree::new();
            for child in children {
                build_shape(child, &mut nested)?;
            }
            shape.insert_struct(id, nested);
        }
        SchemaNode::Root { children } | SchemaNode::Fields { children } => {
            for child in children {
                build_shape(child, shape)?;
            }
        }
    }
    Ok(())
}
