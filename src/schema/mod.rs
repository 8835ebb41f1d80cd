//! Schema loading and compilation
//!
//! This module turns a schema description into the two artifacts the packet
//! codec needs:
//! - [`tree`] defines the typed schema tree produced by document parsers
//! - [`compiler`] builds the flat [`FieldPlan`](crate::FieldPlan) and the
//!   nested [`ShapeTree`](crate::ShapeTree) from that tree
//! - [`document`] reads trees stored as YAML documents

pub mod compiler;
pub mod document;
pub mod tree;

pub use compiler::{CompiledSchema, FieldDecl, compile, parse_type_spec};
pub use document::{load_schema_file, parse_schema_document};
pub use tree::{FieldNode, SchemaNode};
