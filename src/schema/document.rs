//! Schema documents stored as YAML.
//!
//! The document is the serialized form of [`SchemaNode`]: every node carries a
//! `kind` of `root`, `struct`, `fields` or `field`.
//!
//! ```yaml
//! kind: root
//! children:
//!   - kind: struct
//!     id: telemetry
//!     children:
//!       - { kind: field, id: speed, type: uint16_t }
//!       - { kind: field, id: armed, type: "bool[2]" }
//! ```

use std::path::Path;

use tracing::debug;

use super::tree::SchemaNode;
use crate::{Result, TelemetryError};

/// Parse a YAML schema document into a schema tree.
pub fn parse_schema_document(yaml: &str) -> Result<SchemaNode> {
    if yaml.trim().is_empty() {
        return Err(TelemetryError::parse("schema document", "document is empty"));
    }

    serde_yaml_ng::from_str(yaml)
        .map_err(|e| TelemetryError::parse("schema document", e.to_string()))
}

/// Read and parse a schema document from disk.
pub async fn load_schema_file<P: AsRef<Path>>(path: P) -> Result<SchemaNode> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| TelemetryError::schema_load(path.display().to_string(), e))?;

    debug!(path = %path.display(), bytes = contents.len(), "Read schema document");
    parse_schema_document(&contents)
}
