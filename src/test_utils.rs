//! Test utilities: packet framing and schema fixtures
//!
//! Shared by unit tests and benchmarks (`--features benchmark`).

#![cfg(any(test, feature = "benchmark"))]

use crate::codec::seal_packet;
use crate::schema::SchemaNode;
use crate::types::Endianness;

/// YAML form of [`telemetry_schema`].
pub const TELEMETRY_SCHEMA_YAML: &str = r#"
kind: root
children:
  - kind: struct
    id: telemetry
    children:
      - { kind: field, id: speed, type: uint16_t }
      - { kind: field, id: armed, type: "bool[2]" }
"#;

/// Struct `telemetry` holding `uint16_t speed` and `bool armed[2]`.
pub fn telemetry_schema() -> SchemaNode {
    SchemaNode::root(vec![SchemaNode::structure(
        "telemetry",
        vec![SchemaNode::field("speed", "uint16_t"), SchemaNode::field("armed", "bool[2]")],
    )])
}

/// A pod-style schema with nested structs, arrays and every primitive width.
pub fn pod_schema() -> SchemaNode {
    SchemaNode::root(vec![SchemaNode::structure(
        "pod",
        vec![
            SchemaNode::field("state", "uint8_t"),
            SchemaNode::structure(
                "motor",
                vec![
                    SchemaNode::field("rpm", "int32_t"),
                    SchemaNode::field("current", "float"),
                    SchemaNode::field("temps", "int16_t[4]"),
                ],
            ),
            SchemaNode::structure(
                "battery",
                vec![SchemaNode::fields(vec![
                    SchemaNode::field("voltage", "double"),
                    SchemaNode::field("cells", "uint16_t[8]"),
                    SchemaNode::field("charge", "uint64_t"),
                ])],
            ),
            SchemaNode::field("faults", "bool[6]"),
            SchemaNode::field("uptime", "uint32_t"),
        ],
    )])
}

/// Builds framed packets: header, metadata, payload and trailing CRC-32.
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    endianness: Endianness,
    metadata: Vec<u8>,
    payload: Vec<u8>,
}

impl PacketBuilder {
    pub fn new(endianness: Endianness) -> Self {
        Self { endianness, metadata: Vec::new(), payload: Vec::new() }
    }

    /// Bytes between the header and the schema data.
    pub fn metadata(mut self, bytes: &[u8]) -> Self {
        self.metadata = bytes.to_vec();
        self
    }

    /// Schema-declared field bytes.
    pub fn payload(mut self, bytes: &[u8]) -> Self {
        self.payload = bytes.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = self.metadata.clone();
        body.extend_from_slice(&self.payload);
        seal_packet(&body, self.endianness)
    }
}
