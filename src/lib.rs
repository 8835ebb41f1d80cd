//! Schema-driven decoder for fixed-layout binary telemetry packets.
//!
//! Packet layouts are not hard-coded: a schema describing a C-style struct
//! (fields, primitive types, fixed-size arrays and nested structs) is compiled
//! at load time into a flat decode plan and a nested shape. Every packet is
//! then validated (magic header, CRC-32) and decoded into a record that
//! mirrors the schema's nesting.
//!
//! # Features
//!
//! - **Schema compilation**: one pass for byte layout, one for presentation shape
//! - **Validation**: header and checksum failures are drops, not errors
//! - **Wire profiles**: fixed metadata (packet counter, time, ...) outside the schema
//! - **Hot reload**: schemas are swapped atomically behind a shared [`Unpacker`]
//! - **Pipelines**: [`TelemetryConnection`] decodes packets from any [`PacketSource`]
//!
//! # Quick Start
//!
//! ```rust
//! use pod_telemetry::{CodecConfig, Endianness, Unpacker, Value, codec};
//!
//! # fn main() -> pod_telemetry::Result<()> {
//! let unpacker = Unpacker::new(CodecConfig::default())?;
//! unpacker.load_yaml(r#"
//! kind: root
//! children:
//!   - kind: struct
//!     id: telemetry
//!     children:
//!       - { kind: field, id: speed, type: uint16_t }
//!       - { kind: field, id: armed, type: "bool[2]" }
//! "#)?;
//!
//! // packet counter, then speed = 42, armed = [true, false]
//! let packet = codec::seal_packet(&[0, 0, 0, 1, 0x00, 0x2A, 0x01, 0x00], Endianness::Big);
//!
//! let outcome = unpacker.decode(&packet)?;
//! let record = outcome.record().expect("valid packet");
//! assert_eq!(record.value_at(&["telemetry", "speed"]), Some(&Value::UInt16(42)));
//! # Ok(())
//! # }
//! ```

// Core types and error handling
pub mod codec;
pub mod config;
mod error;
pub mod schema;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
mod unpacker;

// Packet pipeline
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;

// Core exports
pub use config::CodecConfig;
pub use error::*;
pub use types::*;
pub use unpacker::Unpacker;

// Schema exports
pub use schema::{CompiledSchema, SchemaNode, compile};

// Codec exports
pub use codec::{OverlayField, WireProfile, decode};

// Pipeline exports
pub use connection::TelemetryConnection;
pub use driver::{DecodeStats, Driver};
pub use provider::PacketSource;
pub use providers::ReplaySource;
