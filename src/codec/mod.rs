//! Packet validation and schema-driven decoding.
//!
//! A packet is laid out as:
//!
//! ```text
//! +-----------+---------------------+----------------------+-----------+
//! | magic (3) | metadata (profile)  | schema fields (plan) | CRC32 (4) |
//! +-----------+---------------------+----------------------+-----------+
//! 0           3                     data_start                  len - 4
//! ```
//!
//! Decoding validates the header and checksum, reads each plan entry in
//! order, folds array elements back into sequences, places every value
//! into the schema's shape and finally merges the profile's metadata.
//! Packets that fail validation are dropped, never reported as errors.

mod profile;

pub use profile::{OverlayField, WireProfile};

use std::collections::HashMap;

use crate::config::CodecConfig;
use crate::schema::CompiledSchema;
use crate::types::{
    DecodeOutcome, DecodedRecord, DropReason, Endianness, FieldKey, FieldPlan, PrimitiveType,
    RecordValue, ShapeNode, ShapeTree, Value,
};

/// Magic value carried in the first three bytes of every packet.
pub const HEADER_MAGIC: u32 = 0xBA_D6_E4;
/// Width of the magic header in bytes.
pub const HEADER_WIDTH: usize = 3;
/// Width of the trailing CRC-32 in bytes.
pub const CHECKSUM_WIDTH: usize = 4;

/// Check the 3-byte magic header.
pub fn verify_header(packet: &[u8], endianness: Endianness) -> bool {
    packet
        .get(..HEADER_WIDTH)
        .is_some_and(|header| endianness.read_unsigned(header) == u64::from(HEADER_MAGIC))
}

/// Check the trailing CRC-32 against every byte that precedes it.
pub fn verify_checksum(packet: &[u8], endianness: Endianness) -> bool {
    let Some(split) = packet.len().checked_sub(CHECKSUM_WIDTH) else {
        return false;
    };
    let (body, trailer) = packet.split_at(split);
    match PrimitiveType::Int32.read(trailer, endianness) {
        Some(Value::Int32(expected)) => crc32fast::hash(body) as i32 == expected,
        _ => false,
    }
}

/// Frame `body` (everything between header and checksum) as a complete packet.
pub fn seal_packet(body: &[u8], endianness: Endianness) -> Vec<u8> {
    let mut packet = Vec::with_capacity(HEADER_WIDTH + body.len() + CHECKSUM_WIDTH);
    packet.extend(endianness.write_unsigned(u64::from(HEADER_MAGIC), HEADER_WIDTH));
    packet.extend_from_slice(body);
    let crc = crc32fast::hash(&packet);
    packet.extend(endianness.write_unsigned(u64::from(crc), CHECKSUM_WIDTH));
    packet
}

/// Decode one packet against a compiled schema.
pub fn decode(packet: &[u8], schema: &CompiledSchema, config: &CodecConfig) -> DecodeOutcome {
    let endianness = config.endianness;

    if !verify_header(packet, endianness) {
        return DecodeOutcome::Dropped(DropReason::BadHeader);
    }
    if !verify_checksum(packet, endianness) {
        return DecodeOutcome::Dropped(DropReason::ChecksumMismatch);
    }

    let required = config.profile.required_len(schema.plan().total_width());
    let truncated = DropReason::Truncated { required, actual: packet.len() };
    if packet.len() < required {
        return DecodeOutcome::Dropped(truncated);
    }

    let Some(flat) = decode_fields(packet, schema.plan(), config.profile.data_start, endianness)
    else {
        return DecodeOutcome::Dropped(truncated);
    };
    let values = reassemble_arrays(flat);

    let mut record = map_to_shape(schema.shape(), &values);
    apply_overlay(&mut record, packet, &config.profile.overlay, endianness);

    DecodeOutcome::Decoded(record)
}

/// Read every plan entry in order starting at `start`.
fn decode_fields<'p>(
    packet: &[u8],
    plan: &'p FieldPlan,
    start: usize,
    endianness: Endianness,
) -> Option<HashMap<&'p FieldKey, Value>> {
    let mut flat = HashMap::with_capacity(plan.len());
    for (offset, entry) in plan.layout(start) {
        let value = entry.primitive.read(packet.get(offset..)?, endianness)?;
        flat.insert(&entry.key, value);
    }
    Some(flat)
}

/// Collapse indexed entries into one ordered sequence per identifier.
///
/// Grouping is by identifier, so elements need not have been adjacent in the plan.
fn reassemble_arrays<'p>(flat: HashMap<&'p FieldKey, Value>) -> HashMap<&'p str, Value> {
    let mut values = HashMap::with_capacity(flat.len());
    let mut arrays: HashMap<&str, Vec<(usize, Value)>> = HashMap::new();

    for (key, value) in flat {
        match key.index {
            Some(index) => arrays.entry(key.id.as_str()).or_default().push((index, value)),
            None => {
                values.insert(key.id.as_str(), value);
            }
        }
    }

    for (id, mut elements) in arrays {
        elements.sort_unstable_by_key(|(index, _)| *index);
        values.insert(id, Value::Array(elements.into_iter().map(|(_, value)| value).collect()));
    }

    values
}

/// Replace every shape leaf with the value decoded under the same identifier.
fn map_to_shape(shape: &ShapeTree, values: &HashMap<&str, Value>) -> DecodedRecord {
    let mut record = DecodedRecord::new();
    for (key, node) in shape.iter() {
        match node {
            ShapeNode::Leaf => {
                if let Some(value) = values.get(key) {
                    record.insert(key, RecordValue::Value(value.clone()));
                }
            }
            ShapeNode::Struct(nested) => {
                record.insert(key, RecordValue::Struct(map_to_shape(nested, values)));
            }
        }
    }
    record
}

fn apply_overlay(
    record: &mut DecodedRecord,
    packet: &[u8],
    overlay: &[OverlayField],
    endianness: Endianness,
) {
    for field in overlay {
        let value =
            packet.get(field.offset..).and_then(|bytes| field.primitive.read(bytes, endianness));
        if let Some(value) = value {
            record.insert_path(field.path.as_slice(), value);
        }
    }
}
