//! Core types for schema-driven packet decoding.
//!
//! ## Architecture
//!
//! - [`PrimitiveType`] is the fixed type table: name, byte width and decode operation
//! - [`Endianness`] selects the byte order of every multi-byte read
//! - [`FieldPlan`] is the flat, ordered list of decode instructions
//! - [`ShapeTree`] is the nested grouping used to present decoded values
//! - [`DecodedRecord`] is the per-packet result, shaped like the [`ShapeTree`]
//!
//! ## Usage Example
//!
//! ```rust
//! use pod_telemetry::types::{Endianness, PrimitiveType, Value};
//!
//! let speed = PrimitiveType::from_type_name("uint16_t").unwrap();
//! assert_eq!(speed.size(), 2);
//! assert_eq!(speed.read(&[0x00, 0x2A], Endianness::Big), Some(Value::UInt16(42)));
//! assert_eq!(speed.read(&[0x00, 0x2A], Endianness::Little), Some(Value::UInt16(0x2A00)));
//! ```

mod plan;
mod primitive;
mod record;
mod shape;

pub use plan::{FieldKey, FieldPlan, PlanEntry};
pub use primitive::{Endianness, PrimitiveType, Value};
pub use record::{DecodeOutcome, DecodedRecord, DropReason, RecordValue};
pub use shape::{ShapeNode, ShapeTree};

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn arb_primitive() -> impl Strategy<Value = PrimitiveType> {
        prop::sample::select(PrimitiveType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_bool_is_true_only_for_one(byte in any::<u8>()) {
            let value = PrimitiveType::Bool.read(&[byte], Endianness::Big).unwrap();
            prop_assert_eq!(value, Value::Bool(byte == 1));
        }

        #[test]
        fn prop_single_byte_types_ignore_endianness(byte in any::<u8>()) {
            for primitive in [PrimitiveType::UInt8, PrimitiveType::Int8, PrimitiveType::Bool] {
                prop_assert_eq!(
                    primitive.read(&[byte], Endianness::Big),
                    primitive.read(&[byte], Endianness::Little)
                );
            }
        }

        #[test]
        fn prop_reads_match_std_conversions(value in any::<u32>(), signed in any::<i64>()) {
            prop_assert_eq!(
                PrimitiveType::UInt32.read(&value.to_be_bytes(), Endianness::Big),
                Some(Value::UInt32(value))
            );
            prop_assert_eq!(
                PrimitiveType::UInt32.read(&value.to_le_bytes(), Endianness::Little),
                Some(Value::UInt32(value))
            );
            prop_assert_eq!(
                PrimitiveType::Int64.read(&signed.to_le_bytes(), Endianness::Little),
                Some(Value::Int64(signed))
            );
        }

        #[test]
        fn prop_short_input_never_panics(primitive in arb_primitive(), len in 0usize..8) {
            let bytes = vec![0xAAu8; len];
            let result = primitive.read(&bytes, Endianness::Little);
            prop_assert_eq!(result.is_some(), len >= primitive.size());
        }

        #[test]
        fn prop_unsigned_helpers_agree(value in any::<u64>(), width in 1usize..=8) {
            let masked = if width == 8 { value } else { value & ((1u64 << (width * 8)) - 1) };
            for endianness in [Endianness::Big, Endianness::Little] {
                let bytes = endianness.write_unsigned(value, width);
                prop_assert_eq!(bytes.len(), width);
                prop_assert_eq!(endianness.read_unsigned(&bytes), masked);
            }
        }

        #[test]
        fn prop_layout_offsets_accumulate(
            primitives in prop::collection::vec(arb_primitive(), 0..32),
            start in 0usize..64
        ) {
            let entries: Vec<PlanEntry> = primitives
                .iter()
                .enumerate()
                .map(|(i, p)| PlanEntry::new(FieldKey::scalar(format!("f{i}")), *p))
                .collect();
            let plan = FieldPlan::new(entries);

            let mut expected = start;
            for (offset, entry) in plan.layout(start) {
                prop_assert_eq!(offset, expected);
                expected += entry.width;
            }
            prop_assert_eq!(expected - start, plan.total_width());
        }
    }

    #[test]
    fn type_table_widths() {
        let table = [
            ("int", 4),
            ("float", 4),
            ("uint32_t", 4),
            ("int32_t", 4),
            ("double", 8),
            ("uint64_t", 8),
            ("int64_t", 8),
            ("uint16_t", 2),
            ("int16_t", 2),
            ("uint8_t", 1),
            ("int8_t", 1),
            ("bool", 1),
        ];
        for (name, width) in table {
            let primitive = PrimitiveType::from_type_name(name).unwrap();
            assert_eq!(primitive.size(), width, "{name}");
        }
        assert_eq!(PrimitiveType::from_type_name("char"), None);
        assert_eq!(PrimitiveType::from_type_name("uint16_t[2]"), None);
    }

    #[test]
    fn type_names_round_trip_through_table() {
        for primitive in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_type_name(primitive.type_name()), Some(primitive));
        }
    }

    #[test]
    fn floats_decode_in_both_orders() {
        let be = 1.5f32.to_be_bytes();
        assert_eq!(PrimitiveType::Float32.read(&be, Endianness::Big), Some(Value::Float32(1.5)));
        let le = (-2.25f64).to_le_bytes();
        assert_eq!(
            PrimitiveType::Float64.read(&le, Endianness::Little),
            Some(Value::Float64(-2.25))
        );
    }

    #[test]
    fn field_key_display() {
        assert_eq!(FieldKey::scalar("speed").to_string(), "speed");
        assert_eq!(FieldKey::element("armed", 1).to_string(), "armed[1]");
    }

    #[test]
    fn write_unsigned_clamps_wide_requests() {
        assert_eq!(Endianness::Big.write_unsigned(0x0102, 12), 0x0102u64.to_be_bytes().to_vec());
        assert_eq!(Endianness::Little.write_unsigned(0x0102, 9), 0x0102u64.to_le_bytes().to_vec());
        assert!(Endianness::Big.write_unsigned(7, 0).is_empty());
    }

    #[test]
    fn layout_offsets_saturate_near_usize_max() {
        let plan = FieldPlan::new(vec![
            PlanEntry::new(FieldKey::scalar("a"), PrimitiveType::UInt64),
            PlanEntry::new(FieldKey::scalar("b"), PrimitiveType::UInt64),
        ]);
        let offsets: Vec<usize> = plan.layout(usize::MAX - 4).map(|(offset, _)| offset).collect();
        assert_eq!(offsets, [usize::MAX - 4, usize::MAX]);
    }

    #[test]
    fn shape_tree_counts_and_paths() {
        let mut inner = ShapeTree::new();
        inner.insert_leaf("speed");
        inner.insert_leaf("armed");
        let mut root = ShapeTree::new();
        root.insert_struct("telemetry", inner);
        root.insert_leaf("status");

        assert_eq!(root.len(), 2);
        assert_eq!(root.leaf_count(), 3);
        assert_eq!(
            root.leaf_paths(),
            vec![
                vec!["status".to_string()],
                vec!["telemetry".to_string(), "armed".to_string()],
                vec!["telemetry".to_string(), "speed".to_string()],
            ]
        );
    }

    #[test]
    fn record_insert_path_creates_structs() {
        let mut record = DecodedRecord::new();
        record.insert_path(&["pressures", "brakePrimary"], Value::Float32(3.5));
        record.insert_path(&["packetNumber"], Value::UInt32(7));

        assert_eq!(record.value_at(&["pressures", "brakePrimary"]), Some(&Value::Float32(3.5)));
        assert_eq!(record.value_at(&["packetNumber"]), Some(&Value::UInt32(7)));
        assert!(record.get("pressures").unwrap().as_struct().is_some());
    }

    #[test]
    fn record_insert_path_replaces_scalar_parent() {
        let mut record = DecodedRecord::new();
        record.insert_path(&["imd"], Value::UInt8(1));
        record.insert_path(&["imd", "status"], Value::UInt8(2));

        assert_eq!(record.value_at(&["imd", "status"]), Some(&Value::UInt8(2)));
    }

    #[test]
    fn record_serializes_as_plain_mapping() {
        let mut record = DecodedRecord::new();
        record.insert_path(
            &["telemetry", "armed"],
            Value::Array(vec![Value::Bool(true), Value::Bool(false)]),
        );
        record.insert_path(&["telemetry", "speed"], Value::UInt16(42));

        let yaml = serde_yaml_ng::to_string(&record).unwrap();
        let reparsed: serde_yaml_ng::Value = serde_yaml_ng::from_str(&yaml).unwrap();
        let expected: serde_yaml_ng::Value =
            serde_yaml_ng::from_str("telemetry:\n  armed: [true, false]\n  speed: 42\n").unwrap();
        assert_eq!(reparsed, expected);
    }

    #[test]
    fn outcome_accessors() {
        let dropped = DecodeOutcome::Dropped(DropReason::BadHeader);
        assert!(dropped.is_dropped());
        assert_eq!(dropped.drop_reason(), Some(DropReason::BadHeader));
        assert!(dropped.record().is_none());

        let decoded = DecodeOutcome::Decoded(DecodedRecord::new());
        assert!(!decoded.is_dropped());
        assert!(decoded.into_record().is_some());
    }
}
