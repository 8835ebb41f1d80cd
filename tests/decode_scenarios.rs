//! End-to-end decoding through the public API with YAML schema documents.

use std::sync::Arc;

use futures::StreamExt;
use pod_telemetry::codec::{HEADER_MAGIC, seal_packet};
use pod_telemetry::{
    CodecConfig, DecodeOutcome, DropReason, Endianness, ReplaySource, TelemetryConnection,
    TelemetryError, Unpacker, Value, WireProfile,
};

const TELEMETRY_SCHEMA: &str = r#"
kind: root
children:
  - kind: struct
    id: telemetry
    children:
      - { kind: field, id: speed, type: uint16_t }
      - { kind: field, id: armed, type: "bool[2]" }
"#;

const POD_SCHEMA: &str = r#"
kind: root
children:
  - kind: struct
    id: pod
    children:
      - { kind: field, id: state, type: uint8_t }
      - kind: struct
        id: motor
        children:
          - kind: fields
            children:
              - { kind: field, id: rpm, type: int }
              - { kind: field, id: temps, type: "int16_t[3]" }
      - { kind: field, id: voltage, type: double }
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn unpacker(config: CodecConfig, schema: &str) -> Unpacker {
    let unpacker = Unpacker::new(config).expect("valid config");
    unpacker.load_yaml(schema).expect("schema compiles");
    unpacker
}

#[test]
fn reference_packet_decodes_to_nested_record() {
    init_tracing();
    let unpacker = unpacker(CodecConfig::default(), TELEMETRY_SCHEMA);
    let packet = seal_packet(&[0, 0, 0, 0, 0x00, 0x2A, 0x01, 0x00], Endianness::Big);
    assert_eq!(&packet[..3], &[0xBA, 0xD6, 0xE4]);

    let record = unpacker.decode(&packet).unwrap().into_record().unwrap();
    assert_eq!(record.value_at(&["telemetry", "speed"]), Some(&Value::UInt16(42)));
    assert_eq!(
        record.value_at(&["telemetry", "armed"]),
        Some(&Value::Array(vec![Value::Bool(true), Value::Bool(false)]))
    );
}

#[test]
fn zeroed_header_is_dropped_even_with_valid_crc() {
    let unpacker = unpacker(CodecConfig::default(), TELEMETRY_SCHEMA);
    let mut packet = vec![0x00, 0x00, 0x00, 0, 0, 0, 0, 0x00, 0x2A, 0x01, 0x00];
    let crc = crc32fast::hash(&packet);
    packet.extend_from_slice(&crc.to_be_bytes());

    assert_eq!(unpacker.decode(&packet).unwrap(), DecodeOutcome::Dropped(DropReason::BadHeader));
}

#[test]
fn little_endian_deployment() {
    let config = CodecConfig::from_yaml("endianness: little\n").unwrap();
    let unpacker = unpacker(config, POD_SCHEMA);

    let mut body = Vec::new();
    body.extend_from_slice(&77u32.to_le_bytes());
    body.push(2);
    body.extend_from_slice(&(-1500i32).to_le_bytes());
    for temp in [30i16, -5, 41] {
        body.extend_from_slice(&temp.to_le_bytes());
    }
    body.extend_from_slice(&48.25f64.to_le_bytes());
    let packet = seal_packet(&body, Endianness::Little);
    assert_eq!(u32::from_le_bytes([packet[0], packet[1], packet[2], 0]), HEADER_MAGIC);

    let record = unpacker.decode(&packet).unwrap().into_record().unwrap();
    assert_eq!(record.value_at(&["packetNumber"]), Some(&Value::UInt32(77)));
    assert_eq!(record.value_at(&["pod", "state"]), Some(&Value::UInt8(2)));
    assert_eq!(record.value_at(&["pod", "motor", "rpm"]), Some(&Value::Int32(-1500)));
    assert_eq!(
        record.value_at(&["pod", "motor", "temps"]),
        Some(&Value::Array(vec![Value::Int16(30), Value::Int16(-5), Value::Int16(41)]))
    );
    assert_eq!(record.value_at(&["pod", "voltage"]), Some(&Value::Float64(48.25)));

    // Same bytes under the wrong byte order fail the header check.
    let big = unpacker_with(Endianness::Big);
    assert!(big.decode(&packet).unwrap().is_dropped());
}

fn unpacker_with(endianness: Endianness) -> Unpacker {
    unpacker(CodecConfig::default().with_endianness(endianness), POD_SCHEMA)
}

#[test]
fn record_serializes_like_the_schema() {
    let config = CodecConfig::default().with_profile(WireProfile::bare());
    let unpacker = unpacker(config, TELEMETRY_SCHEMA);
    let packet = seal_packet(&[0x01, 0x00, 0x05, 0x01], Endianness::Big);

    let record = unpacker.decode(&packet).unwrap().into_record().unwrap();
    let yaml = serde_yaml_ng::to_string(&record).unwrap();
    let actual: serde_yaml_ng::Value = serde_yaml_ng::from_str(&yaml).unwrap();
    let expected: serde_yaml_ng::Value =
        serde_yaml_ng::from_str("telemetry: { speed: 256, armed: [false, true] }").unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn schema_errors_surface_from_load() {
    let unpacker = Unpacker::new(CodecConfig::default()).unwrap();

    let unknown = "kind: root\nchildren:\n  - { kind: field, id: x, type: long }\n";
    assert!(matches!(unpacker.load_yaml(unknown), Err(TelemetryError::Compile(_))));

    let missing = "kind: root\nchildren:\n  - { kind: field, type: int }\n";
    assert!(matches!(unpacker.load_yaml(missing), Err(TelemetryError::Compile(_))));

    assert!(matches!(unpacker.load_yaml("kind: [broken"), Err(TelemetryError::Parse { .. })));
    assert!(matches!(unpacker.decode(&[0xBA, 0xD6, 0xE4]), Err(TelemetryError::NotLoaded)));
}

#[test]
fn concurrent_decodes_share_one_schema() {
    let unpacker = Arc::new(unpacker(CodecConfig::default(), TELEMETRY_SCHEMA));
    let handles: Vec<_> = (0u16..4)
        .map(|speed| {
            let unpacker = Arc::clone(&unpacker);
            std::thread::spawn(move || {
                let mut body = vec![0, 0, 0, 0];
                body.extend_from_slice(&speed.to_be_bytes());
                body.extend_from_slice(&[1, 1]);
                let packet = seal_packet(&body, Endianness::Big);
                unpacker.decode(&packet).unwrap().into_record().unwrap()
            })
        })
        .collect();

    for (speed, handle) in handles.into_iter().enumerate() {
        let record = handle.join().unwrap();
        assert_eq!(
            record.value_at(&["telemetry", "speed"]),
            Some(&Value::UInt16(speed as u16))
        );
    }
}

#[tokio::test(start_paused = true)]
async fn connection_decodes_replayed_capture() {
    init_tracing();
    let unpacker = Arc::new(unpacker(CodecConfig::default(), TELEMETRY_SCHEMA));

    let good = |n: u8| seal_packet(&[0, 0, 0, n, 0x00, n, 0x01, 0x01], Endianness::Big);
    let mut bad_crc = good(9);
    let last = bad_crc.len() - 1;
    bad_crc[last] ^= 0x10;

    let source = ReplaySource::new(vec![good(1), bad_crc, good(2)]).paced(50.0);
    let connection = TelemetryConnection::open(source, Arc::clone(&unpacker));

    let numbers: Vec<Value> = connection
        .records()
        .take(2)
        .map(|record| record.value_at(&["packetNumber"]).cloned().unwrap())
        .collect()
        .await;

    assert_eq!(numbers, vec![Value::UInt32(1), Value::UInt32(2)]);
    let stats = connection.stats();
    assert_eq!(stats.decoded, 2);
    assert_eq!(stats.dropped_checksum, 1);
}
