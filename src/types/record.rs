//! Decoded records and per-packet outcomes

use serde::Serialize;
use std::collections::BTreeMap;

use super::Value;

/// A value inside a decoded record: a field value or a nested struct.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Value(Value),
    Struct(DecodedRecord),
}

impl RecordValue {
    /// The scalar or array value, if this is not a struct.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            RecordValue::Value(value) => Some(value),
            RecordValue::Struct(_) => None,
        }
    }

    /// The nested record, if this is a struct.
    pub fn as_struct(&self) -> Option<&DecodedRecord> {
        match self {
            RecordValue::Struct(record) => Some(record),
            RecordValue::Value(_) => None,
        }
    }
}

/// Nested key-value record mirroring the schema's struct nesting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecodedRecord {
    fields: BTreeMap<String, RecordValue>,
}

impl DecodedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level entry under `key`.
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.get(key)
    }

    /// Follow a key path through nested structs.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&RecordValue> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for key in parents {
            current = current.fields.get(key.as_ref())?.as_struct()?;
        }
        current.fields.get(last.as_ref())
    }

    /// Field value at a key path, if the path ends at a value.
    pub fn value_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        self.get_path(path)?.as_value()
    }

    /// Insert or replace a top-level entry.
    pub fn insert(&mut self, key: impl Into<String>, value: RecordValue) {
        self.fields.insert(key.into(), value);
    }

    /// Insert or overwrite a value at a key path, creating nested structs as needed.
    ///
    /// A scalar standing where a struct is needed is replaced by an empty struct.
    /// An empty path leaves the record unchanged.
    pub fn insert_path<S: AsRef<str>>(&mut self, path: &[S], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = self;
        for key in parents {
            let slot = current
                .fields
                .entry(key.as_ref().to_string())
                .or_insert_with(|| RecordValue::Struct(DecodedRecord::new()));
            if !matches!(slot, RecordValue::Struct(_)) {
                *slot = RecordValue::Struct(DecodedRecord::new());
            }
            let RecordValue::Struct(next) = slot else {
                unreachable!("slot was just made a struct");
            };
            current = next;
        }
        current.fields.insert(last.as_ref().to_string(), RecordValue::Value(value));
    }

    /// Top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Why a packet was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DropReason {
    /// The first three bytes are not the packet magic
    BadHeader,
    /// The trailing CRC-32 does not match the packet contents
    ChecksumMismatch,
    /// The packet passed validation but is shorter than the compiled layout
    Truncated { required: usize, actual: usize },
}

/// Result of decoding one packet.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// The packet passed validation and was decoded
    Decoded(DecodedRecord),
    /// The packet failed validation; not an error
    Dropped(DropReason),
}

impl DecodeOutcome {
    /// The decoded record, unless the packet was dropped.
    pub fn record(&self) -> Option<&DecodedRecord> {
        match self {
            DecodeOutcome::Decoded(record) => Some(record),
            DecodeOutcome::Dropped(_) => None,
        }
    }

    /// Consume the outcome, keeping only a decoded record.
    pub fn into_record(self) -> Option<DecodedRecord> {
        match self {
            DecodeOutcome::Decoded(record) => Some(record),
            DecodeOutcome::Dropped(_) => None,
        }
    }

    /// Why the packet was dropped, if it was.
    pub fn drop_reason(&self) -> Option<DropReason> {
        match self {
            DecodeOutcome::Dropped(reason) => Some(*reason),
            DecodeOutcome::Decoded(_) => None,
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, DecodeOutcome::Dropped(_))
    }
}
