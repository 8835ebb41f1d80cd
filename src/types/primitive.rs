//! Primitive wire types, byte order and decoded values

use serde::{Deserialize, Serialize};

/// Byte order applied to every multi-byte read, including the header and checksum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Most significant byte first (network order)
    #[default]
    Big,
    /// Least significant byte first
    Little,
}

impl Endianness {
    /// Read an unsigned integer of `bytes.len()` bytes (at most 8).
    pub fn read_unsigned(self, bytes: &[u8]) -> u64 {
        debug_assert!(bytes.len() <= 8);
        match self {
            Endianness::Big => bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
            Endianness::Little => {
                bytes.iter().rev().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
            }
        }
    }

    /// Encode the low `width` bytes of `value`. Widths above 8 are clamped to 8.
    pub fn write_unsigned(self, value: u64, width: usize) -> Vec<u8> {
        let be = value.to_be_bytes();
        let mut out = be[be.len() - width.min(be.len())..].to_vec();
        if self == Endianness::Little {
            out.reverse();
        }
        out
    }
}

/// Fixed-width scalar types a schema field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// `int8_t`
    Int8,
    /// `uint8_t`
    UInt8,
    /// `int16_t`
    Int16,
    /// `uint16_t`
    UInt16,
    /// `int` / `int32_t`
    Int32,
    /// `uint32_t`
    UInt32,
    /// `int64_t`
    Int64,
    /// `uint64_t`
    UInt64,
    /// `float`
    Float32,
    /// `double`
    Float64,
    /// `bool`, one byte on the wire
    Bool,
}

macro_rules! read_number {
    ($ty:ty, $bytes:expr, $endianness:expr) => {{
        const WIDTH: usize = std::mem::size_of::<$ty>();
        let raw: [u8; WIDTH] = $bytes.get(..WIDTH)?.try_into().ok()?;
        match $endianness {
            Endianness::Big => <$ty>::from_be_bytes(raw),
            Endianness::Little => <$ty>::from_le_bytes(raw),
        }
    }};
}

impl PrimitiveType {
    /// Every supported type, in table order.
    pub const ALL: [PrimitiveType; 11] = [
        PrimitiveType::Int8,
        PrimitiveType::UInt8,
        PrimitiveType::Int16,
        PrimitiveType::UInt16,
        PrimitiveType::Int32,
        PrimitiveType::UInt32,
        PrimitiveType::Int64,
        PrimitiveType::UInt64,
        PrimitiveType::Float32,
        PrimitiveType::Float64,
        PrimitiveType::Bool,
    ];

    /// Resolve a C type name as it appears in schema documents.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let primitive = match name {
            "int8_t" => PrimitiveType::Int8,
            "uint8_t" => PrimitiveType::UInt8,
            "int16_t" => PrimitiveType::Int16,
            "uint16_t" => PrimitiveType::UInt16,
            "int" | "int32_t" => PrimitiveType::Int32,
            "uint32_t" => PrimitiveType::UInt32,
            "int64_t" => PrimitiveType::Int64,
            "uint64_t" => PrimitiveType::UInt64,
            "float" => PrimitiveType::Float32,
            "double" => PrimitiveType::Float64,
            "bool" => PrimitiveType::Bool,
            _ => return None,
        };
        Some(primitive)
    }

    /// Canonical schema name of this type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Int8 => "int8_t",
            PrimitiveType::UInt8 => "uint8_t",
            PrimitiveType::Int16 => "int16_t",
            PrimitiveType::UInt16 => "uint16_t",
            PrimitiveType::Int32 => "int32_t",
            PrimitiveType::UInt32 => "uint32_t",
            PrimitiveType::Int64 => "int64_t",
            PrimitiveType::UInt64 => "uint64_t",
            PrimitiveType::Float32 => "float",
            PrimitiveType::Float64 => "double",
            PrimitiveType::Bool => "bool",
        }
    }

    /// Returns the size in bytes of this type on the wire.
    pub const fn size(&self) -> usize {
        match self {
            PrimitiveType::Int8 | PrimitiveType::UInt8 | PrimitiveType::Bool => 1,
            PrimitiveType::Int16 | PrimitiveType::UInt16 => 2,
            PrimitiveType::Int32 | PrimitiveType::UInt32 | PrimitiveType::Float32 => 4,
            PrimitiveType::Int64 | PrimitiveType::UInt64 | PrimitiveType::Float64 => 8,
        }
    }

    /// Decode one value from the start of `bytes`.
    ///
    /// Returns `None` when fewer than [`size`](Self::size) bytes are available.
    /// Booleans are `true` only for a raw byte of exactly `1`.
    pub fn read(&self, bytes: &[u8], endianness: Endianness) -> Option<Value> {
        let value = match self {
            PrimitiveType::Int8 => Value::Int8(*bytes.first()? as i8),
            PrimitiveType::UInt8 => Value::UInt8(*bytes.first()?),
            PrimitiveType::Bool => Value::Bool(*bytes.first()? == 1),
            PrimitiveType::Int16 => Value::Int16(read_number!(i16, bytes, endianness)),
            PrimitiveType::UInt16 => Value::UInt16(read_number!(u16, bytes, endianness)),
            PrimitiveType::Int32 => Value::Int32(read_number!(i32, bytes, endianness)),
            PrimitiveType::UInt32 => Value::UInt32(read_number!(u32, bytes, endianness)),
            PrimitiveType::Int64 => Value::Int64(read_number!(i64, bytes, endianness)),
            PrimitiveType::UInt64 => Value::UInt64(read_number!(u64, bytes, endianness)),
            PrimitiveType::Float32 => Value::Float32(read_number!(f32, bytes, endianness)),
            PrimitiveType::Float64 => Value::Float64(read_number!(f64, bytes, endianness)),
        };
        Some(value)
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A decoded scalar, or an ordered sequence for array fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    Array(Vec<Value>),
}

impl Value {
    /// Integer view of any integral value that fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v.into()),
            Value::UInt8(v) => Some(v.into()),
            Value::Int16(v) => Some(v.into()),
            Value::UInt16(v) => Some(v.into()),
            Value::Int32(v) => Some(v.into()),
            Value::UInt32(v) => Some(v.into()),
            Value::Int64(v) => Some(v),
            Value::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::UInt64(v) => Some(v),
            _ => self.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float32(v) => Some(v.into()),
            Value::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }
}
