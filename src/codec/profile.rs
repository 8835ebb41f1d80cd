//! Wire-format profiles: where schema data starts and which metadata sits before it

use serde::{Deserialize, Serialize};

use super::{CHECKSUM_WIDTH, HEADER_WIDTH};
use crate::types::PrimitiveType;
use crate::{Result, TelemetryError};

/// A well-known value read at a fixed offset outside the schema region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayField {
    /// Absolute byte offset within the packet
    pub offset: usize,
    pub primitive: PrimitiveType,
    /// Key path in the decoded record; missing parents are created
    pub path: Vec<String>,
}

impl OverlayField {
    pub fn new(offset: usize, primitive: PrimitiveType, path: &[&str]) -> Self {
        Self { offset, primitive, path: path.iter().map(|key| key.to_string()).collect() }
    }
}

/// Fixed packet layout surrounding the schema-declared fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireProfile {
    /// Offset of the first schema-declared field
    pub data_start: usize,
    /// Metadata merged into every record after shape mapping
    #[serde(default)]
    pub overlay: Vec<OverlayField>,
}

impl Default for WireProfile {
    fn default() -> Self {
        Self::minimal()
    }
}

impl WireProfile {
    /// Header followed by a 4-byte packet counter; data starts at offset 7.
    pub fn minimal() -> Self {
        Self {
            data_start: 7,
            overlay: vec![OverlayField::new(3, PrimitiveType::UInt32, &["packetNumber"])],
        }
    }

    /// Counter, 8-byte capture time, IMD status and two brake pressures; data starts at offset 24.
    pub fn extended() -> Self {
        Self {
            data_start: 24,
            overlay: vec![
                OverlayField::new(3, PrimitiveType::UInt32, &["packetNumber"]),
                OverlayField::new(7, PrimitiveType::UInt64, &["time"]),
                OverlayField::new(15, PrimitiveType::UInt8, &["imd", "status"]),
                OverlayField::new(16, PrimitiveType::Float32, &["pressures", "brakePrimary"]),
                OverlayField::new(20, PrimitiveType::Float32, &["pressures", "brakeSecondary"]),
            ],
        }
    }

    /// No metadata; schema data immediately follows the header.
    pub fn bare() -> Self {
        Self { data_start: HEADER_WIDTH, overlay: Vec::new() }
    }

    /// Smallest packet length that can carry `plan_width` bytes of schema data.
    ///
    /// Saturates at `usize::MAX`, which no packet can reach.
    pub fn required_len(&self, plan_width: usize) -> usize {
        self.data_start.saturating_add(plan_width).saturating_add(CHECKSUM_WIDTH)
    }

    /// Check that every overlay field lies between the header and the data region.
    pub fn validate(&self) -> Result<()> {
        if self.data_start < HEADER_WIDTH {
            return Err(TelemetryError::config(format!(
                "data_start {} overlaps the {}-byte header",
                self.data_start, HEADER_WIDTH
            )));
        }
        if self.data_start.checked_add(CHECKSUM_WIDTH).is_none() {
            return Err(TelemetryError::config(format!(
                "data_start {} leaves no room for the checksum",
                self.data_start
            )));
        }

        for field in &self.overlay {
            if field.path.is_empty() || field.path.iter().any(|key| key.is_empty()) {
                return Err(TelemetryError::config(format!(
                    "overlay field at offset {} has an empty key path",
                    field.offset
                )));
            }
            if field.offset < HEADER_WIDTH {
                return Err(TelemetryError::config(format!(
                    "overlay field '{}' at offset {} overlaps the header",
                    field.path.join("."),
                    field.offset
                )));
            }
            let Some(end) = field.offset.checked_add(field.primitive.size()) else {
                return Err(TelemetryError::config(format!(
                    "overlay field '{}' at offset {} runs past the addressable range",
                    field.path.join("."),
                    field.offset
                )));
            };
            if end > self.data_start {
                return Err(TelemetryError::config(format!(
                    "overlay field '{}' ends at {} past data_start {}",
                    field.path.join("."),
                    end,
                    self.data_start
                )));
            }
        }

        Ok(())
    }
}
