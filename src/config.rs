//! Codec configuration
//!
//! Byte order and wire profile are chosen once per deployment and applied to
//! every packet. Configuration documents are YAML:
//!
//! ```yaml
//! endianness: little
//! profile:
//!   data_start: 7
//!   overlay:
//!     - { offset: 3, primitive: UInt32, path: [packetNumber] }
//! ```

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::codec::WireProfile;
use crate::types::Endianness;

/// Settings shared by every decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub endianness: Endianness,
    pub profile: WireProfile,
}

impl CodecConfig {
    /// Parse and validate a YAML configuration document. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: CodecConfig =
            if yaml.trim().is_empty() { Self::default() } else { serde_yaml_ng::from_str(yaml)? };
        config.validate()?;
        Ok(config)
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn with_profile(mut self, profile: WireProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.profile.validate()
    }
}
