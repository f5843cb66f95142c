//! # Serialization Formats
//!
//! Export of reports, manifests and decoded checksum responses in several formats.
//! Supports bincode (compact binary), JSON (default, diffable between runs), and
//! MessagePack (compact, self-describing).
//!
//! ## Features
//! - **Multiple formats**: Bincode, JSON, MessagePack
//! - **Format metadata**: Optional format byte prefix for automatic detection
//! - **Config friendly**: formats parse from and serialize to lowercase names
//!
//! ## Usage
//! ```ignore
//! use wirecheck::core::serialization::{MultiFormat, SerializationFormat};
//!
//! let bytes = report.serialize_format(SerializationFormat::Json)?;
//! let tagged = manifest.serialize_with_header(SerializationFormat::MessagePack)?;
//! ```

use crate::error::{Result, WireError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// Binary compact format
    Bincode,
    /// Human-readable JSON format
    #[default]
    Json,
    /// Compact self-describing binary format
    #[serde(rename = "messagepack")]
    MessagePack,
}

impl SerializationFormat {
    /// Format identifier byte used by the tagged variants
    pub fn format_byte(self) -> u8 {
        match self {
            SerializationFormat::Bincode => 0x01,
            SerializationFormat::Json => 0x02,
            SerializationFormat::MessagePack => 0x03,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(SerializationFormat::Bincode),
            0x02 => Some(SerializationFormat::Json),
            0x03 => Some(SerializationFormat::MessagePack),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "bincode",
            SerializationFormat::Json => "json",
            SerializationFormat::MessagePack => "messagepack",
        }
    }

    /// Conventional file extension for exported artifacts
    pub fn extension(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "bin",
            SerializationFormat::Json => "json",
            SerializationFormat::MessagePack => "msgpack",
        }
    }
}

impl FromStr for SerializationFormat {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bincode" => Ok(SerializationFormat::Bincode),
            "json" => Ok(SerializationFormat::Json),
            "messagepack" | "msgpack" => Ok(SerializationFormat::MessagePack),
            other => Err(WireError::ConfigError(format!(
                "Unknown report format: '{other}' (expected json, bincode or messagepack)"
            ))),
        }
    }
}

/// Types that can be exported in any [`SerializationFormat`]
pub trait MultiFormat: Serialize + for<'de> Deserialize<'de> + Sized {
    fn serialize_format(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        match format {
            SerializationFormat::Bincode => {
                bincode::serialize(self).map_err(|e| WireError::SerializeError(e.to_string()))
            }
            SerializationFormat::Json => serde_json::to_vec_pretty(self)
                .map_err(|e| WireError::SerializeError(e.to_string())),
            SerializationFormat::MessagePack => {
                rmp_serde::to_vec_named(self).map_err(|e| WireError::SerializeError(e.to_string()))
            }
        }
    }

    /// Serialize with a leading format byte
    fn serialize_with_header(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        let mut data = vec![format.format_byte()];
        data.extend(self.serialize_format(format)?);
        Ok(data)
    }

    fn deserialize_format(data: &[u8], format: SerializationFormat) -> Result<Self> {
        match format {
            SerializationFormat::Bincode => {
                bincode::deserialize(data).map_err(|e| WireError::DeserializeError(e.to_string()))
            }
            SerializationFormat::Json => {
                serde_json::from_slice(data).map_err(|e| WireError::DeserializeError(e.to_string()))
            }
            SerializationFormat::MessagePack => {
                rmp_serde::from_slice(data).map_err(|e| WireError::DeserializeError(e.to_string()))
            }
        }
    }

    /// Deserialize data produced by [`MultiFormat::serialize_with_header`]
    fn deserialize_with_header(data: &[u8]) -> Result<(Self, SerializationFormat)> {
        let (&tag, body) = data
            .split_first()
            .ok_or_else(|| WireError::DeserializeError("Empty data".to_string()))?;

        let format = SerializationFormat::from_byte(tag).ok_or_else(|| {
            WireError::DeserializeError(format!("Unknown format byte: 0x{tag:02X}"))
        })?;

        Ok((Self::deserialize_format(body, format)?, format))
    }

    /// Write the serialized form to `path`
    fn export_to_file<P: AsRef<Path>>(&self, path: P, format: SerializationFormat) -> Result<()> {
        let bytes = self.serialize_format(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
