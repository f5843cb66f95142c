use crate::core::compressed::{self, Vec3};
use crate::core::reader::{ShortRead, WireReader};
use crate::utils::hex::hex_string;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a field's bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    U8,
    U16,
    /// Object identifier, little-endian signed 32-bit
    I32,
    U32,
    F32,
    Cv3,
    Cv4,
    Cf16,
    /// Consumes the rest of the payload
    Var,
}

impl Encoding {
    /// Fixed width in bytes, 0 for [`Encoding::Var`].
    pub const fn width(self) -> usize {
        match self {
            Encoding::U8 => 1,
            Encoding::U16 | Encoding::Cf16 => 2,
            Encoding::Cv3 => 3,
            Encoding::I32 | Encoding::U32 | Encoding::F32 => 4,
            Encoding::Cv4 => 5,
            Encoding::Var => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::U8 => "u8",
            Encoding::U16 => "u16",
            Encoding::I32 => "i32",
            Encoding::U32 => "u32",
            Encoding::F32 => "f32",
            Encoding::Cv3 => "cv3",
            Encoding::Cv4 => "cv4",
            Encoding::Cf16 => "cf16",
            Encoding::Var => "var",
        }
    }

    pub fn is_compressed(self) -> bool {
        matches!(self, Encoding::Cv3 | Encoding::Cv4 | Encoding::Cf16)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One field of a message layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub encoding: Encoding,
}

impl FieldSpec {
    pub const fn new(name: &'static str, encoding: Encoding) -> Self {
        Self { name, encoding }
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.encoding.width()
    }

    #[inline]
    pub const fn is_variable(&self) -> bool {
        self.encoding.width() == 0
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    ObjectId(i32),
    U32(u32),
    F32(f32),
    Vector(Vec3),
    Float(f32),
    Bytes(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::U8(v) => write!(f, "0x{v:02X}"),
            FieldValue::U16(v) => write!(f, "{v}"),
            FieldValue::ObjectId(id) => write!(f, "0x{:08X}", *id as u32),
            FieldValue::U32(v) => write!(f, "0x{v:08X}"),
            FieldValue::F32(v) => write!(f, "{v:.2}"),
            FieldValue::Vector(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v:.2}"),
            FieldValue::Bytes(b) if b.len() <= 8 => write!(f, "[{}]", hex_string(b)),
            FieldValue::Bytes(b) => write!(f, "{} bytes", b.len()),
        }
    }
}

/// Decode one field at the reader's position.
pub fn decode_field(reader: &mut WireReader<'_>, spec: &FieldSpec) -> Result<FieldValue, ShortRead> {
    Ok(match spec.encoding {
        Encoding::U8 => FieldValue::U8(reader.read_u8()?),
        Encoding::U16 => FieldValue::U16(reader.read_u16()?),
        Encoding::I32 => FieldValue::ObjectId(reader.read_i32()?),
        Encoding::U32 => FieldValue::U32(reader.read_u32()?),
        Encoding::F32 => FieldValue::F32(reader.read_f32()?),
        Encoding::Cv3 => FieldValue::Vector(compressed::read_cv3(reader)?),
        Encoding::Cv4 => FieldValue::Vector(compressed::read_cv4(reader)?),
        Encoding::Cf16 => FieldValue::Float(compressed::read_cf16(reader)?),
        Encoding::Var => FieldValue::Bytes(reader.read_rest().to_vec()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(Encoding::Cv4.width(), 5);
        assert_eq!(Encoding::Cf16.width(), 2);
        assert_eq!(Encoding::Var.width(), 0);
        assert!(FieldSpec::new("blob", Encoding::Var).is_variable());
    }

    #[test]
    fn test_object_id_display() {
        let data = [0xFF, 0xFF, 0xFF, 0x3F];
        let mut r = WireReader::new(&data);
        let v = decode_field(&mut r, &FieldSpec::new("object_id", Encoding::I32)).unwrap();
        assert_eq!(v.to_string(), "0x3FFFFFFF");

        let neg = FieldValue::ObjectId(-1);
        assert_eq!(neg.to_string(), "0xFFFFFFFF");
    }

    #[test]
    fn test_var_consumes_rest() {
        let data = [1, 2, 3];
        let mut r = WireReader::new(&data);
        r.read_u8().unwrap();
        let v = decode_field(&mut r, &FieldSpec::new("blob", Encoding::Var)).unwrap();
        assert_eq!(v, FieldValue::Bytes(vec![2, 3]));
        assert!(r.is_exhausted());
    }
}
