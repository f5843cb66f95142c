//! # Compressed Encodings
//!
//! The wire protocol replaces full 32-bit floats with three compact encodings.
//!
//! ## cf16 (2 bytes, little-endian `u16`)
//! ```text
//! bit 15      sign
//! bits 12-14  scale (decade selector, 0..=7)
//! bits 0-11   mantissa (0..=4095)
//! ```
//! Scale `s` covers `[lo, hi)` with `hi = 0.001 * 10^s` and `lo = hi / 10`
//! (`lo = 0` for scale 0), so the decades run from `[0, 0.001)` up to
//! `[1000, 10000)`. The mantissa interpolates linearly within the decade.
//!
//! ## cv3 (3 bytes)
//! A unit direction; each component is a signed byte divided by 127.
//!
//! ## cv4 (5 bytes)
//! A cv3 direction followed by a cf16 magnitude.

use crate::core::reader::{ShortRead, WireReader};
use serde::{Deserialize, Serialize};
use std::fmt;

const CF16_SIGN: u16 = 0x8000;
const CF16_MANTISSA_MAX: u16 = 0x0FFF;
const CF16_MAX_SCALE: u16 = 7;
const CV3_UNIT: f32 = 127.0;

/// Decoded three-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scale(&self, k: f32) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

fn cf16_decade(scale: u16) -> (f32, f32) {
    let hi = 0.001_f32 * 10_f32.powi(i32::from(scale));
    let lo = if scale == 0 { 0.0 } else { hi / 10.0 };
    (lo, hi)
}

/// Decode a cf16 value.
pub fn decode_cf16(raw: u16) -> f32 {
    let scale = (raw >> 12) & CF16_MAX_SCALE;
    let mantissa = f32::from(raw & CF16_MANTISSA_MAX);
    let (lo, hi) = cf16_decade(scale);
    let magnitude = lo + mantissa / f32::from(CF16_MANTISSA_MAX) * (hi - lo);
    if raw & CF16_SIGN != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Encode a value as cf16. Magnitudes beyond the top decade saturate.
pub fn encode_cf16(value: f32) -> u16 {
    let sign = if value < 0.0 { CF16_SIGN } else { 0 };
    let magnitude = if value.is_finite() { value.abs() } else { f32::MAX };

    let scale = (0..=CF16_MAX_SCALE)
        .find(|&s| magnitude < cf16_decade(s).1)
        .unwrap_or(CF16_MAX_SCALE);
    let (lo, hi) = cf16_decade(scale);

    let fraction = ((magnitude - lo) / (hi - lo)).clamp(0.0, 1.0);
    let mantissa = (fraction * f32::from(CF16_MANTISSA_MAX)).round() as u16;

    sign | (scale << 12) | mantissa.min(CF16_MANTISSA_MAX)
}

/// Decode a cv3 unit direction.
pub fn decode_cv3(raw: [u8; 3]) -> Vec3 {
    let c = |b: u8| f32::from(b as i8) / CV3_UNIT;
    Vec3::new(c(raw[0]), c(raw[1]), c(raw[2]))
}

/// Encode the direction of `v` as cv3. The zero vector encodes as all zeroes.
pub fn encode_cv3(v: Vec3) -> [u8; 3] {
    let len = v.length();
    if len <= f32::EPSILON || !len.is_finite() {
        return [0; 3];
    }
    let c = |x: f32| ((x / len) * CV3_UNIT).round().clamp(-CV3_UNIT, CV3_UNIT) as i8 as u8;
    [c(v.x), c(v.y), c(v.z)]
}

/// Decode a cv4 vector (direction scaled by magnitude).
pub fn decode_cv4(raw: [u8; 5]) -> Vec3 {
    let dir = decode_cv3([raw[0], raw[1], raw[2]]);
    let magnitude = decode_cf16(u16::from_le_bytes([raw[3], raw[4]]));
    dir.scale(magnitude)
}

pub fn encode_cv4(v: Vec3) -> [u8; 5] {
    let dir = encode_cv3(v);
    let mag = encode_cf16(v.length()).to_le_bytes();
    [dir[0], dir[1], dir[2], mag[0], mag[1]]
}

pub fn read_cf16(reader: &mut WireReader<'_>) -> Result<f32, ShortRead> {
    Ok(decode_cf16(reader.read_u16()?))
}

pub fn read_cv3(reader: &mut WireReader<'_>) -> Result<Vec3, ShortRead> {
    let b = reader.read_slice(3)?;
    Ok(decode_cv3([b[0], b[1], b[2]]))
}

pub fn read_cv4(reader: &mut WireReader<'_>) -> Result<Vec3, ShortRead> {
    let b = reader.read_slice(5)?;
    Ok(decode_cv4([b[0], b[1], b[2], b[3], b[4]]))
}
