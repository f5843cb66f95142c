//! # Core Building Blocks
//!
//! Low-level byte handling shared by every decoder in the crate.
//!
//! ## Components
//! - **Reader**: bounds-checked little-endian cursor with offset-precise short reads
//! - **Compressed**: cf16 / cv3 / cv4 codecs used inside game payloads
//! - **Serialization**: multi-format export of reports, manifests and decoded responses

pub mod compressed;
pub mod reader;
pub mod serialization;

pub use compressed::Vec3;
pub use reader::{ShortRead, WireReader};
