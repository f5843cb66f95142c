//! Example: Export checksum artifacts in every serialization format
//!
//! Builds the expected manifest for a game install, decodes a round-2
//! response and writes both as JSON, Bincode and MessagePack.
//!
//! Run with: `cargo run --example export_formats -- /path/to/game [out_dir]`

#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use wirecheck::checksum::{
    decode_response, encode_response, validate_response, FileHash, GrammarVariant, Manifest,
    ResponseHeader, ResponseTree,
};
use wirecheck::core::serialization::{MultiFormat, SerializationFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checksum Artifact Export ===\n");

    let mut args = std::env::args().skip(1);
    let game_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(std::env::temp_dir);

    let manifest = Manifest::build(&game_dir, "60")?;
    println!("{}", manifest);

    // Answer round 2 with exactly what the manifest expects.
    let Some(round) = manifest.round(2) else {
        println!("Round 2 is absent in {}; nothing to answer", game_dir.display());
        return Ok(());
    };
    let header = ResponseHeader {
        round: 2,
        ref_hash: None,
        dir_hash: round.dir_hash,
    };
    let tree = ResponseTree {
        files: round
            .files
            .iter()
            .map(|f| FileHash {
                name_hash: f.name_hash,
                content_hash: f.content_hash,
            })
            .collect(),
        subdirs: Vec::new(),
    };
    let wire = encode_response(&header, &tree, GrammarVariant::Interleaved)?;
    let decoded = decode_response(&wire)?;
    println!(
        "Decoded {} bytes with {}: {}\n",
        wire.len(),
        decoded.variant,
        validate_response(&decoded, &manifest)
    );

    for format in [
        SerializationFormat::Json,
        SerializationFormat::Bincode,
        SerializationFormat::MessagePack,
    ] {
        let manifest_path = out_dir.join(format!("manifest.{}", format.extension()));
        manifest.export_to_file(&manifest_path, format)?;

        let bytes = decoded.serialize_with_header(format)?;
        let (back, detected) = wirecheck::checksum::DecodedResponse::deserialize_with_header(&bytes)?;
        assert_eq!(back, decoded);

        println!("{}", format.name());
        println!("   - manifest: {}", manifest_path.display());
        println!("   - response: {} bytes (format byte 0x{:02X})", bytes.len(), detected.format_byte());
    }

    Ok(())
}
