//! Decoder for checksum-round responses.
//!
//! ```text
//! [0x21][round:u8][ref_hash:u32, round 0 only][dir_hash:u32][tree]
//! ```
//!
//! The tree grammar is known only from captured responses, so every
//! candidate is kept as a [`GrammarVariant`] with its own pure parse
//! function. A variant is accepted only when it consumes the buffer to the
//! last byte; a short read, leftover bytes or excessive nesting rejects it.

use crate::config::{ChecksumConfig, DEFAULT_MAX_TREE_DEPTH};
use crate::core::reader::{ShortRead, WireReader};
use crate::core::serialization::MultiFormat;
use crate::error::{constants, Result, WireError};
use crate::schema::opcodes;
use crate::utils::metrics::global_metrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Fixed part of a checksum response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub round: u8,
    /// Version hash echoed back in round 0
    pub ref_hash: Option<u32>,
    pub dir_hash: u32,
}

impl ResponseHeader {
    /// Parse the header, returning it with the offset where the tree starts.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize)> {
        let mut r = WireReader::new(buf);
        let short = |e: ShortRead| {
            WireError::BadChecksumHeader(format!("{}: {e}", constants::ERR_RESPONSE_TOO_SHORT))
        };

        let opcode = r.read_u8().map_err(short)?;
        if opcode != opcodes::CHECKSUM_RESPONSE {
            return Err(WireError::BadChecksumHeader(format!(
                "{} 0x{opcode:02X}",
                constants::ERR_RESPONSE_OPCODE
            )));
        }
        let round = r.read_u8().map_err(short)?;
        let ref_hash = if round == 0 {
            Some(r.read_u32().map_err(short)?)
        } else {
            None
        };
        let dir_hash = r.read_u32().map_err(short)?;

        Ok((
            Self {
                round,
                ref_hash,
                dir_hash,
            },
            r.position(),
        ))
    }

    pub fn encoded_len(&self) -> usize {
        if self.ref_hash.is_some() {
            10
        } else {
            6
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(opcodes::CHECKSUM_RESPONSE);
        out.push(self.round);
        if let Some(h) = self.ref_hash {
            out.extend_from_slice(&h.to_le_bytes());
        }
        out.extend_from_slice(&self.dir_hash.to_le_bytes());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    pub name_hash: u32,
    pub content_hash: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSubdir {
    pub name_hash: u32,
    pub tree: ResponseTree,
}

/// Directory tree carried by a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTree {
    pub files: Vec<FileHash>,
    pub subdirs: Vec<ResponseSubdir>,
}

impl ResponseTree {
    pub fn find_file(&self, name_hash: u32) -> Option<&FileHash> {
        self.files.iter().find(|f| f.name_hash == name_hash)
    }

    pub fn find_subdir(&self, name_hash: u32) -> Option<&ResponseTree> {
        self.subdirs
            .iter()
            .find(|s| s.name_hash == name_hash)
            .map(|s| &s.tree)
    }

    /// Files at every level.
    pub fn total_files(&self) -> usize {
        self.files.len() + self.subdirs.iter().map(|s| s.tree.total_files()).sum::<usize>()
    }

    /// Nesting depth; a tree without subdirectories has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.subdirs.iter().map(|s| s.tree.depth()).max().unwrap_or(0)
    }

    /// Serialize in the layout of `variant`.
    pub fn encode(&self, variant: GrammarVariant, out: &mut Vec<u8>) -> Result<()> {
        let fc = u16::try_from(self.files.len())
            .map_err(|_| WireError::Custom(format!("{} files exceed a u16 count", self.files.len())))?;
        let sc = u8::try_from(self.subdirs.len()).map_err(|_| {
            WireError::Custom(format!("{} subdirs exceed a u8 count", self.subdirs.len()))
        })?;

        out.extend_from_slice(&fc.to_le_bytes());
        for f in &self.files {
            out.extend_from_slice(&f.name_hash.to_le_bytes());
            out.extend_from_slice(&f.content_hash.to_le_bytes());
        }
        out.push(sc);
        match variant {
            GrammarVariant::Interleaved => {
                for s in &self.subdirs {
                    out.extend_from_slice(&s.name_hash.to_le_bytes());
                    s.tree.encode(variant, out)?;
                }
            }
            GrammarVariant::NamesFirst => {
                for s in &self.subdirs {
                    out.extend_from_slice(&s.name_hash.to_le_bytes());
                }
                for s in &self.subdirs {
                    s.tree.encode(variant, out)?;
                }
            }
        }
        Ok(())
    }
}

/// Candidate layouts for the response tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarVariant {
    /// `[fc:u16][files][sc:u8]` then each subdir as `[name:u32][tree]`
    Interleaved,
    /// `[fc:u16][files][sc:u8]` then all subdir names, then all subtrees
    NamesFirst,
}

impl GrammarVariant {
    pub const ALL: [GrammarVariant; 2] = [GrammarVariant::Interleaved, GrammarVariant::NamesFirst];

    pub fn name(self) -> &'static str {
        match self {
            GrammarVariant::Interleaved => "interleaved",
            GrammarVariant::NamesFirst => "names_first",
        }
    }

    /// Parse a tree starting at `start`, returning it with the end offset.
    pub fn parse(
        self,
        buf: &[u8],
        start: usize,
        max_depth: usize,
    ) -> std::result::Result<(ResponseTree, usize), Divergence> {
        let mut reader = WireReader::at(buf, start);
        let tree = match self {
            GrammarVariant::Interleaved => parse_interleaved(&mut reader, max_depth)?,
            GrammarVariant::NamesFirst => parse_names_first(&mut reader, max_depth)?,
        };
        Ok((tree, reader.position()))
    }
}

impl fmt::Display for GrammarVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where and why a grammar stopped making sense of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    pub offset: usize,
    pub reason: String,
}

impl From<ShortRead> for Divergence {
    fn from(e: ShortRead) -> Self {
        Self {
            offset: e.offset,
            reason: e.to_string(),
        }
    }
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}: {}", self.offset, self.reason)
    }
}

fn parse_files(r: &mut WireReader<'_>) -> std::result::Result<Vec<FileHash>, Divergence> {
    let count = r.read_u16()?;
    let mut files = Vec::with_capacity(usize::from(count).min(r.remaining() / 8));
    for _ in 0..count {
        files.push(FileHash {
            name_hash: r.read_u32()?,
            content_hash: r.read_u32()?,
        });
    }
    Ok(files)
}

fn enter(r: &WireReader<'_>, depth_left: usize) -> std::result::Result<(), Divergence> {
    if depth_left == 0 {
        return Err(Divergence {
            offset: r.position(),
            reason: constants::ERR_TREE_TOO_DEEP.to_string(),
        });
    }
    Ok(())
}

fn parse_interleaved(
    r: &mut WireReader<'_>,
    depth_left: usize,
) -> std::result::Result<ResponseTree, Divergence> {
    enter(r, depth_left)?;
    let files = parse_files(r)?;
    let count = r.read_u8()?;
    let mut subdirs = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let name_hash = r.read_u32()?;
        let tree = parse_interleaved(r, depth_left - 1)?;
        subdirs.push(ResponseSubdir { name_hash, tree });
    }
    Ok(ResponseTree { files, subdirs })
}

fn parse_names_first(
    r: &mut WireReader<'_>,
    depth_left: usize,
) -> std::result::Result<ResponseTree, Divergence> {
    enter(r, depth_left)?;
    let files = parse_files(r)?;
    let count = r.read_u8()?;
    let mut names = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        names.push(r.read_u32()?);
    }
    let mut subdirs = Vec::with_capacity(names.len());
    for name_hash in names {
        let tree = parse_names_first(r, depth_left - 1)?;
        subdirs.push(ResponseSubdir { name_hash, tree });
    }
    Ok(ResponseTree { files, subdirs })
}

/// How one grammar variant fared against a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    /// Consumed every byte
    Exact,
    /// Parsed, but stopped before the end of the buffer
    Leftover { consumed: usize },
    Diverged { offset: usize, reason: String },
}

impl AttemptOutcome {
    /// Offset the attempt got to before failing.
    pub fn reached(&self, len: usize) -> usize {
        match self {
            AttemptOutcome::Exact => len,
            AttemptOutcome::Leftover { consumed } => *consumed,
            AttemptOutcome::Diverged { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Exact => f.write_str("exact"),
            AttemptOutcome::Leftover { consumed } => write!(f, "stopped at {consumed} with bytes left"),
            AttemptOutcome::Diverged { offset, reason } => write!(f, "diverged at {offset}: {reason}"),
        }
    }
}

/// A response decoded by exactly one grammar variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedResponse {
    pub header: ResponseHeader,
    pub tree: ResponseTree,
    pub variant: GrammarVariant,
    /// Every variant tried, in order, up to and including the accepted one
    pub attempts: Vec<(GrammarVariant, AttemptOutcome)>,
}

impl MultiFormat for DecodedResponse {}

impl fmt::Display for DecodedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round 0x{:02X}", self.header.round)?;
        if let Some(h) = self.header.ref_hash {
            write!(f, " ref 0x{h:08X}")?;
        }
        writeln!(f, " dir 0x{:08X} ({})", self.header.dir_hash, self.variant)?;
        write_tree(f, &self.tree, 1)
    }
}

fn write_tree(f: &mut fmt::Formatter<'_>, tree: &ResponseTree, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    for file in &tree.files {
        writeln!(f, "{pad}file 0x{:08X} 0x{:08X}", file.name_hash, file.content_hash)?;
    }
    for sub in &tree.subdirs {
        writeln!(f, "{pad}dir  0x{:08X}", sub.name_hash)?;
        write_tree(f, &sub.tree, indent + 1)?;
    }
    Ok(())
}

/// Tries the configured grammar variants in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumDecoder {
    variants: Vec<GrammarVariant>,
    max_depth: usize,
}

impl Default for ChecksumDecoder {
    fn default() -> Self {
        Self {
            variants: GrammarVariant::ALL.to_vec(),
            max_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

impl From<&ChecksumConfig> for ChecksumDecoder {
    fn from(config: &ChecksumConfig) -> Self {
        Self {
            variants: config.variants.clone(),
            max_depth: config.max_tree_depth,
        }
    }
}

impl ChecksumDecoder {
    pub fn new(variants: Vec<GrammarVariant>, max_depth: usize) -> Self {
        Self { variants, max_depth }
    }

    pub fn variants(&self) -> &[GrammarVariant] {
        &self.variants
    }

    fn attempt(&self, buf: &[u8], start: usize, variant: GrammarVariant) -> (Option<ResponseTree>, AttemptOutcome) {
        let result = variant.parse(buf, start, self.max_depth);
        let outcome = match &result {
            Ok((_, end)) if *end == buf.len() => AttemptOutcome::Exact,
            Ok((_, end)) => AttemptOutcome::Leftover { consumed: *end },
            Err(d) => AttemptOutcome::Diverged {
                offset: d.offset,
                reason: d.reason.clone(),
            },
        };
        let accepted = outcome == AttemptOutcome::Exact;
        global_metrics().grammar_attempt(!accepted);
        debug!(variant = variant.name(), %outcome, "Grammar attempt");
        (result.ok().filter(|_| accepted).map(|(tree, _)| tree), outcome)
    }

    /// Decode with the first variant that consumes `buf` exactly.
    pub fn decode(&self, buf: &[u8]) -> Result<DecodedResponse> {
        if self.variants.is_empty() {
            return Err(WireError::ConfigError(constants::ERR_NO_VARIANTS.to_string()));
        }
        let (header, start) = ResponseHeader::parse(buf)?;

        let mut attempts = Vec::with_capacity(self.variants.len());
        for &variant in &self.variants {
            let (tree, outcome) = self.attempt(buf, start, variant);
            attempts.push((variant, outcome));
            if let Some(tree) = tree {
                return Ok(DecodedResponse {
                    header,
                    tree,
                    variant,
                    attempts,
                });
            }
        }

        global_metrics().response_unresolved();
        let offset = attempts
            .iter()
            .map(|(_, o)| o.reached(buf.len()))
            .max()
            .unwrap_or(start);
        let detail = attempts
            .iter()
            .map(|(v, o)| format!("{v}: {o}"))
            .collect::<Vec<_>>()
            .join("; ");
        warn!(round = header.round, len = buf.len(), offset, "No grammar variant fits response");
        Err(WireError::UnresolvedGrammar { offset, detail })
    }

    /// Decode with one specific variant, rejecting anything but exact consumption.
    pub fn decode_with(&self, buf: &[u8], variant: GrammarVariant) -> Result<DecodedResponse> {
        let (header, start) = ResponseHeader::parse(buf)?;
        let (tree, outcome) = self.attempt(buf, start, variant);
        match tree {
            Some(tree) => Ok(DecodedResponse {
                header,
                tree,
                variant,
                attempts: vec![(variant, outcome)],
            }),
            None => Err(WireError::GrammarRejected {
                variant: variant.name().to_string(),
                offset: outcome.reached(buf.len()),
            }),
        }
    }
}

/// Decode with the default variant order.
pub fn decode_response(buf: &[u8]) -> Result<DecodedResponse> {
    ChecksumDecoder::default().decode(buf)
}

/// Build a response buffer; the inverse of decoding with `variant`.
pub fn encode_response(header: &ResponseHeader, tree: &ResponseTree, variant: GrammarVariant) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(header.encoded_len() + 3 + tree.total_files() * 8);
    header.encode(&mut out);
    tree.encode(variant, &mut out)?;
    Ok(out)
}
