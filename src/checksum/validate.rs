//! Checks a decoded checksum response against the expected manifest.

use crate::checksum::manifest::{Manifest, Round};
use crate::checksum::response::{DecodedResponse, ResponseTree};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// First disagreement between a response and the manifest, or `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumVerdict {
    Ok,
    /// No such round, or the manifest has it as absent
    RoundUnavailable { round: u8 },
    VersionMismatch { expected: u32, found: u32 },
    DirMismatch { expected: u32, found: u32 },
    FileMismatch {
        name_hash: u32,
        expected: u32,
        found: u32,
    },
    FileMissing { name_hash: u32 },
    SubdirMissing { name_hash: u32 },
}

impl ChecksumVerdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, ChecksumVerdict::Ok)
    }
}

impl fmt::Display for ChecksumVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ChecksumVerdict::Ok => f.write_str("ok"),
            ChecksumVerdict::RoundUnavailable { round } => {
                write!(f, "round 0x{round:02X} not in manifest")
            }
            ChecksumVerdict::VersionMismatch { expected, found } => {
                write!(f, "version hash 0x{found:08X}, expected 0x{expected:08X}")
            }
            ChecksumVerdict::DirMismatch { expected, found } => {
                write!(f, "directory hash 0x{found:08X}, expected 0x{expected:08X}")
            }
            ChecksumVerdict::FileMismatch {
                name_hash,
                expected,
                found,
            } => write!(
                f,
                "file 0x{name_hash:08X} content 0x{found:08X}, expected 0x{expected:08X}"
            ),
            ChecksumVerdict::FileMissing { name_hash } => {
                write!(f, "file 0x{name_hash:08X} missing from response")
            }
            ChecksumVerdict::SubdirMissing { name_hash } => {
                write!(f, "subdirectory 0x{name_hash:08X} missing from response")
            }
        }
    }
}

/// Compare `response` with the round it answers.
///
/// Every file and subdirectory the manifest lists must be present with the
/// same hashes; entries only the response has are tolerated.
pub fn validate_response(response: &DecodedResponse, manifest: &Manifest) -> ChecksumVerdict {
    let header = &response.header;
    let Some(round) = manifest.round(usize::from(header.round)) else {
        return ChecksumVerdict::RoundUnavailable {
            round: header.round,
        };
    };

    if let Some(found) = header.ref_hash {
        if found != manifest.version_hash {
            return ChecksumVerdict::VersionMismatch {
                expected: manifest.version_hash,
                found,
            };
        }
    }
    if header.dir_hash != round.dir_hash {
        return ChecksumVerdict::DirMismatch {
            expected: round.dir_hash,
            found: header.dir_hash,
        };
    }

    let verdict = validate_round(round, &response.tree);
    debug!(round = header.round, %verdict, "Validated checksum response");
    verdict
}

fn validate_round(round: &Round, tree: &ResponseTree) -> ChecksumVerdict {
    let files = round
        .files
        .iter()
        .map(|f| (f.name_hash, f.content_hash));
    if let Some(v) = validate_files(files, tree) {
        return v;
    }

    for dir in &round.subdirs {
        let Some(sub) = tree.find_subdir(dir.name_hash) else {
            return ChecksumVerdict::SubdirMissing {
                name_hash: dir.name_hash,
            };
        };
        let files = dir.files.iter().map(|f| (f.name_hash, f.content_hash));
        if let Some(v) = validate_files(files, sub) {
            return v;
        }
    }
    ChecksumVerdict::Ok
}

fn validate_files(
    expected: impl Iterator<Item = (u32, u32)>,
    tree: &ResponseTree,
) -> Option<ChecksumVerdict> {
    for (name_hash, content) in expected {
        match tree.find_file(name_hash) {
            None => return Some(ChecksumVerdict::FileMissing { name_hash }),
            Some(found) if found.content_hash != content => {
                return Some(ChecksumVerdict::FileMismatch {
                    name_hash,
                    expected: content,
                    found: found.content_hash,
                })
            }
            Some(_) => {}
        }
    }
    None
}
