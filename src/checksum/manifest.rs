//! Expected checksum manifest built from a local game install.
//!
//! The checksum exchange walks four fixed rounds. Each round names a
//! directory relative to the game root, a filename filter and whether one
//! level of subdirectories is included. A round whose directory is absent is
//! kept as `None` so round indices stay aligned with the wire.

use crate::checksum::hash::{content_hash_file, name_hash, name_hash_str};
use crate::config::{ManifestConfig, DEFAULT_VERSION_STRING};
use crate::core::serialization::MultiFormat;
use crate::error::{constants, Result, WireError};
use crate::utils::metrics::{global_metrics, Timer};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Static description of one checksum round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSpec {
    /// Directory relative to the game root, `/`-separated with a trailing `/`
    pub directory: &'static str,
    pub filter: &'static str,
    pub recursive: bool,
}

impl RoundSpec {
    /// Final path segment; its name hash identifies the round's directory.
    pub fn leaf(&self) -> &'static str {
        self.directory
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(self.directory)
    }

    pub fn dir_hash(&self) -> u32 {
        name_hash_str(self.leaf())
    }

    pub fn file_filter(&self) -> FileFilter {
        FileFilter::parse(self.filter)
    }

    fn local_path(&self, game_dir: &Path) -> PathBuf {
        join_relative(game_dir, self.directory)
    }
}

/// Join a `/`-separated relative directory onto `root`.
fn join_relative(root: &Path, directory: &str) -> PathBuf {
    directory
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |p, seg| p.join(seg))
}

/// The rounds in wire order.
pub const ROUNDS: [RoundSpec; 4] = [
    RoundSpec {
        directory: "scripts/",
        filter: "App.pyc",
        recursive: false,
    },
    RoundSpec {
        directory: "scripts/Custom/Multiplayer/",
        filter: "*.pyc",
        recursive: false,
    },
    RoundSpec {
        directory: "scripts/ships/",
        filter: "*.pyc",
        recursive: true,
    },
    RoundSpec {
        directory: "scripts/ships/Hardpoints/",
        filter: "*.pyc",
        recursive: true,
    },
];

/// Filename filter of a round, matched ASCII case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFilter {
    Exact(String),
    /// `*<suffix>` wildcard
    Suffix(String),
}

impl FileFilter {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix('*') {
            Some(suffix) => FileFilter::Suffix(suffix.to_string()),
            None => FileFilter::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            FileFilter::Exact(exact) => name.eq_ignore_ascii_case(exact),
            FileFilter::Suffix(suffix) => {
                name.len() >= suffix.len()
                    && name.is_char_boundary(name.len() - suffix.len())
                    && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Display form; lossy when the on-disk name is not UTF-8
    pub name: String,
    /// Name bytes as stored on disk, the input of `name_hash`
    pub raw_name: Vec<u8>,
    pub name_hash: u32,
    pub content_hash: u32,
}

impl FileEntry {
    /// Entry for a file named by its display string.
    pub fn new(name: &str, content_hash: u32) -> Self {
        Self {
            name: name.to_string(),
            raw_name: name.as_bytes().to_vec(),
            name_hash: name_hash_str(name),
            content_hash,
        }
    }
}

/// Subdirectory of a recursive round, one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub name: String,
    pub raw_name: Vec<u8>,
    pub name_hash: u32,
    pub files: Vec<FileEntry>,
}

impl DirectoryNode {
    pub fn find_file(&self, name_hash: u32) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name_hash == name_hash)
    }
}

/// Expected contents of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub index: usize,
    pub directory: String,
    pub filter: String,
    pub recursive: bool,
    pub dir_hash: u32,
    pub files: Vec<FileEntry>,
    pub subdirs: Vec<DirectoryNode>,
}

impl Round {
    pub fn find_file(&self, name_hash: u32) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name_hash == name_hash)
    }

    pub fn find_subdir(&self, name_hash: u32) -> Option<&DirectoryNode> {
        self.subdirs.iter().find(|d| d.name_hash == name_hash)
    }

    /// Files in this round including those in subdirectories.
    pub fn total_files(&self) -> usize {
        self.files.len() + self.subdirs.iter().map(|d| d.files.len()).sum::<usize>()
    }
}

/// Per-round counts for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub index: usize,
    pub present: bool,
    pub files: usize,
    pub subdirs: usize,
    pub subdir_files: usize,
}

/// A listed file that no longer matches the disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drift {
    pub round: usize,
    pub path: PathBuf,
    pub kind: DriftKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftKind {
    Missing,
    Mismatch { expected: u32, actual: u32 },
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DriftKind::Missing => write!(f, "round {}: {} missing", self.round, self.path.display()),
            DriftKind::Mismatch { expected, actual } => write!(
                f,
                "round {}: {} expected 0x{expected:08X}, found 0x{actual:08X}",
                self.round,
                self.path.display()
            ),
        }
    }
}

/// Expected answers to every checksum round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version_string: String,
    pub version_hash: u32,
    /// One slot per round in wire order; `None` where the directory is missing
    pub rounds: Vec<Option<Round>>,
}

impl MultiFormat for Manifest {}

impl Manifest {
    /// Build the manifest for the install rooted at `game_dir`.
    pub fn build<P: AsRef<Path>>(game_dir: P, version_string: &str) -> Result<Self> {
        Self::build_rounds(game_dir, version_string, &ROUNDS)
    }

    /// Build against an explicit round table instead of [`ROUNDS`].
    pub fn build_rounds<P: AsRef<Path>>(
        game_dir: P,
        version_string: &str,
        specs: &[RoundSpec],
    ) -> Result<Self> {
        let _timer = Timer::start("manifest_build");
        let game_dir = game_dir.as_ref();
        if !game_dir.is_dir() {
            return Err(WireError::MissingDirectory(format!(
                "{}: {}",
                game_dir.display(),
                constants::ERR_NOT_A_DIRECTORY
            )));
        }

        let mut rounds = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let round = build_round(game_dir, index, spec)?;
            if round.is_none() {
                global_metrics().round_missing();
                warn!(round = index, directory = spec.directory, "Round directory missing");
            }
            rounds.push(round);
        }

        let manifest = Self {
            version_string: version_string.to_string(),
            version_hash: name_hash_str(version_string),
            rounds,
        };
        info!(
            game_dir = %game_dir.display(),
            present = manifest.present_rounds(),
            files = manifest.rounds.iter().flatten().map(Round::total_files).sum::<usize>(),
            "Built checksum manifest"
        );
        Ok(manifest)
    }

    pub fn from_config(config: &ManifestConfig) -> Result<Self> {
        Self::build(&config.game_dir, &config.version_string)
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index).and_then(Option::as_ref)
    }

    pub fn present_rounds(&self) -> usize {
        self.rounds.iter().flatten().count()
    }

    pub fn summary(&self) -> Vec<RoundSummary> {
        self.rounds
            .iter()
            .enumerate()
            .map(|(index, round)| match round {
                Some(r) => RoundSummary {
                    index,
                    present: true,
                    files: r.files.len(),
                    subdirs: r.subdirs.len(),
                    subdir_files: r.subdirs.iter().map(|d| d.files.len()).sum(),
                },
                None => RoundSummary {
                    index,
                    present: false,
                    files: 0,
                    subdirs: 0,
                    subdir_files: 0,
                },
            })
            .collect()
    }

    /// Re-hash every listed file under `game_dir` and report what changed.
    pub fn verify_against<P: AsRef<Path>>(&self, game_dir: P) -> Result<Vec<Drift>> {
        let game_dir = game_dir.as_ref();
        let mut drift = Vec::new();

        for round in self.rounds.iter().flatten() {
            let base = join_relative(game_dir, &round.directory);
            for file in &round.files {
                check_file(&mut drift, round.index, base.join(os_name(&file.raw_name)), file)?;
            }
            for dir in &round.subdirs {
                let sub = base.join(os_name(&dir.raw_name));
                for file in &dir.files {
                    check_file(&mut drift, round.index, sub.join(os_name(&file.raw_name)), file)?;
                }
            }
        }

        if !drift.is_empty() {
            warn!(entries = drift.len(), "Manifest drifted from disk");
        }
        Ok(drift)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version_string: DEFAULT_VERSION_STRING.to_string(),
            version_hash: name_hash_str(DEFAULT_VERSION_STRING),
            rounds: vec![None; ROUNDS.len()],
        }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "version {:?} hash 0x{:08X}",
            self.version_string, self.version_hash
        )?;
        for (index, round) in self.rounds.iter().enumerate() {
            let Some(r) = round else {
                writeln!(f, "round {index}: <absent>")?;
                continue;
            };
            writeln!(
                f,
                "round {index}: {} [{}] dir 0x{:08X}",
                r.directory, r.filter, r.dir_hash
            )?;
            for file in &r.files {
                writeln!(
                    f,
                    "  {:<24} 0x{:08X} 0x{:08X}",
                    file.name, file.name_hash, file.content_hash
                )?;
            }
            for dir in &r.subdirs {
                writeln!(f, "  {}/ 0x{:08X}", dir.name, dir.name_hash)?;
                for file in &dir.files {
                    writeln!(
                        f,
                        "    {:<22} 0x{:08X} 0x{:08X}",
                        file.name, file.name_hash, file.content_hash
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn check_file(drift: &mut Vec<Drift>, round: usize, path: PathBuf, file: &FileEntry) -> Result<()> {
    if !path.is_file() {
        drift.push(Drift {
            round,
            path,
            kind: DriftKind::Missing,
        });
        return Ok(());
    }
    let actual = content_hash_file(&path)?;
    if actual != file.content_hash {
        drift.push(Drift {
            round,
            path,
            kind: DriftKind::Mismatch {
                expected: file.content_hash,
                actual,
            },
        });
    }
    Ok(())
}

/// A directory entry keyed by its on-disk bytes.
struct Entry {
    raw: Vec<u8>,
    display: String,
}

impl Entry {
    fn from_os(name: &OsStr) -> Self {
        Self {
            raw: raw_bytes(name),
            display: name.to_string_lossy().into_owned(),
        }
    }
}

#[cfg(unix)]
fn raw_bytes(name: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    name.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn raw_bytes(name: &OsStr) -> Vec<u8> {
    name.to_string_lossy().into_owned().into_bytes()
}

#[cfg(unix)]
fn os_name(raw: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(raw).to_os_string()
}

#[cfg(not(unix))]
fn os_name(raw: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(raw).into_owned())
}

struct Listing {
    files: Vec<Entry>,
    dirs: Vec<Entry>,
}

/// Entries of `dir` split into files and directories, sorted by name bytes.
///
/// Symlinks are classified by their target. Dot-prefixed directories are
/// skipped; dot-prefixed files are kept.
fn list_dir(dir: &Path) -> Result<Listing> {
    let mut listing = Listing {
        files: Vec::new(),
        dirs: Vec::new(),
    };
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = Entry::from_os(&entry.file_name());
        let meta = match fs::metadata(entry.path()) {
            Ok(meta) => meta,
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if meta.is_dir() {
            if !name.raw.starts_with(b".") {
                listing.dirs.push(name);
            }
        } else if meta.is_file() {
            listing.files.push(name);
        }
    }
    listing.files.sort_by(|a, b| a.raw.cmp(&b.raw));
    listing.dirs.sort_by(|a, b| a.raw.cmp(&b.raw));
    Ok(listing)
}

fn hash_files(dir: &Path, entries: &[Entry], filter: &FileFilter) -> Result<Vec<FileEntry>> {
    entries
        .iter()
        .filter(|e| filter.matches(&e.display))
        .map(|e| {
            Ok(FileEntry {
                name: e.display.clone(),
                raw_name: e.raw.clone(),
                name_hash: name_hash(&e.raw),
                content_hash: content_hash_file(dir.join(os_name(&e.raw)))?,
            })
        })
        .collect()
}

fn build_round(game_dir: &Path, index: usize, spec: &RoundSpec) -> Result<Option<Round>> {
    let dir = spec.local_path(game_dir);
    if !dir.is_dir() {
        if dir.exists() {
            debug!(path = %dir.display(), "{}", constants::ERR_NOT_A_DIRECTORY);
        }
        return Ok(None);
    }

    let filter = spec.file_filter();
    let listing = list_dir(&dir)?;
    let files = hash_files(&dir, &listing.files, &filter)?;

    let mut subdirs = Vec::new();
    if spec.recursive {
        for entry in &listing.dirs {
            let sub = dir.join(os_name(&entry.raw));
            let sub_files = hash_files(&sub, &list_dir(&sub)?.files, &filter)?;
            if sub_files.is_empty() {
                continue;
            }
            subdirs.push(DirectoryNode {
                name: entry.display.clone(),
                raw_name: entry.raw.clone(),
                name_hash: name_hash(&entry.raw),
                files: sub_files,
            });
        }
    }

    debug!(
        round = index,
        files = files.len(),
        subdirs = subdirs.len(),
        "Built round"
    );
    Ok(Some(Round {
        index,
        directory: spec.directory.to_string(),
        filter: spec.filter.to_string(),
        recursive: spec.recursive,
        dir_hash: spec.dir_hash(),
        files,
        subdirs,
    }))
}
