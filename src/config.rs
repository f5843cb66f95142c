//! # Configuration Management
//!
//! Centralized configuration for capture parsing, manifest construction,
//! checksum response decoding and report export.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`WIRECHECK_*` variables)
//!
//! ## Validation
//! `validate()` returns every problem it finds as a readable message;
//! `validate_strict()` folds them into a single `ConfigError`.

use crate::checksum::response::GrammarVariant;
use crate::core::serialization::SerializationFormat;
use crate::error::{Result, WireError};
use crate::trace::Direction;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Magic token at the start of every trace capture
pub const TRACE_MAGIC: [u8; 8] = *b"OBCTRACE";

/// String whose name hash identifies the game version in round 0
pub const DEFAULT_VERSION_STRING: &str = "60";

/// Nesting guard for checksum response trees
pub const DEFAULT_MAX_TREE_DEPTH: usize = 8;

/// Bytes of payload shown in hex previews
pub const DEFAULT_HEX_PREVIEW: usize = 40;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WirecheckConfig {
    #[serde(default)]
    pub trace: TraceConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub checksum: ChecksumConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WirecheckConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| WireError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| WireError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| WireError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Defaults overridden by `WIRECHECK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("WIRECHECK_GAME_DIR") {
            config.manifest.game_dir = PathBuf::from(dir);
        }

        if let Ok(magic) = std::env::var("WIRECHECK_TRACE_MAGIC") {
            config.trace.magic = magic;
        }

        if let Ok(level) = std::env::var("WIRECHECK_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                WireError::ConfigError(format!("Invalid WIRECHECK_LOG_LEVEL: {level}"))
            })?;
        }

        if let Ok(format) = std::env::var("WIRECHECK_REPORT_FORMAT") {
            config.report.format = format.parse()?;
        }

        if let Ok(depth) = std::env::var("WIRECHECK_MAX_TREE_DEPTH") {
            if let Ok(val) = depth.parse::<usize>() {
                config.checksum.max_tree_depth = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| WireError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| WireError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.trace.validate());
        errors.extend(self.manifest.validate());
        errors.extend(self.checksum.validate());
        errors.extend(self.report.validate());
        errors.extend(self.logging.validate());
        errors
    }

    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(WireError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Trace capture settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TraceConfig {
    /// 8-byte ASCII magic token
    pub magic: String,

    /// Direction sampled first when picking a record to compare
    pub preferred_direction: Direction,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            magic: String::from_utf8_lossy(&TRACE_MAGIC).into_owned(),
            preferred_direction: Direction::Sent,
        }
    }
}

impl TraceConfig {
    /// Magic token as raw bytes, if it is exactly 8 ASCII bytes.
    pub fn magic_bytes(&self) -> Option<[u8; 8]> {
        if !self.magic.is_ascii() {
            return None;
        }
        self.magic.as_bytes().try_into().ok()
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.magic.is_ascii() {
            errors.push(format!("Trace magic must be ASCII: '{}'", self.magic));
        } else if self.magic.len() != TRACE_MAGIC.len() {
            errors.push(format!(
                "Trace magic must be exactly {} bytes (got {})",
                TRACE_MAGIC.len(),
                self.magic.len()
            ));
        }
        errors
    }
}

/// Manifest builder settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestConfig {
    /// Game installation root the round paths are relative to
    pub game_dir: PathBuf,

    /// Version string hashed into the manifest's version hash
    pub version_string: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            game_dir: PathBuf::from("."),
            version_string: DEFAULT_VERSION_STRING.to_string(),
        }
    }
}

impl ManifestConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.game_dir.as_os_str().is_empty() {
            errors.push("Game directory cannot be empty".to_string());
        } else if self.game_dir.exists() && !self.game_dir.is_dir() {
            errors.push(format!(
                "Game directory is not a directory: {}",
                self.game_dir.display()
            ));
        }
        if self.version_string.is_empty() {
            errors.push("Version string cannot be empty".to_string());
        }
        errors
    }
}

/// Checksum response decoder settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChecksumConfig {
    /// Deepest directory nesting accepted while decoding a response tree
    pub max_tree_depth: usize,

    /// Grammar variants in the order they are tried
    pub variants: Vec<GrammarVariant>,
}

impl Default for ChecksumConfig {
    fn default() -> Self {
        Self {
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            variants: GrammarVariant::ALL.to_vec(),
        }
    }
}

impl ChecksumConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_tree_depth == 0 {
            errors.push("Max tree depth must be greater than 0".to_string());
        } else if self.max_tree_depth > 64 {
            errors.push(format!(
                "Max tree depth too large: {} (maximum: 64)",
                self.max_tree_depth
            ));
        }
        if self.variants.is_empty() {
            errors.push("At least one grammar variant must be configured".to_string());
        }
        for (i, v) in self.variants.iter().enumerate() {
            if self.variants[..i].contains(v) {
                errors.push(format!("Grammar variant listed twice: {}", v.name()));
            }
        }
        errors
    }
}

/// Report export settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    pub format: SerializationFormat,

    /// Payload bytes shown in hex previews
    pub hex_preview_bytes: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: SerializationFormat::Json,
            hex_preview_bytes: DEFAULT_HEX_PREVIEW,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.hex_preview_bytes == 0 {
            errors.push("Hex preview length must be greater than 0".to_string());
        } else if self.hex_preview_bytes > 4096 {
            errors.push(format!(
                "Hex preview length too large: {} (maximum: 4096)",
                self.hex_preview_bytes
            ));
        }
        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    pub log_to_console: bool,

    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("wirecheck"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        level.as_str().to_ascii_lowercase().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
