use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Batch operation to perform
    #[serde(default)]
    pub operation: OperationKind,

    /// Output naming options
    #[serde(default)]
    pub naming: NamingConfig,

    /// Whether to process files across a worker pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Batch operation type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    // @operation: Zero the hour fields of VTT timecodes
    #[default]
    ZeroHourVtt,
    // @operation: Convert SRT files to VTT
    SrtToVtt,
}

impl OperationKind {
    // @returns: Human-readable operation name
    pub fn display_name(&self) -> &str {
        match self {
            Self::ZeroHourVtt => "Zero VTT hours",
            Self::SrtToVtt => "Convert SRT to VTT",
        }
    }

    /// Extension of the input files this operation selects, without the dot
    pub fn input_extension(&self) -> &str {
        match self {
            Self::ZeroHourVtt => "vtt",
            Self::SrtToVtt => "srt",
        }
    }

    // @returns: Lowercase operation identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::ZeroHourVtt => "zero-hour-vtt".to_string(),
            Self::SrtToVtt => "srt-to-vtt".to_string(),
        }
    }
}

// Implement Display trait for OperationKind
impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for OperationKind
impl std::str::FromStr for OperationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "zero-hour-vtt" | "vtt" => Ok(Self::ZeroHourVtt),
            "srt-to-vtt" | "srt" => Ok(Self::SrtToVtt),
            _ => Err(anyhow!("Invalid operation type: {}", s)),
        }
    }
}

/// Output file naming options
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NamingConfig {
    // @field: Number outputs sequentially ({prefix}{index}.vtt)
    #[serde(default)]
    pub sequential_numbering: bool,

    // @field: Prefix for sequential numbering, may be empty
    #[serde(default = "String::new")]
    pub sequence_prefix: String,

    // @field: Ask the caller for a replacement name per file
    #[serde(default)]
    pub interactive_rename: bool,
}

impl NamingConfig {
    /// Resolve the effective naming policy.
    ///
    /// Sequential numbering takes precedence over interactive rename,
    /// which takes precedence over the default index-suffixed scheme.
    pub fn policy(&self) -> NamingPolicy {
        if self.sequential_numbering {
            NamingPolicy::Sequential
        } else if self.interactive_rename {
            NamingPolicy::Interactive
        } else {
            NamingPolicy::Default
        }
    }
}

/// Effective output naming policy, after precedence resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    /// `{prefix}{index}.vtt`
    Sequential,
    /// Per-file caller prompt; blank answers keep the derived base name
    Interactive,
    /// `{base}_{index}.vtt`
    Default,
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_parallel() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            operation: OperationKind::default(),
            naming: NamingConfig::default(),
            parallel: default_parallel(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // A prefix carrying a path separator would escape the output directory
        if self.naming.sequence_prefix.contains(['/', '\\']) {
            return Err(anyhow!(
                "Sequence prefix must not contain path separators: {:?}",
                self.naming.sequence_prefix
            ));
        }

        Ok(())
    }
}
