// Configuration types module
// Defines all configuration-related data structures

use crate::engine::{EngineError, HeaderRule, HeaderSet, RuleKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(rename = "static")]
    pub static_files: StaticConfig,
    /// Ordered header rules; later rules override earlier ones
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Static file serving configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StaticConfig {
    /// Document root directory
    pub root: String,
    /// Opaque page-cache extension appended when trying candidate paths
    /// (e.g., ".html"); empty disables the variant
    #[serde(default)]
    pub page_cache_ext: String,
}

/// One configured header rule: a match condition plus the headers to set
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    #[serde(rename = "match")]
    pub matcher: RuleMatchConfig,
    pub headers: HashMap<String, String>,
}

/// Rule match conditions as they appear in the config file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleMatchConfig {
    /// Matches every file
    Global,
    /// Matches common webfont extensions
    Fonts,
    /// Matches files ending in one of the listed extensions
    Extensions { extensions: Vec<String> },
    /// Matches paths under a folder prefix
    Prefix { prefix: String },
    /// Matches paths against a regular expression
    Pattern { pattern: String },
}

impl RuleConfig {
    /// Compile the configured rule into its engine form
    ///
    /// Pattern rules compile their regex here, so a bad pattern fails at
    /// startup rather than per request.
    pub fn compile(&self) -> Result<HeaderRule, EngineError> {
        let kind = match &self.matcher {
            RuleMatchConfig::Global => RuleKind::Global,
            RuleMatchConfig::Fonts => RuleKind::Fonts,
            RuleMatchConfig::Extensions { extensions } => {
                RuleKind::Extensions(extensions.clone())
            }
            RuleMatchConfig::Prefix { prefix } => RuleKind::Prefix(prefix.clone()),
            RuleMatchConfig::Pattern { pattern } => RuleKind::Pattern(
                regex::Regex::new(pattern).map_err(|source| EngineError::RulePattern {
                    pattern: pattern.clone(),
                    source,
                })?,
            ),
        };

        // The config loader lowercases keys; normalize explicitly so rules
        // built in code behave the same.
        let mut headers = HeaderSet::new();
        for (field, content) in &self.headers {
            headers.insert(field.to_ascii_lowercase(), content.clone());
        }
        Ok(HeaderRule::new(kind, headers))
    }
}
