// Application runtime state
// Read-only state shared across connections

use crate::config::Config;
use crate::engine::{EngineError, StaticEngine};

/// Shared application state
///
/// Built once at startup and wrapped in an `Arc`; nothing here mutates
/// after construction, so request handlers need no locking.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub engine: StaticEngine,
}

impl AppState {
    /// Build the runtime state, compiling rules and validating the
    /// document root
    pub fn new(config: Config) -> Result<Self, EngineError> {
        let rules = config
            .rules
            .iter()
            .map(super::RuleConfig::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let engine = StaticEngine::new(
            &config.static_files.root,
            rules,
            &config.static_files.page_cache_ext,
        )?;

        Ok(Self { config, engine })
    }
}
