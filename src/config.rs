use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_RESULTS_PER_PAGE: u32 = 50;
pub const MAX_RESULTS_PER_PAGE: u32 = 100;
pub const MAX_INLINE_RELATIONS_DEPTH: u32 = 2;

/// Process-wide pagination ceilings, set once at startup.
///
/// Only caller-supplied values are checked against the maxima; a default
/// larger than the maximum is accepted as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerLimits {
    /// Page size used when the caller omits `results-per-page`
    pub default_results_per_page: u32,

    /// Largest page size a caller may request
    pub max_results_per_page: u32,

    /// Deepest relation nesting a caller may request
    pub max_inline_relations_depth: u32,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerLimits {
    pub fn new() -> Self {
        Self {
            default_results_per_page: DEFAULT_RESULTS_PER_PAGE,
            max_results_per_page: MAX_RESULTS_PER_PAGE,
            max_inline_relations_depth: MAX_INLINE_RELATIONS_DEPTH,
        }
    }

    /// Set the default page size
    pub fn default_results_per_page(mut self, value: u32) -> Self {
        self.default_results_per_page = value;
        self
    }

    /// Set the maximum page size
    pub fn max_results_per_page(mut self, value: u32) -> Self {
        self.max_results_per_page = value;
        self
    }

    /// Set the maximum relation depth
    pub fn max_inline_relations_depth(mut self, value: u32) -> Self {
        self.max_inline_relations_depth = value;
        self
    }

    /// Load limits from the environment, falling back to the defaults.
    ///
    /// Reads `DEFAULT_RESULTS_PER_PAGE`, `MAX_RESULTS_PER_PAGE` and
    /// `MAX_INLINE_RELATIONS_DEPTH`, after loading a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::new();
        let limits = Self {
            default_results_per_page: read_u32(
                "DEFAULT_RESULTS_PER_PAGE",
                defaults.default_results_per_page,
            )?,
            max_results_per_page: read_u32("MAX_RESULTS_PER_PAGE", defaults.max_results_per_page)?,
            max_inline_relations_depth: read_u32(
                "MAX_INLINE_RELATIONS_DEPTH",
                defaults.max_inline_relations_depth,
            )?,
        };

        limits
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid server limits")?;
        Ok(limits)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.default_results_per_page == 0 {
            return Err("default_results_per_page must be > 0".to_string());
        }

        if self.max_results_per_page == 0 {
            return Err("max_results_per_page must be > 0".to_string());
        }

        Ok(())
    }
}

fn read_u32(key: &str, fallback: u32) -> Result<u32> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("{key} must be a valid u32")),
        Err(_) => Ok(fallback),
    }
}
