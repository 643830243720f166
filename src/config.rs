//! Pipeline configuration
//!
//! Everything the attribution pipeline needs to know about the operator's own
//! organization plus the tuning knobs for concurrency and chunking. Values can
//! be built in code or loaded from the environment; problems are fatal at
//! pipeline construction time, never mid-run.

use crate::error::{PipelineError, Result};
use std::collections::HashSet;

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Email domains belonging to the operator's own organization, never a client
    pub internal_domains: HashSet<String>,

    /// Individual internal addresses (covers team members on public providers)
    pub internal_emails: HashSet<String>,

    /// Lowercase keywords marking the internal team in meeting titles
    /// (e.g. "fruitbowl", "fbd")
    pub internal_keywords: Vec<String>,

    /// Accept brand-only answers (no domain) from the title fallback
    pub allow_brand_only: bool,

    /// Bucket still-unassigned meetings by literal title prefix
    pub include_ambiguous_bucket: bool,

    /// Maximum in-flight oracle calls
    pub max_concurrency: usize,

    /// Chunk window size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            internal_domains: HashSet::new(),
            internal_emails: HashSet::new(),
            internal_keywords: Vec::new(),
            allow_brand_only: true,
            include_ambiguous_bucket: true,
            max_concurrency: 4,
            chunk_size: 2500,
            chunk_overlap: 200,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// List variables (`INTERNAL_DOMAINS`, `INTERNAL_EMAILS`,
    /// `INTERNAL_KEYWORDS`) are comma-separated; boolean and numeric variables
    /// fall back to defaults when absent or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            internal_domains: env_list("INTERNAL_DOMAINS").into_iter().collect(),
            internal_emails: env_list("INTERNAL_EMAILS").into_iter().collect(),
            internal_keywords: env_list("INTERNAL_KEYWORDS"),
            allow_brand_only: env_bool("INCLUDE_BRAND_ONLY", defaults.allow_brand_only),
            include_ambiguous_bucket: env_bool(
                "INCLUDE_AMBIGUOUS_BUCKET",
                defaults.include_ambiguous_bucket,
            ),
            max_concurrency: env_usize("MAX_CONCURRENCY", defaults.max_concurrency),
            chunk_size: env_usize("CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: env_usize("CHUNK_OVERLAP", defaults.chunk_overlap),
        }
    }

    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(PipelineError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a comma-separated environment variable into trimmed lowercase entries
fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        Err(_) => default,
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
