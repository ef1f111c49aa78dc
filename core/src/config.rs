use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Construction settings for a [`SearchServer`](crate::SearchServer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub stop_words: Vec<String>,
    /// Shards of the parallel relevance map. Defaults to the rayon pool size.
    pub shard_count: Option<usize>,
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config = serde_json::from_str(json).context("parse search config")?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("load {}", path.display()))
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count.unwrap_or_else(rayon::current_num_threads).max(1)
    }
}
