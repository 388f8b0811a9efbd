//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker count for bounded concurrent mapping. Also the request queue capacity.
    pub workers: usize,

    /// Queue capacity for backpressure buffering.
    pub buffer_capacity: usize,

    /// Optional seed for deterministic reservoir sampling.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            buffer_capacity: 64,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `SEQFLOW_WORKERS`: concurrent mapping worker count
    /// - `SEQFLOW_BUFFER_CAPACITY`: buffering queue capacity
    /// - `SEQFLOW_SEED`: sampling seed
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("SEQFLOW_WORKERS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.workers = v;
            }
        }

        if let Ok(s) = std::env::var("SEQFLOW_BUFFER_CAPACITY") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.buffer_capacity = v;
            }
        }

        if let Ok(s) = std::env::var("SEQFLOW_SEED") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.seed = Some(v);
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::config("workers must be > 0"));
        }
        if self.buffer_capacity == 0 {
            return Err(Error::config("buffer_capacity must be > 0"));
        }
        Ok(())
    }
}
