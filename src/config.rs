//! sqlporter configuration.
//!
//! Everything can be set in code or loaded from TOML:
//!
//! ```toml
//! [stream]
//! workers = 4
//! batch_size = 16384
//! timeout_ms = 30000
//! max_retries = 2
//! backoff = { kind = "exponential", initial_ms = 50, max_ms = 1000, multiplier = 2.0 }
//!
//! [convert]
//! from = "oracle"
//! to = "postgres"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::dialect::DialectKind;
use crate::error::{PorterError, PorterResult};
use crate::stream::retry::{Backoff, ErrorObserver, RetryPolicy};

/// Batch floor used when `batch_size` is 0.
pub const DEFAULT_BATCH_SIZE: usize = 16 * 1024;
/// Pooled buffer capacity used when `buffer_size` is 0.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming parser configuration. Zero means "pick a default" for sizes
/// and worker count, and "no deadline" for the timeout.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamParserConfig {
    /// Parse parallelism; 0 uses the available parallelism.
    pub workers: usize,
    /// Minimum bytes per batch before a boundary is looked for.
    pub batch_size: usize,
    /// Capacity of pooled buffers; never below `batch_size`.
    pub buffer_size: usize,
    /// Deadline for one call, in milliseconds.
    pub timeout_ms: u64,
    /// Retries per batch for temporary failures.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// Set in code only.
    #[serde(skip)]
    pub error_observer: Option<ErrorObserver>,
}

impl fmt::Debug for StreamParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamParserConfig")
            .field("workers", &self.workers)
            .field("batch_size", &self.batch_size)
            .field("buffer_size", &self.buffer_size)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("error_observer", &self.error_observer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl StreamParserConfig {
    /// Create a new configuration builder
    pub fn builder() -> StreamParserConfigBuilder {
        StreamParserConfigBuilder::default()
    }

    /// Copy with every zero size or worker count replaced by its default.
    pub fn normalized(&self) -> Self {
        let workers = match self.workers {
            0 => std::thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        };
        let batch_size = match self.batch_size {
            0 => DEFAULT_BATCH_SIZE,
            n => n,
        };
        let buffer_size = match self.buffer_size {
            0 => DEFAULT_BUFFER_SIZE,
            n => n,
        }
        .max(batch_size);

        Self {
            workers,
            batch_size,
            buffer_size,
            ..self.clone()
        }
    }

    /// `None` when no deadline is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.backoff)
    }
}

/// Builder for StreamParserConfig
#[derive(Debug, Default)]
pub struct StreamParserConfigBuilder {
    config: StreamParserConfig,
}

impl StreamParserConfigBuilder {
    /// Set the number of workers
    pub fn workers(mut self, n: usize) -> Self {
        self.config.workers = n;
        self
    }

    /// Set the minimum batch size in bytes
    pub fn batch_size(mut self, bytes: usize) -> Self {
        self.config.batch_size = bytes;
        self
    }

    /// Set the pooled buffer capacity in bytes
    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.config.buffer_size = bytes;
        self
    }

    /// Set the per-call deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Set the retry budget and backoff
    pub fn retry(mut self, max_retries: u32, backoff: Backoff) -> Self {
        self.config.max_retries = max_retries;
        self.config.backoff = backoff;
        self
    }

    /// Set the error observer
    pub fn error_observer(mut self, observer: ErrorObserver) -> Self {
        self.config.error_observer = Some(observer);
        self
    }

    /// Build the configuration
    pub fn build(self) -> StreamParserConfig {
        self.config
    }
}

/// Default dialects for `convert`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub from: Option<DialectKind>,
    pub to: Option<DialectKind>,
}

/// Top-level `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PorterConfig {
    pub stream: StreamParserConfig,
    pub convert: ConvertConfig,
}

impl PorterConfig {
    pub fn from_toml(text: &str) -> PorterResult<Self> {
        toml::from_str(text).map_err(|e| PorterError::Config(e.to_string()))
    }

    /// Load from a file.
    pub fn load(path: impl AsRef<Path>) -> PorterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PorterError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// `<config dir>/sqlporter/config.toml`, if the platform has a config
    /// directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sqlporter").join("config.toml"))
    }

    /// Load the default file, or fall back to defaults if it does not exist.
    pub fn load_default() -> PorterResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}
