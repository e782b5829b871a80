//! Concurrent streaming DDL parser.
//!
//! ```text
//! source ──▶ Batcher ──▶ [bounded queue] ──▶ Worker × N ──▶ Aggregator ──▶ Schema
//!              │                               │ spawn_blocking(dialect.parse)
//!              └── BufferPool ◀── drop ────────┘
//! ```
//!
//! One call runs every task in a single [`JoinSet`] under one deadline.
//! Leaving the call on any path (success, first error, timeout, or the
//! caller dropping the future) drops the set, which aborts whatever is
//! still running and returns every pooled buffer.

pub mod aggregator;
pub mod batcher;
pub mod boundary;
pub mod buffer;
pub mod retry;
pub mod worker;

use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::StreamParserConfig;
use crate::dialect::Dialect;
use crate::error::{PorterError, PorterResult};
use crate::schema::Schema;

use aggregator::Aggregator;
use batcher::Batcher;
use boundary::BoundaryRules;
use buffer::BufferPool;
use worker::Worker;

pub use retry::{Backoff, ErrorObserver, RetryPolicy};

/// How a pipeline task ended.
enum TaskExit {
    /// The batcher finished after sending this many batches.
    Batcher(u64),
    Worker,
}

/// Parses DDL streams with one dialect.
///
/// A parser can serve several calls at once; concurrent calls share only
/// the buffer pool and the dialect.
pub struct StreamParser {
    dialect: Arc<dyn Dialect>,
    config: StreamParserConfig,
    pool: BufferPool,
}

impl StreamParser {
    /// Create a parser. Zero sizes and worker counts in `config` are
    /// replaced by defaults.
    pub fn new(dialect: Arc<dyn Dialect>, config: StreamParserConfig) -> Self {
        let config = config.normalized();
        let pool = BufferPool::new(config.buffer_size);
        Self {
            dialect,
            config,
            pool,
        }
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    pub fn config(&self) -> &StreamParserConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.config.workers
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    pub fn buffer_pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Change the per-call deadline. Zero disables it.
    pub fn set_timeout(&mut self, timeout: std::time::Duration) {
        self.config.timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
    }

    pub fn set_error_observer(&mut self, observer: Option<ErrorObserver>) {
        self.config.error_observer = observer;
    }

    /// Parse everything `source` yields into one schema.
    ///
    /// A missing source is rejected before anything is allocated.
    pub async fn parse_stream<R>(&self, source: Option<R>) -> PorterResult<Schema>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.run(source, None).await
    }

    /// Like [`parse_stream`](Self::parse_stream), but also give up at
    /// `deadline`, whichever comes first.
    pub async fn parse_stream_until<R>(
        &self,
        source: Option<R>,
        deadline: Instant,
    ) -> PorterResult<Schema>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        self.run(source, Some(deadline)).await
    }

    async fn run<R>(&self, source: Option<R>, deadline: Option<Instant>) -> PorterResult<Schema>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let Some(source) = source else {
            let err = PorterError::invalid("no input source");
            self.observe(&err);
            return Err(err);
        };

        let started = Instant::now();
        let deadline = match (self.config.timeout().map(|t| started + t), deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        let outcome = match deadline {
            Some(deadline) => {
                match tokio::time::timeout_at(deadline, self.pipeline(source)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        let err = PorterError::Timeout {
                            elapsed: started.elapsed(),
                        };
                        warn!(elapsed = ?started.elapsed(), "streaming parse timed out");
                        self.observe(&err);
                        Err(err)
                    }
                }
            }
            None => self.pipeline(source).await,
        };

        if let Ok(schema) = &outcome {
            info!(
                dialect = %self.dialect.kind(),
                tables = schema.tables.len(),
                sequences = schema.sequences.len(),
                views = schema.views.len(),
                triggers = schema.triggers.len(),
                elapsed = ?started.elapsed(),
                "stream parsed"
            );
        }
        outcome
    }

    async fn pipeline<R>(&self, source: R) -> PorterResult<Schema>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let workers = self.config.workers;
        let retry = self.config.retry_policy();
        let observer = self.config.error_observer.clone();

        let (batch_tx, batch_rx) = mpsc::channel(workers * 2);
        let (result_tx, mut result_rx) = mpsc::channel(workers * 2);
        let batch_rx = Arc::new(Mutex::new(batch_rx));
        let mut tasks = JoinSet::new();

        let batcher = Batcher::new(
            source,
            self.pool.clone(),
            BoundaryRules::for_dialect(self.dialect.kind()),
            self.config.batch_size,
            retry,
            observer.clone(),
        );
        tasks.spawn(async move { batcher.run(batch_tx).await.map(TaskExit::Batcher) });

        let worker = Worker {
            dialect: Arc::clone(&self.dialect),
            retry,
            observer,
        };
        for _ in 0..workers {
            let worker = worker.clone();
            let batches = Arc::clone(&batch_rx);
            let results = result_tx.clone();
            tasks.spawn(async move {
                worker.run(batches, results).await;
                Ok(TaskExit::Worker)
            });
        }
        drop(result_tx);

        let mut aggregator = Aggregator::new();
        let mut expected = None;
        loop {
            tokio::select! {
                Some(result) = result_rx.recv() => aggregator.accept(result)?,
                Some(joined) = tasks.join_next() => match joined {
                    Ok(Ok(TaskExit::Batcher(count))) => {
                        debug!(batches = count, "batcher finished");
                        expected = Some(count);
                    }
                    Ok(Ok(TaskExit::Worker)) => {}
                    Ok(Err(err)) => return Err(err),
                    Err(join) => {
                        return Err(PorterError::Internal(format!("pipeline task failed: {}", join)));
                    }
                },
                else => break,
            }
        }

        let expected = expected
            .ok_or_else(|| PorterError::Internal("batcher exited without a count".into()))?;
        aggregator.finish(expected)
    }

    fn observe(&self, err: &PorterError) {
        if let Some(observer) = &self.config.error_observer {
            observer(err);
        }
    }
}
