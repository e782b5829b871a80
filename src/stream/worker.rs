//! Parse workers.

use std::any::Any;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::dialect::Dialect;
use crate::error::{PorterError, PorterResult};
use crate::schema::Schema;
use crate::stream::batcher::Batch;
use crate::stream::buffer::PooledBuffer;
use crate::stream::retry::{ErrorObserver, RetryPolicy};

/// Outcome of parsing one batch.
#[derive(Debug)]
pub struct BatchResult {
    pub index: u64,
    pub outcome: PorterResult<Schema>,
}

/// Batch queue shared by all workers of one call.
pub type SharedReceiver = Arc<Mutex<mpsc::Receiver<Batch>>>;

/// One worker: pulls batches until the queue closes, parses each on the
/// blocking pool and reports the result.
#[derive(Clone)]
pub struct Worker {
    pub dialect: Arc<dyn Dialect>,
    pub retry: RetryPolicy,
    pub observer: Option<ErrorObserver>,
}

impl Worker {
    pub async fn run(self, batches: SharedReceiver, results: mpsc::Sender<BatchResult>) {
        loop {
            let next = batches.lock().await.recv().await;
            let Some(batch) = next else {
                break;
            };

            let index = batch.index;
            let outcome = self.parse_batch(batch).await;
            let failed = outcome.is_err();
            if results.send(BatchResult { index, outcome }).await.is_err() || failed {
                break;
            }
        }
    }

    /// Parse one batch, retrying temporary failures on the same bytes.
    async fn parse_batch(&self, batch: Batch) -> PorterResult<Schema> {
        let Batch {
            index,
            offset,
            mut data,
        } = batch;
        let mut attempt = 0u32;

        loop {
            let dialect = Arc::clone(&self.dialect);
            let task = tokio::task::spawn_blocking(move || {
                let outcome = parse_bytes(dialect.as_ref(), &data);
                (data, outcome)
            });

            let err = match task.await {
                Ok((_, Ok(schema))) => {
                    debug!(batch = index, attempt, "batch parsed");
                    return Ok(schema);
                }
                Ok((buf, Err(err))) => {
                    data = buf;
                    relocate(err, offset)
                }
                Err(join) if join.is_panic() => {
                    let err = PorterError::WorkerPanic {
                        batch: index,
                        message: panic_message(join.into_panic()),
                    };
                    self.observe(&err);
                    return Err(err);
                }
                Err(join) => {
                    return Err(PorterError::Internal(format!(
                        "parse task for batch {} did not finish: {}",
                        index, join
                    )));
                }
            };

            self.observe(&err);
            if !err.is_temporary() {
                return Err(err.in_batch(index));
            }
            attempt += 1;
            match self.retry.next_delay(attempt) {
                Some(delay) => {
                    warn!(batch = index, attempt, error = %err, "retrying batch");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                None => {
                    return Err(PorterError::RetriesExhausted {
                        batch: index,
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
            }
        }
    }

    fn observe(&self, err: &PorterError) {
        if let Some(observer) = &self.observer {
            observer(err);
        }
    }
}

fn parse_bytes(dialect: &dyn Dialect, data: &PooledBuffer) -> PorterResult<Schema> {
    let text = std::str::from_utf8(data)
        .map_err(|e| PorterError::invalid(format!("batch is not valid UTF-8: {}", e)))?;
    dialect.parse(text)
}

/// Make a syntax error offset relative to the whole source.
fn relocate(err: PorterError, base: u64) -> PorterError {
    match err {
        PorterError::Syntax { offset, message } => PorterError::Syntax {
            offset: offset + base as usize,
            message,
        },
        other => other,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
