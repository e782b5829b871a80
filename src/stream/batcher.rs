//! Statement-aligned batching of a byte stream.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{PorterError, PorterResult};
use crate::stream::boundary::{BoundaryRules, BoundaryScanner};
use crate::stream::buffer::{BufferPool, PooledBuffer};
use crate::stream::retry::{ErrorObserver, RetryPolicy};

/// Bytes pulled from the source per read.
const READ_CHUNK: usize = 8 * 1024;

/// One unit of work: whole statements only.
#[derive(Debug)]
pub struct Batch {
    /// Position in the source, starting at 0.
    pub index: u64,
    /// Byte offset of the first byte in the source.
    pub offset: u64,
    pub data: PooledBuffer,
}

/// Sequential reader that cuts the source into [`Batch`]es.
///
/// A batch is cut at the first statement boundary at or after `batch_size`
/// bytes, so batches are usually a little larger than the floor and never
/// split a statement.
pub struct Batcher<R> {
    reader: R,
    pool: BufferPool,
    scanner: BoundaryScanner,
    batch_size: usize,
    retry: RetryPolicy,
    observer: Option<ErrorObserver>,
}

impl<R: AsyncRead + Unpin> Batcher<R> {
    pub fn new(
        reader: R,
        pool: BufferPool,
        rules: BoundaryRules,
        batch_size: usize,
        retry: RetryPolicy,
        observer: Option<ErrorObserver>,
    ) -> Self {
        Self {
            reader,
            pool,
            scanner: BoundaryScanner::new(rules),
            batch_size: batch_size.max(1),
            retry,
            observer,
        }
    }

    /// Read the whole source, sending batches in order.
    ///
    /// Returns the number of batches sent. Stops early, without error, if
    /// the queue is closed.
    pub async fn run(mut self, tx: mpsc::Sender<Batch>) -> PorterResult<u64> {
        let mut chunk = vec![0u8; READ_CHUNK];
        let mut current = self.pool.acquire();
        let mut index = 0u64;
        let mut offset = 0u64;
        let mut start = 0u64;
        // The current buffer holds at least one finished statement.
        let mut complete = false;

        loop {
            let n = self.read(&mut chunk, index).await?;
            if n == 0 {
                break;
            }

            for &b in &chunk[..n] {
                current.push(b);
                offset += 1;
                if !self.scanner.feed(b) {
                    continue;
                }
                complete |= self.scanner.last_had_content();
                if current.len() < self.batch_size {
                    continue;
                }

                if complete {
                    let data = std::mem::replace(&mut current, self.pool.acquire());
                    if !Self::emit(&tx, index, start, data).await {
                        return Ok(index);
                    }
                    index += 1;
                } else {
                    current.clear();
                }
                start = offset;
                complete = false;
            }
        }

        if let Err(err) = self.scanner.finish() {
            self.observe(&err);
            return Err(err.in_batch(index));
        }
        if complete || self.scanner.has_content() {
            if !Self::emit(&tx, index, start, current).await {
                return Ok(index);
            }
            index += 1;
        }
        debug!(batches = index, bytes = offset, "source exhausted");
        Ok(index)
    }

    /// One read, retrying temporary failures without touching buffered
    /// bytes.
    async fn read(&mut self, chunk: &mut [u8], index: u64) -> PorterResult<usize> {
        let mut attempt = 0u32;
        loop {
            match self.reader.read(chunk).await {
                Ok(n) => return Ok(n),
                Err(err) => {
                    let err = PorterError::Io(err);
                    self.observe(&err);
                    if !err.is_temporary() {
                        return Err(err.in_batch(index));
                    }
                    attempt += 1;
                    match self.retry.next_delay(attempt) {
                        Some(delay) => {
                            warn!(batch = index, attempt, error = %err, "retrying read");
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
        }
    }

    async fn emit(
        tx: &mpsc::Sender<Batch>,
        index: u64,
        offset: u64,
        data: PooledBuffer,
    ) -> bool {
        debug!(batch = index, offset, bytes = data.len(), "batch ready");
        if tx.send(Batch { index, offset, data }).await.is_err() {
            debug!(batch = index, "batch queue closed");
            return false;
        }
        true
    }

    fn observe(&self, err: &PorterError) {
        if let Some(observer) = &self.observer {
            observer(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectKind;
    use pretty_assertions::assert_eq;

    async fn batches(input: &'static str, kind: DialectKind, batch_size: usize) -> Vec<String> {
        let (tx, mut rx) = mpsc::channel(64);
        let batcher = Batcher::new(
            input.as_bytes(),
            BufferPool::new(64),
            BoundaryRules::for_dialect(kind),
            batch_size,
            RetryPolicy::default(),
            None,
        );
        let count = batcher.run(tx).await.unwrap();

        let mut out = Vec::new();
        while let Some(batch) = rx.recv().await {
            assert_eq!(batch.index, out.len() as u64);
            out.push(String::from_utf8(batch.data.to_vec()).unwrap());
        }
        assert_eq!(count, out.len() as u64);
        out
    }

    #[tokio::test]
    async fn test_cut_after_floor_at_boundary() {
        let out = batches("CREATE TABLE a (x INT);\nCREATE TABLE b (y INT);\n", DialectKind::Postgres, 5).await;
        assert_eq!(out, ["CREATE TABLE a (x INT);", "\nCREATE TABLE b (y INT);"]);
    }

    #[tokio::test]
    async fn test_large_floor_keeps_one_batch() {
        let input = "CREATE TABLE a (x INT); CREATE TABLE b (y INT);";
        assert_eq!(batches(input, DialectKind::Postgres, 1 << 20).await, [input]);
    }

    #[tokio::test]
    async fn test_never_cuts_inside_literal() {
        let out = batches("INSERT INTO t VALUES ('a;b;c'); SELECT 1;", DialectKind::MySql, 1).await;
        assert_eq!(out, ["INSERT INTO t VALUES ('a;b;c');", " SELECT 1;"]);
    }

    #[tokio::test]
    async fn test_whitespace_remainder_dropped() {
        let out = batches("SELECT 1;\n\n   \n", DialectKind::Sqlite, 1).await;
        assert_eq!(out, ["SELECT 1;"]);
        assert!(batches("", DialectKind::Sqlite, 1).await.is_empty());
    }

    #[tokio::test]
    async fn test_unterminated_tail_remainder_is_emitted() {
        let out = batches("SELECT 1;\nCREATE TABLE t (a INT)", DialectKind::Oracle, 1).await;
        assert_eq!(out, ["SELECT 1;", "\nCREATE TABLE t (a INT)"]);
    }

    #[tokio::test]
    async fn test_unterminated_literal_is_invalid_input() {
        let (tx, _rx) = mpsc::channel(4);
        let batcher = Batcher::new(
            &b"SELECT 'oops"[..],
            BufferPool::new(16),
            BoundaryRules::default(),
            1,
            RetryPolicy::default(),
            None,
        );
        let err = batcher.run(tx).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }
}
