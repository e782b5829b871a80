//! Reusable batch buffers.
//!
//! A buffer is checked out with [`BufferPool::acquire`] and goes back to the
//! free list when its [`PooledBuffer`] is dropped, whichever way the owner
//! exits.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

/// Idle buffers kept beyond this are freed.
const MAX_IDLE: usize = 64;

/// Pool of byte buffers of at least `capacity` bytes.
#[derive(Debug, Clone)]
pub struct BufferPool {
    capacity: usize,
    free: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl BufferPool {
    /// Create a pool handing out buffers of at least `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            free: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take a buffer from the free list, or allocate one.
    ///
    /// Recycled buffers are cleared but not zeroed.
    pub fn acquire(&self) -> PooledBuffer {
        let recycled = self.free.lock().ok().and_then(|mut free| free.pop());
        let mut buf = recycled.unwrap_or_else(|| Vec::with_capacity(self.capacity));
        buf.clear();
        PooledBuffer {
            buf,
            free: Arc::clone(&self.free),
        }
    }

    /// Number of idle buffers.
    pub fn idle(&self) -> usize {
        self.free.lock().map(|free| free.len()).unwrap_or(0)
    }

    fn release(free: &Mutex<Vec<Vec<u8>>>, buf: Vec<u8>) {
        if let Ok(mut free) = free.lock()
            && free.len() < MAX_IDLE
        {
            free.push(buf);
        }
    }
}

/// A buffer checked out of a [`BufferPool`]; returned on drop.
#[derive(Debug)]
pub struct PooledBuffer {
    buf: Vec<u8>,
    free: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            BufferPool::release(&self.free, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_has_capacity() {
        let pool = BufferPool::new(1024);
        let buf = pool.acquire();
        assert!(buf.capacity() >= 1024);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_drop_returns_buffer() {
        let pool = BufferPool::new(16);
        {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"CREATE TABLE t (a INT);");
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire();
        assert!(buf.is_empty(), "recycled buffers come back cleared");
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_idle_list_is_capped() {
        let pool = BufferPool::new(8);
        let held: Vec<_> = (0..MAX_IDLE + 10).map(|_| pool.acquire()).collect();
        drop(held);
        assert_eq!(pool.idle(), MAX_IDLE);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(BufferPool::new(0).capacity(), 1);
    }
}
