//! Process-wide pool of line buffers.
//!
//! [`acquire`] hands out a [`PooledBuf`]; dropping it clears the buffer and
//! puts it back, on every exit path.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Fits a typical line without growing.
const INITIAL_CAPACITY: usize = 1024;
/// Buffers that grew past this are dropped instead of pooled.
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;
/// Idle buffers kept around.
const MAX_IDLE: usize = 32;

static POOL: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

/// A pooled, empty buffer. Returned to the pool on drop.
pub(crate) struct PooledBuf {
    buf: Vec<u8>,
}

/// Takes a buffer from the pool, or allocates one.
pub(crate) fn acquire() -> PooledBuf {
    let buf = POOL
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop()
        .unwrap_or_else(|| Vec::with_capacity(INITIAL_CAPACITY));
    PooledBuf { buf }
}

impl Deref for PooledBuf {
    type Target = Vec<u8>;
    #[inline]
    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuf {
    fn drop(&mut self) {
        if self.buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        let mut pool = POOL.lock().unwrap_or_else(PoisonError::into_inner);
        if pool.len() < MAX_IDLE {
            pool.push(buf);
        }
    }
}
