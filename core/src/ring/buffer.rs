//! Fixed-capacity circular byte buffer.
//!
//! The buffer stages opaque bytes between a stream endpoint and application
//! code. Live bytes occupy `[position, position + size) mod capacity` of a
//! single owned array; nothing outside that interval is meaningful.
//!
//! # Invariants
//! - `0 < capacity`, `position < capacity`, `size <= capacity`.
//! - Every copy is bounded by ranges produced by [`segments`], so no access
//!   leaves `[0, capacity)`.
//! - `peek`, `read` and `write` are all-or-nothing: the contract check runs
//!   before any byte is touched.

use std::fmt;

use super::segments::{segments, Segments};
use crate::error::RingError;

pub struct RingBuffer {
    storage: Box<[u8]>,
    position: usize,
    size: usize,
}

impl RingBuffer {
    /// Allocates a ring of exactly `capacity` bytes.
    ///
    /// Allocation failure is reported as [`RingError::Allocation`] instead of
    /// aborting the process.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|source| RingError::Allocation { capacity, source })?;
        storage.resize(capacity, 0u8);

        Ok(Self {
            storage: storage.into_boxed_slice(),
            position: 0,
            size: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Bytes currently stored and available to `peek`/`read`.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity() - self.size
    }

    /// Offset of the oldest unread byte.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    /// Discards all buffered bytes. Contents are left in place.
    pub fn empty(&mut self) {
        self.position = 0;
        self.size = 0;
    }

    /// Copies the oldest `dst.len()` bytes into `dst` without consuming them.
    ///
    /// Fails with [`RingError::InsufficientData`] when fewer bytes are
    /// buffered; `dst` is untouched in that case.
    pub fn peek(&self, dst: &mut [u8]) -> Result<(), RingError> {
        let len = dst.len();
        if len > self.size {
            return Err(RingError::InsufficientData {
                requested: len,
                available: self.size,
            });
        }

        let Segments { first, second } = segments(self.position, len, self.capacity());
        let split = first.len();
        dst[..split].copy_from_slice(&self.storage[first]);
        if !second.is_empty() {
            dst[split..].copy_from_slice(&self.storage[second]);
        }
        Ok(())
    }

    /// Like [`peek`](Self::peek), then consumes the copied bytes.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<(), RingError> {
        self.peek(dst)?;
        self.consume(dst.len());
        Ok(())
    }

    /// Appends all of `src` at the tail.
    ///
    /// Fails with [`RingError::BufferFull`] when `src` does not fit; the
    /// buffer is unchanged in that case.
    pub fn write(&mut self, src: &[u8]) -> Result<(), RingError> {
        let len = src.len();
        let remaining = self.remaining_capacity();
        if len > remaining {
            return Err(RingError::BufferFull {
                requested: len,
                remaining,
            });
        }

        let Segments { first, second } = segments(self.tail(), len, self.capacity());
        let split = first.len();
        self.storage[first].copy_from_slice(&src[..split]);
        if !second.is_empty() {
            self.storage[second].copy_from_slice(&src[split..]);
        }
        self.commit(len);
        Ok(())
    }

    /// Offset one past the newest byte.
    fn tail(&self) -> usize {
        (self.position + self.size) % self.capacity()
    }

    /// Longest contiguous readable span starting at `position`.
    pub(super) fn readable_run(&self) -> usize {
        self.size.min(self.capacity() - self.position)
    }

    /// Longest contiguous writable span starting at the tail.
    pub(super) fn writable_run(&self) -> usize {
        let end = self.position + self.size;
        if end < self.capacity() {
            self.capacity() - end
        } else {
            // data wraps (or ends exactly at the array end): free space is
            // bounded by the head
            self.position - (end - self.capacity())
        }
    }

    pub(super) fn readable_slice(&self) -> &[u8] {
        let run = self.readable_run();
        &self.storage[self.position..self.position + run]
    }

    pub(super) fn writable_slice(&mut self) -> &mut [u8] {
        let tail = self.tail();
        let run = self.writable_run();
        &mut self.storage[tail..tail + run]
    }

    /// Marks `n` freshly written tail bytes as live.
    pub(super) fn commit(&mut self, n: usize) {
        debug_assert!(n <= self.remaining_capacity());
        self.size += n;
    }

    /// Drops `n` bytes from the head.
    pub(super) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.size);
        self.position = (self.position + n) % self.capacity();
        self.size -= n;
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("position", &self.position)
            .field("size", &self.size)
            .finish()
    }
}
