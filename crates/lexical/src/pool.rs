//! Process-wide pool of spill buffers for [`SegmentStore`](crate::store::SegmentStore).
//!
//! Long paths with many surviving segments outgrow the store's inline
//! array. Rather than allocate a fresh `Vec` on every such call, stores rent
//! a buffer here and give it back when they are dropped. Rent and return are
//! independent operations: a buffer may be returned by a different call (or
//! thread) than the one that rented it, and a store may rent several times
//! while it grows.
//!
//! `rent` never fails. An empty pool simply allocates.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use crate::store::Segment;

/// Buffers retained by the global pool at most.
pub const MAX_RETAINED_BUFFERS: usize = 16;

/// Buffers larger than this many segments are dropped instead of retained.
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Smallest capacity handed out, so tiny spills still get room to grow.
const MIN_RENT_CAPACITY: usize = 64;

static GLOBAL_POOL: Lazy<SegmentPool> =
    Lazy::new(|| SegmentPool::new(MAX_RETAINED_BUFFERS, MAX_RETAINED_CAPACITY));

/// Thread-safe free list of segment buffers.
#[derive(Debug)]
pub struct SegmentPool {
    free: Mutex<Vec<Vec<Segment>>>,
    max_buffers: usize,
    max_capacity: usize,
}

impl SegmentPool {
    /// A standalone pool. Most callers want [`SegmentPool::global`].
    pub fn new(max_buffers: usize, max_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_buffers)),
            max_buffers,
            max_capacity,
        }
    }

    /// The shared pool used by [`Normalizer`](crate::Normalizer).
    pub fn global() -> &'static SegmentPool {
        &GLOBAL_POOL
    }

    /// Returns an empty buffer with capacity for at least `min_capacity`
    /// segments.
    pub fn rent(&self, min_capacity: usize) -> Vec<Segment> {
        let wanted = min_capacity.max(MIN_RENT_CAPACITY);
        {
            let mut free = self.free.lock();
            if let Some(idx) = free.iter().position(|buf| buf.capacity() >= wanted) {
                return free.swap_remove(idx);
            }
        }
        debug!(
            capacity = wanted.next_power_of_two(),
            "segment_pool_fresh_alloc"
        );
        Vec::with_capacity(wanted.next_power_of_two())
    }

    /// Hands a buffer back. Oversized buffers, or any buffer arriving while
    /// the pool is full, are dropped.
    pub fn give_back(&self, mut buf: Vec<Segment>) {
        if buf.capacity() > self.max_capacity {
            debug!(capacity = buf.capacity(), "segment_pool_drop_oversized");
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_buffers {
            free.push(buf);
        } else {
            debug!(
                capacity = buf.capacity(),
                retained = free.len(),
                "segment_pool_drop_full"
            );
        }
    }

    /// Number of buffers currently waiting to be rented.
    pub fn retained(&self) -> usize {
        self.free.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rent_allocates_when_empty() {
        let pool = SegmentPool::new(4, 1024);
        let buf = pool.rent(10);
        assert!(buf.capacity() >= 10);
        assert!(buf.is_empty());
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn returned_buffers_are_reused() {
        let pool = SegmentPool::new(4, 1024);
        let mut buf = pool.rent(100);
        buf.push(Segment { offset: 1, len: 2 });
        let cap = buf.capacity();
        pool.give_back(buf);
        assert_eq!(pool.retained(), 1);

        let again = pool.rent(100);
        assert_eq!(again.capacity(), cap);
        assert!(again.is_empty());
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn small_buffers_are_skipped_for_large_requests() {
        let pool = SegmentPool::new(4, 4096);
        pool.give_back(Vec::with_capacity(64));
        let big = pool.rent(1000);
        assert!(big.capacity() >= 1000);
        assert_eq!(pool.retained(), 1);
    }

    #[test]
    fn retention_limits() {
        let pool = SegmentPool::new(2, 128);
        pool.give_back(Vec::with_capacity(4096));
        assert_eq!(pool.retained(), 0);
        for _ in 0..5 {
            pool.give_back(Vec::with_capacity(64));
        }
        assert_eq!(pool.retained(), 2);
    }

    #[test]
    fn full_pool_drops_and_keeps_serving() {
        let pool = SegmentPool::new(1, 1024);
        pool.give_back(Vec::with_capacity(64));
        pool.give_back(Vec::with_capacity(512));
        assert_eq!(pool.retained(), 1);
        // the first buffer stayed, the second was dropped
        let buf = pool.rent(10);
        assert!(buf.capacity() >= 64 && buf.capacity() < 512);
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn concurrent_rent_and_return() {
        let pool = std::sync::Arc::new(SegmentPool::new(8, 4096));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = std::sync::Arc::clone(&pool);
                std::thread::spawn(move || {
                    for n in 0..200 {
                        let mut buf = pool.rent(64 + (i * n) % 300);
                        buf.push(Segment { offset: n, len: 1 });
                        pool.give_back(buf);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert!(pool.retained() <= 8);
    }
}
