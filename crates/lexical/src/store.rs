//! Surviving segments of one normalization call.
//!
//! Segments are recorded back to front (rightmost survivor first) because
//! the reducer scans right to left. The first [`INLINE_SEGMENTS`] live in a
//! fixed array; past that the store rents a buffer from a
//! [`SegmentPool`] and keeps doubling it, handing every outgrown buffer back
//! immediately. Whatever buffer is held at the end goes back to the pool in
//! `Drop`, so release happens exactly once on every exit path.

use std::ops::Range;

use crate::pool::SegmentPool;

/// Segments held without touching the pool.
pub const INLINE_SEGMENTS: usize = 16;

/// One retained run of literal path text: `body[offset..offset + len]`.
///
/// A run is never "." or "..". It may span several components joined by
/// single separators when they survive verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Segment {
    pub offset: usize,
    pub len: usize,
}

impl Segment {
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Inline-then-pooled segment list. See the module docs.
pub struct SegmentStore<'p> {
    inline: [Segment; INLINE_SEGMENTS],
    inline_len: usize,
    spill: Option<Vec<Segment>>,
    pool: &'p SegmentPool,
    text_len: usize,
}

impl<'p> SegmentStore<'p> {
    /// Empty store drawing spill buffers from `pool`.
    pub fn new(pool: &'p SegmentPool) -> Self {
        Self {
            inline: [Segment::default(); INLINE_SEGMENTS],
            inline_len: 0,
            spill: None,
            pool,
            text_len: 0,
        }
    }

    /// Records `segment`, which must lie to the left of everything recorded
    /// so far.
    ///
    /// When exactly one separator sits between `segment` and the previously
    /// recorded run, the two are coalesced into a single run; the output
    /// text is the same either way.
    pub fn push(&mut self, segment: Segment) {
        debug_assert!(segment.len > 0, "empty segment");
        if let Some(last) = self.last_mut() {
            debug_assert!(segment.end() < last.offset, "segments out of order");
            if segment.end() + 1 == last.offset {
                last.len += segment.len + 1;
                last.offset = segment.offset;
                self.text_len += segment.len + 1;
                return;
            }
        }
        self.text_len += segment.len;

        if let Some(spill) = self.spill.as_mut() {
            if spill.len() == spill.capacity() {
                let mut grown = self.pool.rent(spill.capacity() * 2);
                grown.extend_from_slice(spill);
                let outgrown = std::mem::replace(spill, grown);
                self.pool.give_back(outgrown);
            }
            spill.push(segment);
        } else if self.inline_len < INLINE_SEGMENTS {
            self.inline[self.inline_len] = segment;
            self.inline_len += 1;
        } else {
            let mut spill = self.pool.rent(INLINE_SEGMENTS * 2);
            spill.extend_from_slice(&self.inline);
            spill.push(segment);
            self.spill = Some(spill);
        }
    }

    fn last_mut(&mut self) -> Option<&mut Segment> {
        match self.spill.as_mut() {
            Some(spill) => spill.last_mut(),
            None => self.inline[..self.inline_len].last_mut(),
        }
    }

    /// Recorded runs in recording order (rightmost first).
    pub fn as_slice(&self) -> &[Segment] {
        match &self.spill {
            Some(spill) => spill,
            None => &self.inline[..self.inline_len],
        }
    }

    /// Recorded runs in text order (leftmost first).
    pub fn iter_forward(&self) -> impl Iterator<Item = &Segment> {
        self.as_slice().iter().rev()
    }

    /// Number of runs.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total characters covered by all runs.
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Whether the store has moved to a pooled buffer.
    pub fn spilled(&self) -> bool {
        self.spill.is_some()
    }
}

impl Drop for SegmentStore<'_> {
    fn drop(&mut self) {
        if let Some(spill) = self.spill.take() {
            self.pool.give_back(spill);
        }
    }
}

impl std::fmt::Debug for SegmentStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentStore")
            .field("segments", &self.as_slice())
            .field("text_len", &self.text_len)
            .field("spilled", &self.spilled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(offset: usize, len: usize) -> Segment {
        Segment { offset, len }
    }

    #[test]
    fn inline_push_and_order() {
        let pool = SegmentPool::new(4, 1024);
        let mut store = SegmentStore::new(&pool);
        store.push(seg(10, 2));
        store.push(seg(5, 2));
        store.push(seg(0, 3));
        assert_eq!(store.as_slice(), &[seg(10, 2), seg(5, 2), seg(0, 3)]);
        let forward: Vec<_> = store.iter_forward().copied().collect();
        assert_eq!(forward, vec![seg(0, 3), seg(5, 2), seg(10, 2)]);
        assert_eq!(store.text_len(), 7);
        assert!(!store.spilled());

        let text = "abc//de///fg";
        let pieces: Vec<_> = store.iter_forward().map(|s| &text[s.range()]).collect();
        assert_eq!(pieces, vec!["abc", "de", "fg"]);
    }

    #[test]
    fn adjacent_runs_coalesce() {
        let pool = SegmentPool::new(4, 1024);
        let mut store = SegmentStore::new(&pool);
        // "ab/cd" pushed right to left
        store.push(seg(3, 2));
        store.push(seg(0, 2));
        assert_eq!(store.as_slice(), &[seg(0, 5)]);
        assert_eq!(store.text_len(), 5);
    }

    #[test]
    fn spills_into_pool_and_returns_on_drop() {
        let pool = SegmentPool::new(4, 1 << 16);
        {
            let mut store = SegmentStore::new(&pool);
            let count = INLINE_SEGMENTS * 10;
            for i in (0..count).rev() {
                store.push(seg(i * 3, 1));
            }
            assert!(store.spilled());
            assert_eq!(store.len(), count);
            assert_eq!(store.as_slice()[0], seg((count - 1) * 3, 1));
            assert_eq!(store.as_slice()[count - 1], seg(0, 1));
            assert_eq!(store.text_len(), count);
        }
        // Outgrown buffers plus the final one all came back.
        assert!(pool.retained() >= 1);
    }

    #[test]
    fn release_happens_on_unwind() {
        let pool = SegmentPool::new(4, 1 << 16);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut store = SegmentStore::new(&pool);
            for i in (0..INLINE_SEGMENTS * 2).rev() {
                store.push(seg(i * 3, 1));
            }
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(pool.retained(), 1);
    }
}
