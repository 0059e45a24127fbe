//! Backward reduction of a path body into surviving segments.
//!
//! The body is the part of the input after any Windows root prefix, with
//! leading and trailing separators trimmed off (they only set the
//! `rooted`/`trailing_separator` flags). It is scanned right to left so a
//! ".." can cancel the segment to its left as soon as that segment is
//! closed: every ".." bumps `parents`, every closed segment either consumes
//! one pending parent or is recorded.
//!
//! Two engines fill the same [`Reduction`]:
//!
//! - [`scalar`]: a four-state automaton over single characters.
//! - [`batch`]: classifies 32/64-character windows into bitmasks, skips
//!   clean windows in O(1) and walks only the interesting bits of the rest.
//!
//! Both produce identical reductions for every body.

pub(crate) mod batch;
pub(crate) mod scalar;

use crate::dialect::Dialect;
use crate::prefix::TrailingDots;
use crate::store::{Segment, SegmentStore};

/// A body ready for reduction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Body<'a> {
    /// Trimmed text; never starts or ends with a separator.
    pub text: &'a [u8],
    /// Offset of `text` within the full input.
    pub offset: usize,
    /// At least one separator was trimmed from the front.
    pub rooted: bool,
    /// At least one separator was trimmed from the back of a non-empty body.
    pub trailing_separator: bool,
    /// A trimmed edge separator was the dialect's non-canonical one.
    pub edge_alt: bool,
}

impl<'a> Body<'a> {
    /// Trims `rest` (which starts at `offset` in the input).
    pub fn split(rest: &'a [u8], offset: usize, dialect: Dialect) -> Self {
        let lead = rest
            .iter()
            .take_while(|&&b| dialect.is_separator(b))
            .count();
        let inner = &rest[lead..];
        let trail = inner
            .iter()
            .rev()
            .take_while(|&&b| dialect.is_separator(b))
            .count();
        let text = &inner[..inner.len() - trail];
        let edge_alt = rest[..lead]
            .iter()
            .chain(&inner[inner.len() - trail..])
            .any(|&b| dialect.is_alt_separator(b));
        Self {
            text,
            offset: offset + lead,
            rooted: lead > 0,
            trailing_separator: trail > 0 && !text.is_empty(),
            edge_alt,
        }
    }
}

/// Accumulated result of scanning one body.
#[derive(Debug)]
pub(crate) struct Reduction<'p> {
    store: SegmentStore<'p>,
    parents: usize,
    leading_current: bool,
    alt_seen: bool,
    trailing_dots: TrailingDots,
    dialect: Dialect,
}

impl<'p> Reduction<'p> {
    pub fn new(store: SegmentStore<'p>, dialect: Dialect, trailing_dots: TrailingDots) -> Self {
        Self {
            store,
            parents: 0,
            leading_current: false,
            alt_seen: false,
            trailing_dots,
            dialect,
        }
    }

    /// Whether trailing dots are removed from segment names.
    #[inline]
    pub fn strips_trailing_dots(&self) -> bool {
        self.dialect == Dialect::Windows && self.trailing_dots == TrailingDots::Strip
    }

    /// A literal run `body[start..end]` has been closed.
    pub fn close_segment(&mut self, body: &[u8], start: usize, end: usize) {
        debug_assert!(start < end && end <= body.len());
        debug_assert!(
            !self.dialect.is_separator(body[start]) && !self.dialect.is_separator(body[end - 1]),
            "run has a separator on its edge"
        );
        if self.parents > 0 {
            self.parents -= 1;
            return;
        }
        let end = if self.strips_trailing_dots() {
            stripped_end(body, start, end, self.dialect)
        } else {
            end
        };
        self.store.push(Segment {
            offset: start,
            len: end - start,
        });
        self.leading_current = false;
    }

    /// A "." component has been closed.
    #[inline]
    pub fn close_current(&mut self) {
        if self.parents == 0 {
            self.leading_current = true;
        }
    }

    /// A ".." component has been closed.
    #[inline]
    pub fn close_parent(&mut self) {
        self.parents += 1;
    }

    #[inline]
    pub fn note_alt_separator(&mut self) {
        self.alt_seen = true;
    }

    #[inline]
    pub fn parents(&self) -> usize {
        self.parents
    }

    #[inline]
    pub fn leading_current(&self) -> bool {
        self.leading_current
    }

    #[inline]
    pub fn alt_seen(&self) -> bool {
        self.alt_seen
    }

    pub fn store(&self) -> &SegmentStore<'p> {
        &self.store
    }

    /// Items written after the root for a body with the given `rooted` flag.
    pub fn items(&self, rooted: bool) -> Items {
        let runs = self.store.len();
        let run_text = self.store.text_len();
        if rooted {
            Items {
                parents: 0,
                leading_current: false,
                count: runs,
                text_len: run_text,
            }
        } else if self.parents > 0 {
            Items {
                parents: self.parents,
                leading_current: false,
                count: self.parents + runs,
                text_len: 2 * self.parents + run_text,
            }
        } else if self.leading_current {
            Items {
                parents: 0,
                leading_current: true,
                count: 1 + runs,
                text_len: 1 + run_text,
            }
        } else {
            Items {
                parents: 0,
                leading_current: false,
                count: runs,
                text_len: run_text,
            }
        }
    }

    /// Exact length of the written body (root separator included, prefix
    /// excluded).
    pub fn output_len(&self, body: &Body<'_>) -> usize {
        let items = self.items(body.rooted);
        let rooted = usize::from(body.rooted);
        if items.count == 0 {
            return rooted;
        }
        rooted + items.text_len + (items.count - 1) + usize::from(body.trailing_separator)
    }
}

/// What follows the root separator, in output order: `parents` ".." items
/// or one "." item, then the recorded runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Items {
    pub parents: usize,
    pub leading_current: bool,
    pub count: usize,
    pub text_len: usize,
}

/// End of `body[start..end]` once trailing dots are removed. Names made of
/// dots only, and dots directly after a separator, stay.
fn stripped_end(body: &[u8], start: usize, end: usize, dialect: Dialect) -> usize {
    let span = &body[start..end];
    let dots = span.iter().rev().take_while(|&&b| b == b'.').count();
    if dots == 0 || dots == span.len() {
        return end;
    }
    if dialect.is_separator(span[span.len() - dots - 1]) {
        end
    } else {
        end - dots
    }
}
