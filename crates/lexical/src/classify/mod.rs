//! Character classification into per-window bitmasks.
//!
//! A window is up to 64 bytes of path body. Bit `i` of each mask describes
//! byte `i` of the window, so the most significant set bit is the rightmost
//! interesting character. The batch reducer walks windows right to left and
//! bits from most to least significant.
//!
//! Two interchangeable [`Classifier`]s exist: [`ScalarClassifier`] looks at
//! one byte at a time, [`VectorClassifier`] uses SSE2/AVX2 compare+movemask
//! on x86_64. They are bit-identical on every input.
//!
//! The redundancy masks ("." component, ".." component, duplicate
//! separator, trailing dot) are derived purely bitwise from the raw masks
//! plus a handful of neighbor bits from outside the window, see
//! [`WindowContext`].

mod simd;

pub use simd::{SimdLevel, VectorClassifier};

use crate::dialect::Dialect;

/// Maximum window length accepted by [`Classifier::classify`].
pub const MAX_WINDOW: usize = 64;

/// Raw classification of one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Masks {
    /// Bit set where the byte is a separator of the dialect.
    pub separator: u64,
    /// Bit set where the byte is `.`.
    pub dot: u64,
    /// Bit set where the byte is the dialect's non-canonical separator.
    /// Always zero for [`Dialect::Unix`].
    pub alt_separator: u64,
}

/// Turns a window of path bytes into [`Masks`].
pub trait Classifier {
    /// Classifies `window` (at most [`MAX_WINDOW`] bytes). Bits at and above
    /// `window.len()` are zero.
    fn classify(&self, window: &[u8], dialect: Dialect) -> Masks;
}

/// Byte-at-a-time reference classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarClassifier;

impl Classifier for ScalarClassifier {
    fn classify(&self, window: &[u8], dialect: Dialect) -> Masks {
        debug_assert!(window.len() <= MAX_WINDOW);
        classify_scalar_at(window, dialect, 0)
    }
}

/// Scalar classification of `bytes`, shifted so `bytes[0]` lands on bit
/// `offset`. Used directly for the tails the vector paths leave over.
#[inline]
pub(crate) fn classify_scalar_at(bytes: &[u8], dialect: Dialect, offset: usize) -> Masks {
    let mut masks = Masks::default();
    for (i, &b) in bytes.iter().enumerate() {
        let bit = 1u64 << (offset + i);
        if dialect.is_separator(b) {
            masks.separator |= bit;
            if dialect.is_alt_separator(b) {
                masks.alt_separator |= bit;
            }
        } else if b == b'.' {
            masks.dot |= bit;
        }
    }
    masks
}

/// Classifier picked at runtime from a [`ClassifierKind`](crate::ClassifierKind).
#[derive(Debug, Clone, Copy)]
pub enum SelectedClassifier {
    Scalar(ScalarClassifier),
    Vector(VectorClassifier),
}

impl SelectedClassifier {
    pub fn from_kind(kind: crate::ClassifierKind) -> Self {
        match kind {
            crate::ClassifierKind::Scalar => SelectedClassifier::Scalar(ScalarClassifier),
            crate::ClassifierKind::Auto => match VectorClassifier::detect() {
                Some(vector) => SelectedClassifier::Vector(vector),
                None => SelectedClassifier::Scalar(ScalarClassifier),
            },
        }
    }
}

impl Classifier for SelectedClassifier {
    #[inline]
    fn classify(&self, window: &[u8], dialect: Dialect) -> Masks {
        match self {
            SelectedClassifier::Scalar(c) => c.classify(window, dialect),
            SelectedClassifier::Vector(c) => c.classify(window, dialect),
        }
    }
}

/// Neighbor facts about the bytes just outside a window.
///
/// Positions before the body start and after the body end count as
/// boundaries, so a "." at the very front or back of the body is still
/// recognized as an isolated component.
#[derive(Debug, Clone, Copy)]
pub struct WindowContext {
    /// Number of valid bits in the window.
    pub len: usize,
    /// Boundary at `base - 2`.
    pub boundary_before2: bool,
    /// Boundary at `base - 1`.
    pub boundary_before: bool,
    /// Real separator (not the virtual body start) at `base - 1`.
    pub separator_before: bool,
    /// `.` at `base - 1`.
    pub dot_before: bool,
    /// Boundary at `end`.
    pub boundary_after: bool,
    /// Boundary at `end + 1`.
    pub boundary_after2: bool,
    /// `.` at `end`.
    pub dot_after: bool,
}

impl WindowContext {
    /// Context for the window `body[base..end]`.
    pub fn new(body: &[u8], base: usize, end: usize, dialect: Dialect) -> Self {
        let boundary = |pos: Option<usize>| match pos {
            Some(p) if p < body.len() => dialect.is_separator(body[p]),
            _ => true,
        };
        let dot = |pos: Option<usize>| matches!(pos, Some(p) if p < body.len() && body[p] == b'.');
        let before = base.checked_sub(1);
        let before2 = base.checked_sub(2);
        Self {
            len: end - base,
            boundary_before2: boundary(before2),
            boundary_before: boundary(before),
            separator_before: matches!(before, Some(p) if dialect.is_separator(body[p])),
            dot_before: dot(before),
            boundary_after: boundary(Some(end)),
            boundary_after2: boundary(Some(end + 1)),
            dot_after: dot(Some(end)),
        }
    }
}

/// Redundant constructs found in one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redundancy {
    /// Isolated "." component.
    pub current: u64,
    /// First dot of an isolated ".." component.
    pub parent: u64,
    /// Second dot of an isolated ".." component.
    pub parent_tail: u64,
    /// Separator whose left neighbor is also a separator.
    pub duplicate: u64,
    /// Dot immediately followed by a boundary.
    pub trailing_dot: u64,
}

impl Redundancy {
    /// Anything that forbids copying the window through verbatim.
    #[inline]
    pub fn any(&self, trailing_dots_matter: bool) -> bool {
        let mut m = self.current | self.parent | self.parent_tail | self.duplicate;
        if trailing_dots_matter {
            m |= self.trailing_dot;
        }
        m != 0
    }
}

#[inline]
const fn low_bits(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

#[inline]
const fn flag(set: bool, bit: usize) -> u64 {
    if set && bit < 64 {
        1u64 << bit
    } else {
        0
    }
}

impl Masks {
    /// Derives the redundancy masks for this window.
    pub fn redundancy(&self, ctx: &WindowContext) -> Redundancy {
        let n = ctx.len;
        if n == 0 {
            return Redundancy::default();
        }
        let valid = low_bits(n);
        let sep = self.separator;
        let dot = self.dot;

        // boundary at i-1 / i+1 / i+2 / i-2
        let left = ((sep << 1) | flag(ctx.boundary_before, 0)) & valid;
        let right = ((sep >> 1) | flag(ctx.boundary_after, n - 1)) & valid;
        let right2 = {
            let mut m = sep >> 2;
            if n >= 2 {
                m |= flag(ctx.boundary_after, n - 2);
            }
            (m | flag(ctx.boundary_after2, n - 1)) & valid
        };
        let left2 = ((sep << 2) | flag(ctx.boundary_before2, 0) | flag(ctx.boundary_before, 1))
            & valid;

        // dot at i+1 / i-1
        let dot_next = ((dot >> 1) | flag(ctx.dot_after, n - 1)) & valid;
        let dot_prev = ((dot << 1) | flag(ctx.dot_before, 0)) & valid;

        Redundancy {
            current: dot & left & right,
            parent: dot & dot_next & left & right2,
            parent_tail: dot & dot_prev & left2 & right,
            duplicate: sep & ((sep << 1) | flag(ctx.separator_before, 0)) & valid,
            trailing_dot: dot & right,
        }
    }
}
