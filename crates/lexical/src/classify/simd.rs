//! Vectorized classifier: compare each lane against the separator and dot
//! bytes, then pack the comparison results into bitmasks with movemask.
//!
//! x86_64 only. SSE2 is part of the x86_64 baseline, AVX2 is detected at
//! runtime. Tails shorter than one vector fall back to the scalar loop, so
//! results are bit-identical with [`ScalarClassifier`](super::ScalarClassifier).

use super::{classify_scalar_at, Classifier, Masks, MAX_WINDOW};
use crate::dialect::Dialect;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Instruction set tier used by [`VectorClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    /// 16 lanes per compare.
    Sse2,
    /// 32 lanes per compare.
    Avx2,
}

/// Compare+pack classifier. Construct with [`VectorClassifier::detect`].
#[derive(Debug, Clone, Copy)]
pub struct VectorClassifier {
    level: SimdLevel,
}

impl VectorClassifier {
    /// Picks the widest supported tier, or `None` when the target has no
    /// vector path.
    pub fn detect() -> Option<Self> {
        #[cfg(target_arch = "x86_64")]
        {
            let level = if std::is_x86_feature_detected!("avx2") {
                SimdLevel::Avx2
            } else {
                SimdLevel::Sse2
            };
            Some(Self { level })
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            None
        }
    }

    /// Tier selected at detection time.
    pub fn level(&self) -> SimdLevel {
        self.level
    }
}

impl Classifier for VectorClassifier {
    fn classify(&self, window: &[u8], dialect: Dialect) -> Masks {
        debug_assert!(window.len() <= MAX_WINDOW);
        #[cfg(target_arch = "x86_64")]
        {
            match self.level {
                // SAFETY: AVX2 support was verified in `detect`.
                SimdLevel::Avx2 => unsafe { classify_avx2(window, dialect) },
                // SAFETY: SSE2 is always available on x86_64.
                SimdLevel::Sse2 => unsafe { classify_sse2(window, dialect) },
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            classify_scalar_at(window, dialect, 0)
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn merge(into: &mut Masks, part: Masks) {
    into.separator |= part.separator;
    into.dot |= part.dot;
    into.alt_separator |= part.alt_separator;
}

/// Classifies full 16-byte chunks starting at `start`; returns the masks
/// and the offset of the first unprocessed byte.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn sse2_chunks(window: &[u8], dialect: Dialect, start: usize) -> (Masks, usize) {
    let mut masks = Masks::default();
    let mut offset = start;
    unsafe {
        let slash = _mm_set1_epi8(b'/' as i8);
        let backslash = _mm_set1_epi8(b'\\' as i8);
        let dot = _mm_set1_epi8(b'.' as i8);
        while offset + 16 <= window.len() {
            let chunk = _mm_loadu_si128(window.as_ptr().add(offset) as *const __m128i);
            let slash_bits = _mm_movemask_epi8(_mm_cmpeq_epi8(chunk, slash)) as u16 as u64;
            let dot_bits = _mm_movemask_epi8(_mm_cmpeq_epi8(chunk, dot)) as u16 as u64;
            masks.dot |= dot_bits << offset;
            match dialect {
                Dialect::Unix => masks.separator |= slash_bits << offset,
                Dialect::Windows => {
                    let back_bits =
                        _mm_movemask_epi8(_mm_cmpeq_epi8(chunk, backslash)) as u16 as u64;
                    masks.separator |= (slash_bits | back_bits) << offset;
                    masks.alt_separator |= slash_bits << offset;
                }
            }
            offset += 16;
        }
    }
    (masks, offset)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn classify_sse2(window: &[u8], dialect: Dialect) -> Masks {
    let (mut masks, offset) = unsafe { sse2_chunks(window, dialect, 0) };
    merge(
        &mut masks,
        classify_scalar_at(&window[offset..], dialect, offset),
    );
    masks
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn classify_avx2(window: &[u8], dialect: Dialect) -> Masks {
    let mut masks = Masks::default();
    let mut offset = 0;
    unsafe {
        let slash = _mm256_set1_epi8(b'/' as i8);
        let backslash = _mm256_set1_epi8(b'\\' as i8);
        let dot = _mm256_set1_epi8(b'.' as i8);
        while offset + 32 <= window.len() {
            let chunk = _mm256_loadu_si256(window.as_ptr().add(offset) as *const __m256i);
            let slash_bits = _mm256_movemask_epi8(_mm256_cmpeq_epi8(chunk, slash)) as u32 as u64;
            let dot_bits = _mm256_movemask_epi8(_mm256_cmpeq_epi8(chunk, dot)) as u32 as u64;
            masks.dot |= dot_bits << offset;
            match dialect {
                Dialect::Unix => masks.separator |= slash_bits << offset,
                Dialect::Windows => {
                    let back_bits =
                        _mm256_movemask_epi8(_mm256_cmpeq_epi8(chunk, backslash)) as u32 as u64;
                    masks.separator |= (slash_bits | back_bits) << offset;
                    masks.alt_separator |= slash_bits << offset;
                }
            }
            offset += 32;
        }
        // A 16..31 byte tail still gets one SSE2 pass.
        let (tail, next) = sse2_chunks(window, dialect, offset);
        merge(&mut masks, tail);
        offset = next;
    }
    merge(
        &mut masks,
        classify_scalar_at(&window[offset..], dialect, offset),
    );
    masks
}
