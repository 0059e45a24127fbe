//! Lexical path normalization for Unix and Windows paths.
//!
//! This crate rewrites a path string into its shortest equivalent form
//! without touching the filesystem. "." components disappear, ".." cancels
//! the component before it, duplicate separators collapse, and Windows roots
//! (drive letters, UNC shares, device paths) are recognized and preserved.
//!
//! ## What we do
//!
//! - Scan the path body right to left so every ".." is known before the
//!   component it cancels is reached
//! - Compute the exact output length first, then allocate once
//! - Return the input itself (`Cow::Borrowed`) when it is already normal
//! - Classify long bodies 32 or 64 characters at a time into bitmasks
//!   (SSE2/AVX2 where available) and skip clean windows in O(1)
//!
//! ## Pure function guarantee
//!
//! No I/O, no symlink resolution, no case folding. The result depends only
//! on the text and the dialect, never on the tuning knobs or the host.
//!
//! ## Invariants worth knowing
//!
//! - `normalize(normalize(p)) == normalize(p)` for a fixed dialect
//! - Output is never longer than the input
//! - Rooted paths cannot climb above their root: `/../a` is `/a`
//! - Relative paths keep surplus "..": `a/../../b` is `../b`
//! - `\\?\` and `\??\` paths are returned unchanged
//!
//! ```rust
//! use lexical::{normalize_path, Dialect};
//!
//! assert_eq!(normalize_path(Some("a/../../b"), Dialect::Unix), "../b");
//! assert_eq!(normalize_path(Some(r"C:\a\..\b"), Dialect::Windows), r"C:\b");
//! ```

mod classify;
mod config;
mod dialect;
mod error;
mod normalize;
mod pool;
mod prefix;
mod reduce;
mod store;
mod writer;

pub use crate::classify::{
    Classifier, Masks, Redundancy, ScalarClassifier, SimdLevel, VectorClassifier, WindowContext,
    MAX_WINDOW,
};
pub use crate::config::{BatchWidth, ClassifierKind, NormalizeConfig, MAX_SCALAR_THRESHOLD};
pub use crate::dialect::Dialect;
pub use crate::error::ConfigError;
pub use crate::normalize::{normalize_path, Normalizer, PathPlan, ScanStrategy};
pub use crate::pool::{SegmentPool, MAX_RETAINED_BUFFERS, MAX_RETAINED_CAPACITY};
pub use crate::prefix::PrefixKind;
pub use crate::store::{Segment, SegmentStore, INLINE_SEGMENTS};
