use std::borrow::Cow;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::classify::SelectedClassifier;
use crate::config::{BatchWidth, NormalizeConfig};
use crate::dialect::Dialect;
use crate::error::ConfigError;
use crate::pool::SegmentPool;
use crate::prefix::{self, PrefixKind, TrailingDots, WindowsRoot};
use crate::reduce::batch::reduce_batch;
use crate::reduce::scalar::reduce_scalar;
use crate::reduce::{Body, Reduction};
use crate::store::SegmentStore;
use crate::writer::write_normalized;

static UNIX: Lazy<Normalizer> =
    Lazy::new(|| Normalizer::from_valid(NormalizeConfig::for_dialect(Dialect::Unix)));
static WINDOWS: Lazy<Normalizer> =
    Lazy::new(|| Normalizer::from_valid(NormalizeConfig::for_dialect(Dialect::Windows)));

/// Normalizes `text` with the default tuning for `dialect`.
///
/// An absent input yields `""`. When the path is already normal the result
/// borrows the caller's string, so `Cow::Borrowed` with the same pointer is
/// the "unchanged" answer; otherwise the result is a freshly allocated
/// string of exactly the output length.
///
/// ```rust
/// use std::borrow::Cow;
/// use lexical::{normalize_path, Dialect};
///
/// assert_eq!(normalize_path(Some("/home/../user"), Dialect::Unix), "/user");
/// assert_eq!(normalize_path(Some(r"C:\a\.\b"), Dialect::Windows), r"C:\a\b");
/// assert_eq!(normalize_path(None, Dialect::Unix), "");
///
/// let clean = "/usr/local/bin";
/// assert!(matches!(normalize_path(Some(clean), Dialect::Unix), Cow::Borrowed(s) if s.as_ptr() == clean.as_ptr()));
/// ```
pub fn normalize_path(text: Option<&str>, dialect: Dialect) -> Cow<'_, str> {
    match text {
        Some(text) => Normalizer::default_for(dialect).normalize(text),
        None => Cow::Borrowed(""),
    }
}

/// How a body is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// Character-at-a-time automaton.
    Scalar,
    /// One classified batch covers the whole body.
    SingleWord,
    /// Batches walked right to left, skipping clean ones.
    MultiWord,
}

/// Everything the normalizer decided about a path, without the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPlan {
    /// Root classification (always [`PrefixKind::None`] for Unix).
    pub prefix: PrefixKind,
    /// Drive letter of a `X:` root.
    pub drive: Option<char>,
    /// Bytes of input copied as the root prefix.
    pub prefix_len: usize,
    /// A separator follows the prefix.
    pub rooted: bool,
    /// The output ends with a separator.
    pub trailing_separator: bool,
    /// ".." components left over after cancellation. Absorbed when rooted.
    pub parents: usize,
    /// A leading "." survives. Ignored when rooted or when `parents > 0`.
    pub leading_current: bool,
    /// Verbatim runs of the input that make up the output body.
    pub runs: usize,
    /// Engine used for the body.
    pub strategy: ScanStrategy,
    /// Separators must be rewritten even if nothing else changes.
    pub rewrite_separators: bool,
    /// Exact length of the normalized text.
    pub output_len: usize,
}

impl PathPlan {
    /// Whether normalizing returns the input unchanged.
    pub fn is_identity(&self, input_len: usize) -> bool {
        !self.rewrite_separators && self.output_len >= input_len
    }
}

/// Result of reducing one input, shared by `normalize` and `plan`.
struct Analysis<'t> {
    root: WindowsRoot,
    body: Body<'t>,
    reduction: Reduction<'static>,
    strategy: ScanStrategy,
    rewrite_separators: bool,
    output_len: usize,
}

/// Lexical path normalizer.
///
/// Holds validated configuration and the selected classifier; reuse one
/// instance across calls and threads.
///
/// ```rust
/// use lexical::{Dialect, NormalizeConfig, Normalizer};
///
/// let normalizer = Normalizer::new(NormalizeConfig::for_dialect(Dialect::Windows))?;
/// assert_eq!(normalizer.normalize(r"\\Server\Share\a\..\"), r"\\Server\Share\");
/// assert_eq!(normalizer.normalize("C:/temp/./x"), r"C:\temp\x");
/// # Ok::<(), lexical::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizeConfig,
    classifier: SelectedClassifier,
    pool: &'static SegmentPool,
}

impl Normalizer {
    /// Validates `config` and picks the classifier.
    pub fn new(config: NormalizeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: NormalizeConfig) -> Self {
        Self {
            classifier: SelectedClassifier::from_kind(config.classifier),
            config,
            pool: SegmentPool::global(),
        }
    }

    /// Shared normalizer with default tuning.
    pub fn default_for(dialect: Dialect) -> &'static Normalizer {
        match dialect {
            Dialect::Unix => Lazy::force(&UNIX),
            Dialect::Windows => Lazy::force(&WINDOWS),
        }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// Engine used for a body of `body_len` bytes.
    pub fn strategy_for(&self, body_len: usize) -> ScanStrategy {
        if body_len < self.config.scalar_threshold {
            ScanStrategy::Scalar
        } else if body_len <= self.config.batch_width.bits() {
            ScanStrategy::SingleWord
        } else {
            ScanStrategy::MultiWord
        }
    }

    /// Normalizes `text`. Borrows it when nothing changes.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let dialect = self.config.dialect;
        if text.len() <= 2 {
            return short_form(text, dialect);
        }
        let Some(analysis) = self.analyze(text) else {
            trace!(dialect = ?dialect, input_len = text.len(), "device_path_passthrough");
            return Cow::Borrowed(text);
        };

        let len = analysis.output_len;
        if len == 0 {
            return Cow::Borrowed("");
        }
        if len >= text.len() && !analysis.rewrite_separators {
            return Cow::Borrowed(text);
        }

        let out = write_normalized(
            text,
            analysis.root.len,
            &analysis.body,
            &analysis.reduction,
            dialect,
            len,
        );
        trace!(
            dialect = ?dialect,
            input_len = text.len(),
            output_len = len,
            strategy = ?analysis.strategy,
            "path_normalized"
        );
        Cow::Owned(out)
    }

    /// Describes how `text` would be normalized.
    ///
    /// Returns `None` when no reduction takes place: inputs of two bytes or
    /// fewer are answered from a fixed table, and `\\?\` / `\??\` paths are
    /// passed through.
    pub fn plan(&self, text: &str) -> Option<PathPlan> {
        if text.len() <= 2 {
            return None;
        }
        let analysis = self.analyze(text)?;
        let items = analysis.reduction.items(analysis.body.rooted);
        Some(PathPlan {
            prefix: analysis.root.kind,
            drive: analysis.root.drive.map(char::from),
            prefix_len: analysis.root.len,
            rooted: analysis.body.rooted,
            trailing_separator: analysis.body.trailing_separator && items.count > 0,
            parents: analysis.reduction.parents(),
            leading_current: analysis.reduction.leading_current(),
            runs: analysis.reduction.store().len(),
            strategy: analysis.strategy,
            rewrite_separators: analysis.rewrite_separators,
            output_len: analysis.output_len,
        })
    }

    fn analyze<'t>(&self, text: &'t str) -> Option<Analysis<'t>> {
        let dialect = self.config.dialect;
        let bytes = text.as_bytes();
        let root = match dialect {
            Dialect::Unix => WindowsRoot {
                kind: PrefixKind::None,
                drive: None,
                len: 0,
            },
            Dialect::Windows => prefix::resolve(bytes),
        };
        if root.is_pass_through() {
            return None;
        }

        let body = Body::split(&bytes[root.len..], root.len, dialect);
        let strategy = self.strategy_for(body.text.len());
        let trailing_dots = match dialect {
            Dialect::Unix => TrailingDots::Preserve,
            Dialect::Windows => root.trailing_dots(),
        };
        let mut reduction = Reduction::new(SegmentStore::new(self.pool), dialect, trailing_dots);
        match (strategy, self.config.batch_width) {
            (ScanStrategy::Scalar, _) => reduce_scalar(body.text, dialect, &mut reduction),
            (_, BatchWidth::W32) => {
                reduce_batch::<32, _>(body.text, dialect, &self.classifier, &mut reduction)
            }
            (_, BatchWidth::W64) => {
                reduce_batch::<64, _>(body.text, dialect, &self.classifier, &mut reduction)
            }
        }

        let rewrite_separators = dialect == Dialect::Windows
            && (bytes[..root.len].contains(&b'/') || body.edge_alt || reduction.alt_seen());
        let output_len = root.len + reduction.output_len(&body);
        Some(Analysis {
            root,
            body,
            reduction,
            strategy,
            rewrite_separators,
            output_len,
        })
    }
}

/// Fixed answers for inputs of at most two bytes.
fn short_form(text: &str, dialect: Dialect) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    match dialect {
        Dialect::Unix => match bytes {
            b"//" | b"/." => Cow::Borrowed("/"),
            _ => Cow::Borrowed(text),
        },
        Dialect::Windows => match bytes {
            [sep, b'.'] if dialect.is_separator(*sep) => Cow::Borrowed("\\"),
            [name, b'.'] if *name != b'.' => Cow::Borrowed(&text[..1]),
            _ if bytes.contains(&b'/') => Cow::Owned(text.replace('/', "\\")),
            _ => Cow::Borrowed(text),
        },
    }
}
