//! Umbrella crate for lexical path normalization.
//!
//! This crate re-exports the normalization engine from `pathnorm-lexical`
//! and adds what applications usually want on top of it: loading the
//! dialect and tuning from a YAML/JSON file, and normalizing many paths in
//! one call.
//!
//! ```rust
//! use pathnorm::{normalize_path, Dialect};
//!
//! assert_eq!(normalize_path(Some("/srv/www/../data/./x"), Dialect::Unix), "/srv/data/x");
//! ```

mod config;

pub use crate::config::{ConfigLoadError, PathnormConfig};
pub use lexical::{
    BatchWidth, ClassifierKind, ConfigError, Dialect, MAX_SCALAR_THRESHOLD, NormalizeConfig,
    Normalizer, PathPlan, PrefixKind, ScanStrategy, normalize_path,
};

use std::borrow::Cow;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Normalizes every path in `paths` with one [`Normalizer`] built from
/// `config`.
///
/// Output order matches input order. Paths that are already normal are
/// borrowed from the input. With the `parallel` feature the work is spread
/// over rayon's global pool; results are identical either way.
pub fn normalize_all<'a>(
    paths: &[&'a str],
    config: &NormalizeConfig,
) -> Result<Vec<Cow<'a, str>>, ConfigError> {
    let normalizer = Normalizer::new(config.clone())?;
    Ok(normalize_with(&normalizer, paths))
}

/// Like [`normalize_all`], reusing an existing normalizer.
pub fn normalize_with<'a>(normalizer: &Normalizer, paths: &[&'a str]) -> Vec<Cow<'a, str>> {
    #[cfg(feature = "parallel")]
    {
        paths.par_iter().map(|p| normalizer.normalize(*p)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        paths.iter().map(|p| normalizer.normalize(*p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_preserves_order() {
        let paths = ["/a/./b", "x/../y", "C:/keep", "../up"];
        let out = normalize_all(&paths, &NormalizeConfig::default()).expect("valid config");
        assert_eq!(out, vec!["/a/b", "y", "C:/keep", "../up"]);
    }

    #[test]
    fn bulk_borrows_clean_paths() {
        let paths = ["/already/clean", "needs/./work"];
        let out = normalize_all(&paths, &NormalizeConfig::default()).expect("valid config");
        assert!(matches!(out[0], Cow::Borrowed(s) if s.as_ptr() == paths[0].as_ptr()));
        assert!(matches!(out[1], Cow::Owned(_)));
    }

    #[test]
    fn bulk_rejects_invalid_config() {
        let cfg = NormalizeConfig {
            scalar_threshold: MAX_SCALAR_THRESHOLD + 1,
            ..Default::default()
        };
        assert!(normalize_all(&["a"], &cfg).is_err());
    }

    #[test]
    fn bulk_windows() {
        let cfg = NormalizeConfig::for_dialect(Dialect::Windows);
        let paths = [r"C:\a\..\b", "//srv/share/x/./y", r"\\?\C:\a\.."];
        let out = normalize_all(&paths, &cfg).expect("valid config");
        assert_eq!(out, vec![r"C:\b", r"\\srv\share\x\y", r"\\?\C:\a\.."]);
    }
}
