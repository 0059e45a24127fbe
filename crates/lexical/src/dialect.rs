//! Separator grammar for the two supported path dialects.

use serde::{Deserialize, Serialize};

/// Path syntax in effect for a normalization call.
///
/// The dialect decides which code units are separators, which separator is
/// written to the output, and whether Windows root prefixes (drive letters,
/// UNC shares, device paths) are recognized.
///
/// ```rust
/// use lexical::Dialect;
///
/// assert!(Dialect::Unix.is_separator(b'/'));
/// assert!(!Dialect::Unix.is_separator(b'\\'));
/// assert!(Dialect::Windows.is_separator(b'/'));
/// assert_eq!(Dialect::Windows.separator(), b'\\');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// POSIX syntax: `/` is the only separator.
    #[default]
    Unix,
    /// Win32 syntax: `\` is canonical, `/` is accepted and rewritten.
    Windows,
}

impl Dialect {
    /// Dialect of the platform this crate was compiled for.
    pub const fn native() -> Self {
        if cfg!(windows) {
            Dialect::Windows
        } else {
            Dialect::Unix
        }
    }

    /// Separator written to normalized output.
    #[inline]
    pub const fn separator(self) -> u8 {
        match self {
            Dialect::Unix => b'/',
            Dialect::Windows => b'\\',
        }
    }

    /// Accepted separator that is not canonical, if the dialect has one.
    #[inline]
    pub const fn alt_separator(self) -> Option<u8> {
        match self {
            Dialect::Unix => None,
            Dialect::Windows => Some(b'/'),
        }
    }

    /// Is this code unit a separator for the dialect?
    #[inline]
    pub const fn is_separator(self, b: u8) -> bool {
        match self {
            Dialect::Unix => b == b'/',
            Dialect::Windows => b == b'/' || b == b'\\',
        }
    }

    /// Is this code unit the non-canonical separator?
    #[inline]
    pub(crate) const fn is_alt_separator(self, b: u8) -> bool {
        matches!(self, Dialect::Windows) && b == b'/'
    }

    #[inline]
    pub(crate) fn is_separator_char(self, c: char) -> bool {
        c.is_ascii() && self.is_separator(c as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_per_dialect() {
        assert_eq!(Dialect::Unix.separator(), b'/');
        assert_eq!(Dialect::Unix.alt_separator(), None);
        assert_eq!(Dialect::Windows.alt_separator(), Some(b'/'));
        assert!(Dialect::Windows.is_separator(b'\\'));
        assert!(Dialect::Windows.is_alt_separator(b'/'));
        assert!(!Dialect::Unix.is_alt_separator(b'/'));
    }

    #[test]
    fn native_matches_target() {
        let expected = if cfg!(windows) {
            Dialect::Windows
        } else {
            Dialect::Unix
        };
        assert_eq!(Dialect::native(), expected);
        assert!(Dialect::native().is_separator(b'/'));
    }

    #[test]
    fn serde_names_are_lowercase() {
        let json = serde_json::to_string(&Dialect::Windows).expect("serialize");
        assert_eq!(json, "\"windows\"");
        let back: Dialect = serde_json::from_str("\"unix\"").expect("deserialize");
        assert_eq!(back, Dialect::Unix);
    }
}
