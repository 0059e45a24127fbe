//! Windows root prefixes: drive letters, UNC shares and device paths.
//!
//! The first (at most eight) characters decide the [`PrefixKind`]. The
//! resolved root is copied to the output verbatim, apart from separators
//! being rewritten to `\`; only the text after it is reduced.
//!
//! | input                       | kind                       | root text             |
//! |-----------------------------|----------------------------|-----------------------|
//! | `\\?\C:\a`                  | `FullyQualifiedDevicePath` | whole path, untouched |
//! | `\??\C:\a`                  | `FullyQualifiedDevicePath` | whole path, untouched |
//! | `\\.\COM1\x`                | `DevicePathDot`            | `\\.\COM1`            |
//! | `//?/C:/x`                  | `DevicePathQuestion`       | `//?/C:`              |
//! | `\\.\UNC\srv\share\x`       | `DevicePathDotUnc`         | `\\.\UNC\srv\share`   |
//! | `\\?/unc/srv/share/x`       | `DevicePathQuestionUnc`    | `\\?/unc/srv/share`   |
//! | `\\srv\share\x`             | `Unc`                      | `\\srv\share`         |
//! | `C:\x`, `C:x`               | `None` (drive `C`)         | `C:`                  |
//! | `\x`, `x`, `\\\x`           | `None`                     | (empty)               |
//!
//! Device forms keep trailing dots on names; Win32 only trims them on
//! ordinary paths.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

const WIN: Dialect = Dialect::Windows;

/// Classification of a Windows path root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixKind {
    /// No special root (may still carry a drive letter).
    None,
    /// `\\server\share`.
    Unc,
    /// `\\.\device`.
    DevicePathDot,
    /// `\\?\device` written with at least one `/`.
    DevicePathQuestion,
    /// `\\.\UNC\server\share`.
    DevicePathDotUnc,
    /// `\\?\UNC\server\share` written with at least one `/`.
    DevicePathQuestionUnc,
    /// `\\?\` or `\??\` exactly; never normalized.
    FullyQualifiedDevicePath,
}

impl PrefixKind {
    /// Device namespace forms treat trailing dots as part of the name.
    pub fn is_device(self) -> bool {
        matches!(
            self,
            PrefixKind::DevicePathDot
                | PrefixKind::DevicePathQuestion
                | PrefixKind::DevicePathDotUnc
                | PrefixKind::DevicePathQuestionUnc
                | PrefixKind::FullyQualifiedDevicePath
        )
    }
}

/// Whether trailing dots on segment names are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingDots {
    Strip,
    Preserve,
}

/// A resolved Windows root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowsRoot {
    pub kind: PrefixKind,
    /// Drive letter, only for [`PrefixKind::None`].
    pub drive: Option<u8>,
    /// Bytes of the input that form the root text.
    pub len: usize,
}

impl WindowsRoot {
    /// Trailing-dot policy for the reducer.
    pub fn trailing_dots(&self) -> TrailingDots {
        if self.kind.is_device() {
            TrailingDots::Preserve
        } else {
            TrailingDots::Strip
        }
    }

    /// The input must be returned untouched.
    pub fn is_pass_through(&self) -> bool {
        self.kind == PrefixKind::FullyQualifiedDevicePath
    }
}

/// End (exclusive) of the segment that starts at `start`, delimited by
/// either separator.
pub fn segment_end(text: &[u8], start: usize) -> usize {
    text.get(start..)
        .and_then(|rest| rest.iter().position(|&b| WIN.is_separator(b)))
        .map_or(text.len(), |pos| start + pos)
}

/// `X:` at the very start.
pub fn drive_letter(text: &[u8]) -> Option<u8> {
    match text {
        [letter, b':', ..] if letter.is_ascii_alphabetic() => Some(*letter),
        _ => None,
    }
}

/// End of `server[\share]` starting at `start`. A share is only taken when
/// exactly one separator follows the server name.
fn server_share_end(text: &[u8], start: usize) -> usize {
    let server_end = segment_end(text, start);
    match text.get(server_end..server_end + 2) {
        Some(&[sep, next]) if WIN.is_separator(sep) && !WIN.is_separator(next) => {
            segment_end(text, server_end + 1)
        }
        _ => server_end,
    }
}

/// Classifies the root of a Windows path.
pub fn resolve(text: &[u8]) -> WindowsRoot {
    let sep = |i: usize| text.get(i).is_some_and(|&b| WIN.is_separator(b));
    let none = WindowsRoot {
        kind: PrefixKind::None,
        drive: None,
        len: 0,
    };

    if text.starts_with(br"\\?\") || text.starts_with(br"\??\") {
        return WindowsRoot {
            kind: PrefixKind::FullyQualifiedDevicePath,
            drive: None,
            len: text.len(),
        };
    }

    if sep(0) && sep(1) {
        let marker = text.get(2).copied();
        if matches!(marker, Some(b'.') | Some(b'?')) && sep(3) {
            let dot = marker == Some(b'.');
            let unc = text
                .get(4..7)
                .is_some_and(|name| name.eq_ignore_ascii_case(b"UNC"))
                && sep(7);
            let (kind, len) = match (dot, unc) {
                (true, true) => (PrefixKind::DevicePathDotUnc, server_share_end(text, 8)),
                (false, true) => (PrefixKind::DevicePathQuestionUnc, server_share_end(text, 8)),
                (true, false) => (PrefixKind::DevicePathDot, segment_end(text, 4)),
                (false, false) => (PrefixKind::DevicePathQuestion, segment_end(text, 4)),
            };
            return WindowsRoot {
                kind,
                drive: None,
                len,
            };
        }
        if text.len() > 2 && !sep(2) {
            return WindowsRoot {
                kind: PrefixKind::Unc,
                drive: None,
                len: server_share_end(text, 2),
            };
        }
        return none;
    }

    match drive_letter(text) {
        Some(letter) => WindowsRoot {
            kind: PrefixKind::None,
            drive: Some(letter),
            len: 2,
        },
        None => none,
    }
}
