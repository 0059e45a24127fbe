//! Emits the normalized text into an exactly-sized buffer.

use crate::dialect::Dialect;
use crate::reduce::{Body, Reduction};

/// Appends `text` with every separator replaced by the canonical one.
fn push_canonical(out: &mut String, text: &str, dialect: Dialect) {
    match dialect.alt_separator() {
        Some(alt) if text.as_bytes().contains(&alt) => {
            let canonical = char::from(dialect.separator());
            out.extend(
                text.chars()
                    .map(|c| if dialect.is_separator_char(c) { canonical } else { c }),
            );
        }
        _ => out.push_str(text),
    }
}

/// Writes `prefix`, the root separator, the leading items and every
/// recorded run of `body`, then the trailing separator.
///
/// `expected` is the length computed up front; running past it is a bug in
/// the length arithmetic and aborts.
pub(crate) fn write_normalized(
    input: &str,
    prefix_len: usize,
    body: &Body<'_>,
    red: &Reduction<'_>,
    dialect: Dialect,
    expected: usize,
) -> String {
    let sep = char::from(dialect.separator());
    let mut out = String::with_capacity(expected);

    push_canonical(&mut out, &input[..prefix_len], dialect);
    if body.rooted {
        out.push(sep);
    }

    let items = red.items(body.rooted);
    let mut first = true;
    let mut item = |out: &mut String, text: &str| {
        if !first {
            out.push(sep);
        }
        first = false;
        push_canonical(out, text, dialect);
        debug_assert!(out.len() <= expected, "writer overran computed length");
    };

    for _ in 0..items.parents {
        item(&mut out, "..");
    }
    if items.leading_current {
        item(&mut out, ".");
    }
    for run in red.store().iter_forward() {
        let start = body.offset + run.offset;
        item(&mut out, &input[start..start + run.len]);
    }

    if body.trailing_separator && items.count > 0 {
        out.push(sep);
    }

    assert_eq!(out.len(), expected, "normalized length mismatch");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SegmentPool;
    use crate::prefix::TrailingDots;
    use crate::reduce::scalar::reduce_scalar;
    use crate::store::SegmentStore;

    fn write(input: &str, prefix_len: usize, dialect: Dialect) -> String {
        let pool = SegmentPool::new(2, 1024);
        let body = Body::split(&input.as_bytes()[prefix_len..], prefix_len, dialect);
        let mut red = Reduction::new(SegmentStore::new(&pool), dialect, TrailingDots::Strip);
        reduce_scalar(body.text, dialect, &mut red);
        let len = prefix_len + red.output_len(&body);
        write_normalized(input, prefix_len, &body, &red, dialect, len)
    }

    #[test]
    fn writes_unix_forms() {
        assert_eq!(write("/a/./b/../c/", 0, Dialect::Unix), "/a/c/");
        assert_eq!(write("../../x", 0, Dialect::Unix), "../../x");
        assert_eq!(write("./x//y", 0, Dialect::Unix), "./x/y");
        assert_eq!(write("x/..", 0, Dialect::Unix), "");
        assert_eq!(write("///", 0, Dialect::Unix), "/");
    }

    #[test]
    fn windows_separators_are_rewritten() {
        assert_eq!(write("C:/a/b/", 2, Dialect::Windows), "C:\\a\\b\\");
        assert_eq!(write("//srv/sh/x/../y", 8, Dialect::Windows), "\\\\srv\\sh\\y");
    }
}
