//! Bit-parallel reducer.
//!
//! The body is cut into windows of `W` characters starting from the end.
//! Each window is classified into separator/dot masks, from which the
//! redundancy masks are derived without looking at characters again.
//!
//! A window with no redundancy at all, reached while no ".." is pending, is
//! skipped outright: its text survives verbatim, so the open run simply
//! keeps extending leftwards. Other windows are walked from the most
//! significant interesting bit down, closing a component at each separator,
//! "." or "..".
//!
//! When a walked window follows a skipped one whose first character is a
//! separator, the run that ended there is closed first, so a ".." further
//! left can never swallow a multi-component run. A skipped window whose
//! last character is a separator right before a closed component (or a
//! dropped "." / "..") moves the run end left of that separator, so no run
//! ever ends in one.

use super::Reduction;
use crate::classify::{Classifier, WindowContext, MAX_WINDOW};
use crate::dialect::Dialect;

/// Reduces `body` in windows of `W` characters.
pub(crate) fn reduce_batch<const W: usize, C: Classifier>(
    body: &[u8],
    dialect: Dialect,
    classifier: &C,
    red: &mut Reduction<'_>,
) {
    debug_assert!(W > 0 && W <= MAX_WINDOW);
    let strip = red.strips_trailing_dots();
    // Exclusive end of the component currently being extended leftwards.
    let mut seg_end = body.len();
    let mut end = body.len();
    let mut skipped_base: Option<usize> = None;

    while end > 0 {
        let base = end.saturating_sub(W);
        let masks = classifier.classify(&body[base..end], dialect);
        if masks.alt_separator != 0 {
            red.note_alt_separator();
        }
        let ctx = WindowContext::new(body, base, end, dialect);
        let redundancy = masks.redundancy(&ctx);

        if red.parents() == 0 && !redundancy.any(strip) {
            // A separator on the right edge with nothing open after it ends
            // the run here, otherwise the flush would keep it.
            if seg_end == end && dialect.is_separator(body[end - 1]) {
                seg_end = end - 1;
            }
            skipped_base = Some(base);
            end = base;
            continue;
        }

        if let Some(prev) = skipped_base.take() {
            if dialect.is_separator(body[prev]) {
                if prev + 1 < seg_end {
                    red.close_segment(body, prev + 1, seg_end);
                }
                seg_end = prev;
            }
        }

        let mut live = masks.separator | redundancy.current | redundancy.parent;
        while live != 0 {
            let bit = 63 - live.leading_zeros() as usize;
            let mask = 1u64 << bit;
            live &= !mask;
            let pos = base + bit;
            if masks.separator & mask != 0 {
                if pos + 1 < seg_end {
                    red.close_segment(body, pos + 1, seg_end);
                }
            } else if redundancy.current & mask != 0 {
                red.close_current();
            } else {
                red.close_parent();
            }
            seg_end = pos;
        }
        end = base;
    }

    if seg_end > 0 {
        red.close_segment(body, 0, seg_end);
    }
}
