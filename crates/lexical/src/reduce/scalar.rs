//! Character-at-a-time reducer for short bodies.

use super::Reduction;
use crate::dialect::Dialect;

/// Scanner state, looking leftwards from the last separator seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Just after a separator (or at the end of the body).
    Boundary,
    /// Inside a literal name of `n` characters so far.
    Normal(usize),
    /// One dot so far.
    SawDot,
    /// Two dots so far.
    SawDotDot,
}

/// Reduces `body` right to left, one byte per step.
pub(crate) fn reduce_scalar(body: &[u8], dialect: Dialect, red: &mut Reduction<'_>) {
    let mut state = State::Boundary;
    for i in (0..body.len()).rev() {
        let b = body[i];
        if dialect.is_separator(b) {
            if dialect.is_alt_separator(b) {
                red.note_alt_separator();
            }
            close(state, i + 1, body, red);
            state = State::Boundary;
            continue;
        }
        state = match (state, b) {
            (State::Boundary, b'.') => State::SawDot,
            (State::SawDot, b'.') => State::SawDotDot,
            (State::Boundary, _) => State::Normal(1),
            (State::SawDot, _) => State::Normal(2),
            (State::SawDotDot, _) => State::Normal(3),
            (State::Normal(n), _) => State::Normal(n + 1),
        };
    }
    close(state, 0, body, red);
}

/// Closes whatever component starts at `start`.
#[inline]
fn close(state: State, start: usize, body: &[u8], red: &mut Reduction<'_>) {
    match state {
        State::Boundary => {}
        State::Normal(n) => red.close_segment(body, start, start + n),
        State::SawDot => red.close_current(),
        State::SawDotDot => red.close_parent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SegmentPool;
    use crate::prefix::TrailingDots;
    use crate::store::{Segment, SegmentStore};

    fn reduce(body: &str, dialect: Dialect) -> (Vec<Segment>, usize, bool, bool) {
        let pool = SegmentPool::new(2, 1024);
        let mut red = Reduction::new(SegmentStore::new(&pool), dialect, TrailingDots::Strip);
        reduce_scalar(body.as_bytes(), dialect, &mut red);
        let segs = red.store().iter_forward().copied().collect();
        (segs, red.parents(), red.leading_current(), red.alt_seen())
    }

    fn seg(offset: usize, len: usize) -> Segment {
        Segment { offset, len }
    }

    #[test]
    fn plain_names_form_one_run() {
        let (segs, parents, lead, _) = reduce("usr/local/bin", Dialect::Unix);
        assert_eq!(segs, vec![seg(0, 13)]);
        assert_eq!(parents, 0);
        assert!(!lead);
    }

    #[test]
    fn parent_cancels_left_neighbor() {
        // a/b/../c -> a, c
        let (segs, parents, _, _) = reduce("a/b/../c", Dialect::Unix);
        assert_eq!(segs, vec![seg(0, 1), seg(7, 1)]);
        assert_eq!(parents, 0);
    }

    #[test]
    fn excess_parents_remain() {
        let (segs, parents, _, _) = reduce("a/../../b", Dialect::Unix);
        assert_eq!(segs, vec![seg(8, 1)]);
        assert_eq!(parents, 1);
    }

    #[test]
    fn dotted_names_are_literal() {
        let (segs, parents, lead, _) = reduce("...a/.b/..c", Dialect::Unix);
        assert_eq!(segs, vec![seg(0, 11)]);
        assert_eq!(parents, 0);
        assert!(!lead);
    }

    #[test]
    fn leading_current_survives_only_at_front() {
        let (_, _, lead, _) = reduce("./a", Dialect::Unix);
        assert!(lead);
        let (segs, _, lead, _) = reduce("a/./b", Dialect::Unix);
        assert!(!lead);
        assert_eq!(segs, vec![seg(0, 1), seg(4, 1)]);
        // cancelled segments do not clear it
        let (segs, _, lead, _) = reduce("a/../.", Dialect::Unix);
        assert!(lead);
        assert!(segs.is_empty());
    }

    #[test]
    fn windows_strips_trailing_dots_and_notes_slashes() {
        let (segs, _, _, alt) = reduce("a../b\\...", Dialect::Windows);
        assert_eq!(segs, vec![seg(0, 1), seg(4, 5)]);
        assert!(alt);
        let (_, _, _, alt) = reduce("a\\b", Dialect::Windows);
        assert!(!alt);
    }
}
