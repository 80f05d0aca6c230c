//! # Render Module - Diff State for the Editor
//!
//! After every state change the session describes the practice area as four
//! disjoint groups of character ranges, in document offsets:
//!
//! ```text
//! document:  let cat = 1;
//! start:         ^ (offset 4)
//! typed:         ca
//! correct:      [4, 6)
//! current:      [6, 7)       (or incorrect, while a wrong character is pending there)
//! untyped:      [7, 12)
//! ```

use std::ops::Range;

/// The kind of highlighting a document offset should receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Untyped,
    Correct,
    Incorrect,
    Current,
}

/// Render-ready view of a practice session
///
/// All ranges are half-open and relative to the whole document, not the target text.
/// The four groups never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffState {
    pub untyped: Vec<Range<usize>>,
    pub correct: Vec<Range<usize>>,
    pub incorrect: Vec<Range<usize>>,
    /// The character awaiting input. Zero or one range.
    pub current: Option<Range<usize>>,
}

impl DiffState {
    /// The state before anything has been typed: the whole practice area is untyped
    pub fn initial(start: usize, target_len: usize) -> Self {
        let mut state = Self::default();
        if target_len > 0 {
            state.untyped.push(start..start + target_len);
        }
        state
    }

    /// Build the diff for a cursor position
    ///
    /// * `start` - Document offset where the target text begins
    /// * `target_len` - Length of the target text in characters
    /// * `cursor` - Number of characters accepted so far
    /// * `has_pending_error` - Whether a wrong character is pending at the cursor
    ///
    pub fn compute(start: usize, target_len: usize, cursor: usize, has_pending_error: bool) -> Self {
        let cursor = cursor.min(target_len);
        let mut state = Self::default();

        if cursor > 0 {
            state.correct.push(start..start + cursor);
        }

        if cursor < target_len {
            let at_cursor = start + cursor..start + cursor + 1;
            if has_pending_error {
                state.incorrect.push(at_cursor);
            } else {
                state.current = Some(at_cursor);
            }
        }

        if cursor + 1 < target_len {
            state.untyped.push(start + cursor + 1..start + target_len);
        }

        state
    }

    /// Find how a document offset should be highlighted
    ///
    /// Returns `None` for offsets outside of the practice area.
    pub fn classify(&self, offset: usize) -> Option<RangeKind> {
        let contains = |ranges: &[Range<usize>]| ranges.iter().any(|range| range.contains(&offset));

        if self
            .current
            .as_ref()
            .is_some_and(|range| range.contains(&offset))
        {
            Some(RangeKind::Current)
        } else if contains(&self.incorrect) {
            Some(RangeKind::Incorrect)
        } else if contains(&self.correct) {
            Some(RangeKind::Correct)
        } else if contains(&self.untyped) {
            Some(RangeKind::Untyped)
        } else {
            None
        }
    }

    /// Returns true if nothing is highlighted
    pub fn is_empty(&self) -> bool {
        self.untyped.is_empty()
            && self.correct.is_empty()
            && self.incorrect.is_empty()
            && self.current.is_none()
    }
}
