//! # Page/Cursor Tracking
//!
//! The cursor is the vertical write position on the current page. It moves
//! down as blocks are painted and is reset by the header renderer whenever a
//! page is opened.
//!
//! Blocks are measured before they are painted. The decision of where a
//! measured block goes is made here, once, from three numbers: how tall the
//! block is, how much room is left, and how much room a fresh page offers.

/// Tolerance for float comparisons against the remaining space.
pub(crate) const EPSILON: f64 = 1e-6;

/// Tracked write position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page_index: usize,
    /// Top of the next block, in PDF space (origin bottom-left).
    pub y: f64,
}

/// Tracker state. `PageBreak` only exists between detecting an overflow and
/// the new page's header being painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Writing,
    PageBreak,
}

/// Where a measured block goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// It fits below the cursor.
    Here,
    /// It fits on a fresh page but not this one.
    NextPage,
    /// It is taller than a fresh page; continue it across pages at line
    /// boundaries.
    Split,
}

/// Decide where a block of `required` height goes.
pub fn decide(required: f64, remaining: f64, page_capacity: f64) -> Placement {
    if required <= remaining + EPSILON {
        Placement::Here
    } else if required <= page_capacity + EPSILON {
        Placement::NextPage
    } else {
        Placement::Split
    }
}

/// How many whole lines of `line_height` fit into `space` after
/// reserving `overhead` (padding) around them.
pub fn lines_that_fit(space: f64, line_height: f64, overhead: f64) -> usize {
    if line_height <= 0.0 {
        return 0;
    }
    let usable = space - overhead + EPSILON;
    if usable <= 0.0 {
        0
    } else {
        (usable / line_height).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_here() {
        assert_eq!(decide(100.0, 200.0, 700.0), Placement::Here);
        assert_eq!(decide(200.0, 200.0, 700.0), Placement::Here);
    }

    #[test]
    fn test_moves_to_next_page() {
        assert_eq!(decide(300.0, 200.0, 700.0), Placement::NextPage);
        assert_eq!(decide(700.0, 10.0, 700.0), Placement::NextPage);
    }

    #[test]
    fn test_taller_than_a_page_splits() {
        assert_eq!(decide(701.0, 200.0, 700.0), Placement::Split);
    }

    #[test]
    fn test_lines_that_fit() {
        assert_eq!(lines_that_fit(100.0, 14.0, 0.0), 7);
        assert_eq!(lines_that_fit(98.0, 14.0, 0.0), 7);
        assert_eq!(lines_that_fit(100.0, 14.0, 16.0), 6);
        assert_eq!(lines_that_fit(10.0, 14.0, 16.0), 0);
        assert_eq!(lines_that_fit(10.0, 0.0, 0.0), 0);
    }
}
