//! # Page Break Decisions
//!
//! Every block the report places (company header, table row, total,
//! separator) is unbreakable: it lands wholly on one page. Before placing a
//! block the engine asks whether it fits in what is left of the page.

/// What to do with a block before placing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Place the block on the current page (it fits).
    Place,
    /// Close the current page and place the block at the top of the next.
    MoveToNextPage,
}

/// Slack for accumulated floating-point error in the cursor position.
const FIT_TOLERANCE: f64 = 1e-6;

/// Decide whether a block of `block_height` goes on the current page.
///
/// `page_is_empty` is true when nothing but the repeated report header has
/// been placed on the page. A block that does not fit an empty page will
/// not fit the next one either, so it is placed anyway and allowed to
/// overflow; this keeps layout finite for oversized blocks.
pub fn decide_break(
    remaining_height: f64,
    block_height: f64,
    page_is_empty: bool,
) -> BreakDecision {
    if block_height <= remaining_height + FIT_TOLERANCE {
        return BreakDecision::Place;
    }

    if page_is_empty {
        return BreakDecision::Place;
    }

    BreakDecision::MoveToNextPage
}
