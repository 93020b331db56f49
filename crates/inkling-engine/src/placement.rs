//! Deterministic slot resolution for illustration placement.
//!
//! An illustration wants to sit after a specific paragraph, but that slot
//! may already hold one. Resolution walks outward from the candidate in a
//! fixed order, so the same inputs always land on the same slot no matter
//! how the filled set was accumulated.

use std::collections::BTreeSet;

use tracing::debug;

/// Paragraph slot meaning "no free slot"; real slots are 1-based.
pub const NO_SLOT: usize = 0;

/// Resolve the slot an illustration should occupy.
///
/// `candidate` is the 1-based paragraph the illustration targets and
/// `filled` holds the slots already taken. The search order is fixed:
/// first downward from the candidate to paragraph 1, then upward from
/// the candidate to the last paragraph. When every slot is taken the
/// [`NO_SLOT`] sentinel comes back.
pub fn resolve(candidate: usize, total_paragraphs: usize, filled: &BTreeSet<usize>) -> usize {
    for index in (1..=candidate).rev() {
        if !filled.contains(&index) {
            debug!(candidate, resolved = index, "placement: slot below or at candidate");
            return index;
        }
    }

    for index in candidate + 1..=total_paragraphs {
        if !filled.contains(&index) {
            debug!(candidate, resolved = index, "placement: slot above candidate");
            return index;
        }
    }

    debug!(candidate, total_paragraphs, "placement: no free slot");
    NO_SLOT
}
