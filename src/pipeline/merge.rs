// Folding queued pads into playing pads. A pad in both lists is toggled
// off; survivors keep seniority ahead of new requests; an overfull category
// loses its oldest pads first.

use crate::pipeline::pad_state::SamplePadState;
use crate::shared::{PadCategory, PadConfig};

pub fn merge_category_list(
    queued: &[PadConfig],
    existing: &[PadConfig],
    capacity: usize,
) -> Vec<PadConfig> {
    let mut merged: Vec<PadConfig> = existing
        .iter()
        .filter(|p| !queued.contains(p))
        .copied()
        .collect();
    for pad in queued.iter().filter(|p| !existing.contains(p)) {
        if !merged.contains(pad) {
            merged.push(*pad);
        }
    }

    // capacity applies to the union, never before it
    let overflow = merged.len().saturating_sub(capacity);
    merged.drain(..overflow);
    merged
}

/// New state with `queued` folded into `existing`. Neither input changes.
pub fn merge_state(queued: &SamplePadState, existing: &SamplePadState) -> SamplePadState {
    let mut out = SamplePadState::new();
    for category in PadCategory::ALL {
        *out.list_mut(category) = merge_category_list(
            queued.list(category),
            existing.list(category),
            category.capacity(),
        );
    }
    out
}

/// Merge a single request into `state`; a second request for the same pad
/// cancels the first.
pub fn merge_pad(state: &SamplePadState, pad: PadConfig) -> SamplePadState {
    let category = pad.category;
    let mut out = state.clone();
    *out.list_mut(category) =
        merge_category_list(&[pad], state.list(category), category.capacity());
    out
}
