//! Defaults and legacy-field mapping applied while loading a document.

use log::debug;

use super::document::NodeState;
use crate::model::node::{LengthMode, NodeKind, OrderMode};

/// `lengthMode`, falling back to the type-specific default.
pub fn resolve_length_mode(state: &NodeState) -> LengthMode {
    state.length_mode.unwrap_or(match state.kind() {
        NodeKind::Mix => LengthMode::FitSmallest,
        NodeKind::Chunk | NodeKind::Variable => LengthMode::ExactOnce,
    })
}

/// `orderMode`, or the equivalent of the legacy `randomize` flag.
///
/// An explicit `orderMode` always wins. `randomize: true` meant per-round
/// shuffling on mixes and whole-list shuffling everywhere else.
pub fn resolve_order_mode(state: &NodeState) -> OrderMode {
    if let Some(mode) = state.order_mode {
        return mode;
    }
    match (state.randomize, state.kind()) {
        (Some(true), NodeKind::Mix) => {
            debug!("Mapping legacy randomize flag to randomize-interleave");
            OrderMode::RandomizeInterleave
        }
        (Some(true), _) => {
            debug!("Mapping legacy randomize flag to full-randomize");
            OrderMode::FullRandomize
        }
        _ => OrderMode::Canonical,
    }
}
