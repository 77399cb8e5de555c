//! Loading and saving mix trees as JSON documents.

pub mod apply;
pub mod document;
pub mod export;
pub mod migration;

pub use apply::{LoadReport, apply_mix_state, import_mix_state, node_from_state};
pub use document::{MixDocument, NodeBody, NodeState};
pub use export::{export_mix_state, export_node};
