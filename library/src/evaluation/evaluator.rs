//! The trait every node evaluator implements.

use super::context::EvalContext;
use super::output::GeneratedNode;
use crate::error::LibraryError;
use crate::model::node::{Node, NodeKind};

/// Trait for evaluating one kind of node.
///
/// The engine dispatches to the first registered evaluator whose
/// `handles()` contains the node's kind.
pub trait NodeEvaluator: Send + Sync {
    /// The node kinds this evaluator handles.
    fn handles(&self) -> &[NodeKind];

    /// Produce the node's fragments.
    ///
    /// Evaluators pull child or target output through
    /// `ctx.evaluate_node()` and draw randomness from `ctx.rng()` only.
    fn evaluate(&self, node: &Node, ctx: &mut EvalContext) -> Result<GeneratedNode, LibraryError>;
}
