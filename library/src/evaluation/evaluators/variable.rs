use log::warn;

use crate::error::LibraryError;
use crate::evaluation::context::EvalContext;
use crate::evaluation::evaluator::NodeEvaluator;
use crate::evaluation::output::GeneratedNode;
use crate::model::node::{Node, NodeKind};

/// Reference evaluator: re-evaluates the target with fresh draws.
///
/// The variable's own settings are not applied, so its output is the same
/// as a copy of the target subtree placed here.
pub struct VariableEvaluator;

impl NodeEvaluator for VariableEvaluator {
    fn handles(&self) -> &[NodeKind] {
        &[NodeKind::Variable]
    }

    fn evaluate(&self, node: &Node, ctx: &mut EvalContext) -> Result<GeneratedNode, LibraryError> {
        let Node::Variable(variable) = node else {
            return Err(LibraryError::invalid_operation(format!(
                "variable evaluator received a {} node",
                node.kind()
            )));
        };

        let target = match variable.target_id {
            Some(target) if ctx.tree.contains(target) => target,
            Some(target) => {
                warn!("Variable {} points at missing node {}", variable.id, target);
                return Ok(GeneratedNode::empty(node));
            }
            None => {
                warn!("Variable {} has no target", variable.id);
                return Ok(GeneratedNode::empty(node));
            }
        };

        let resolved = ctx.evaluate_node(target)?;
        Ok(GeneratedNode::new(node, resolved.fragments, Vec::new()))
    }
}
