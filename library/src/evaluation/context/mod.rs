//! Evaluation context: the state carried through one `generate()` pass.

use log::{debug, warn};

use super::evaluator::NodeEvaluator;
use super::output::GeneratedNode;
use crate::error::LibraryError;
use crate::model::id::NodeId;
use crate::model::tree::MixTree;
use crate::random::RandomSource;

/// Deepest nesting evaluated before a branch is cut off as empty.
pub const MAX_DEPTH: usize = 64;

/// Context for a single evaluation pass.
///
/// Created fresh for each `generate()` call. Holds the shared random source
/// and the stack of nodes currently being evaluated, which is what breaks
/// Variable cycles.
pub struct EvalContext<'a> {
    pub tree: &'a MixTree,
    rng: &'a mut dyn RandomSource,

    /// Reference to the registered evaluators for recursive dispatch.
    evaluators: &'a [Box<dyn NodeEvaluator>],

    stack: Vec<NodeId>,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        tree: &'a MixTree,
        rng: &'a mut dyn RandomSource,
        evaluators: &'a [Box<dyn NodeEvaluator>],
    ) -> Self {
        Self {
            tree,
            rng,
            evaluators,
            stack: Vec::new(),
        }
    }

    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Evaluate a node and everything below it.
    ///
    /// This is the core recursive dispatch method. Nothing is cached: every
    /// call draws fresh randomness, so a Variable re-evaluating its target
    /// behaves exactly like an inlined copy of the target.
    pub fn evaluate_node(&mut self, id: NodeId) -> Result<GeneratedNode, LibraryError> {
        let tree = self.tree;
        let node = tree.get_node(id).ok_or(LibraryError::NodeNotFound(id))?;

        if self.stack.contains(&id) {
            warn!("Cycle through node {} detected; evaluating it as empty", id);
            return Ok(GeneratedNode::empty(node));
        }
        if self.depth() >= MAX_DEPTH {
            warn!(
                "Node {} is nested deeper than {} levels; evaluating it as empty",
                id, MAX_DEPTH
            );
            return Ok(GeneratedNode::empty(node));
        }

        // Copy the evaluators slice reference out of self so we can borrow self mutably
        let evaluators = self.evaluators;
        let kind = node.kind();
        let evaluator = evaluators
            .iter()
            .find(|e| e.handles().contains(&kind))
            .ok_or_else(|| {
                LibraryError::invalid_operation(format!("No evaluator registered for {} nodes", kind))
            })?;

        self.stack.push(id);
        let result = evaluator.evaluate(node, self);
        self.stack.pop();

        let generated = result?;
        debug!(
            "Evaluated {} node {} into {} fragments ({} chars)",
            kind,
            id,
            generated.fragments.len(),
            generated.char_len()
        );
        Ok(generated)
    }
}
