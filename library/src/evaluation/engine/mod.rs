//! Evaluation engine: drives recursive evaluation of a mix tree.

use log::debug;

use super::context::EvalContext;
use super::evaluator::NodeEvaluator;
use super::output::GeneratedNode;
use crate::error::LibraryError;
use crate::model::id::NodeId;
use crate::model::tree::MixTree;
use crate::random::RandomSource;
use crate::util::timing::ScopedTimer;

/// The evaluation engine holds all registered node evaluators.
pub struct EvalEngine {
    evaluators: Vec<Box<dyn NodeEvaluator>>,
}

impl EvalEngine {
    pub fn new() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    /// Create an engine with the chunk, mix and variable evaluators registered.
    pub fn with_default_evaluators() -> Self {
        use super::evaluators::{ChunkEvaluator, MixEvaluator, VariableEvaluator};

        let mut engine = Self::new();
        engine.register(Box::new(ChunkEvaluator));
        engine.register(Box::new(MixEvaluator));
        engine.register(Box::new(VariableEvaluator));
        engine
    }

    /// Register a node evaluator. Earlier registrations win.
    pub fn register(&mut self, evaluator: Box<dyn NodeEvaluator>) {
        self.evaluators.push(evaluator);
    }

    /// Evaluate the subtree rooted at `root`.
    pub fn generate(
        &self,
        tree: &MixTree,
        root: NodeId,
        rng: &mut dyn RandomSource,
    ) -> Result<GeneratedNode, LibraryError> {
        let _timer = ScopedTimer::debug_lazy(|| format!("generate({})", root));
        let mut ctx = EvalContext::new(tree, rng, &self.evaluators);
        ctx.evaluate_node(root)
    }

    /// Evaluate every root of the tree in order, sharing one random source.
    pub fn generate_all(
        &self,
        tree: &MixTree,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<GeneratedNode>, LibraryError> {
        debug!("Generating {} roots", tree.roots().len());
        tree.roots()
            .iter()
            .map(|root| self.generate(tree, *root, rng))
            .collect()
    }
}

impl Default for EvalEngine {
    fn default() -> Self {
        Self::with_default_evaluators()
    }
}
