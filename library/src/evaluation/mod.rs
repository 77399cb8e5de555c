//! Recursive evaluation of Chunk/Mix/Variable trees.
//!
//! Each node kind has a corresponding `NodeEvaluator`. Evaluation starts at a
//! root and recursively evaluates children (Mix) or targets (Variable)
//! before combining their fragments bottom-up.

pub mod context;
pub mod engine;
pub mod evaluator;
pub mod evaluators;
pub mod output;

use once_cell::sync::Lazy;

pub use context::EvalContext;
pub use engine::EvalEngine;
pub use evaluator::NodeEvaluator;
pub use output::GeneratedNode;

use crate::error::LibraryError;
use crate::model::id::NodeId;
use crate::model::tree::MixTree;
use crate::random::RandomSource;

static DEFAULT_ENGINE: Lazy<EvalEngine> = Lazy::new(EvalEngine::with_default_evaluators);

/// Evaluate `root` with the built-in evaluators.
pub fn generate(
    tree: &MixTree,
    root: NodeId,
    rng: &mut dyn RandomSource,
) -> Result<GeneratedNode, LibraryError> {
    DEFAULT_ENGINE.generate(tree, root, rng)
}

/// Evaluate every root of `tree` with the built-in evaluators.
pub fn generate_all(tree: &MixTree, rng: &mut dyn RandomSource) -> Result<Vec<GeneratedNode>, LibraryError> {
    DEFAULT_ENGINE.generate_all(tree, rng)
}
