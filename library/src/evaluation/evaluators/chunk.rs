use crate::chunking::{ChunkListOptions, build_chunk_list, drop_chunks_to_limit};
use crate::error::LibraryError;
use crate::evaluation::context::EvalContext;
use crate::evaluation::evaluator::NodeEvaluator;
use crate::evaluation::output::GeneratedNode;
use crate::model::node::{Node, NodeKind, OrderMode};

/// Leaf evaluator: tokenizes the chunk text and builds its fragment list.
pub struct ChunkEvaluator;

impl NodeEvaluator for ChunkEvaluator {
    fn handles(&self) -> &[NodeKind] {
        &[NodeKind::Chunk]
    }

    fn evaluate(&self, node: &Node, ctx: &mut EvalContext) -> Result<GeneratedNode, LibraryError> {
        let Node::Chunk(chunk) = node else {
            return Err(LibraryError::invalid_operation(format!(
                "chunk evaluator received a {} node",
                node.kind()
            )));
        };

        let settings = &chunk.settings;
        let plan = settings.plan();
        let options = ChunkListOptions {
            limit: settings.limit,
            exact_length: plan.exact,
            // A single source has no rounds to interleave; both random modes
            // reshuffle the token cycle
            randomize_order: settings.order_mode != OrderMode::Canonical,
            single_pass: plan.single_pass,
            first_chunk: settings.first_chunk,
            include_overflow_seed: plan.dropout,
        };

        let mut fragments = build_chunk_list(&chunk.text, &settings.delimiter, &options, ctx.rng());
        if plan.dropout {
            fragments = drop_chunks_to_limit(fragments, settings.limit, ctx.rng());
        }
        Ok(GeneratedNode::new(node, fragments, Vec::new()))
    }
}
