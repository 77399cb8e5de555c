use crate::chunking::{MixOptions, drop_chunks_to_limit, mix_chunk_lists};
use crate::error::LibraryError;
use crate::evaluation::context::EvalContext;
use crate::evaluation::evaluator::NodeEvaluator;
use crate::evaluation::output::GeneratedNode;
use crate::model::node::{Node, NodeKind, OrderMode};
use crate::random::shuffle;

/// Composite evaluator: evaluates children in order, then mixes them.
pub struct MixEvaluator;

impl NodeEvaluator for MixEvaluator {
    fn handles(&self) -> &[NodeKind] {
        &[NodeKind::Mix]
    }

    fn evaluate(&self, node: &Node, ctx: &mut EvalContext) -> Result<GeneratedNode, LibraryError> {
        let Node::Mix(mix) = node else {
            return Err(LibraryError::invalid_operation(format!(
                "mix evaluator received a {} node",
                node.kind()
            )));
        };

        let mut children = Vec::with_capacity(mix.children.len());
        for child_id in &mix.children {
            children.push(ctx.evaluate_node(*child_id)?);
        }

        // This mix's own `preserve` decides how its children enter: their
        // fragments as-is, or each child's output as a single fragment. It has
        // no say over how this mix's output enters its own parent.
        let mut sources: Vec<Vec<String>> = children
            .iter()
            .map(|child| {
                if mix.preserve {
                    child.fragments.clone()
                } else {
                    vec![child.output.clone()]
                }
            })
            .collect();

        let settings = &mix.settings;
        if settings.order_mode == OrderMode::FullRandomize {
            shuffle(ctx.rng(), &mut sources);
        }

        let plan = settings.plan();
        let options = MixOptions {
            limit: settings.limit,
            exact_length: plan.exact,
            randomize_list_order: settings.order_mode == OrderMode::RandomizeInterleave,
            single_pass: plan.single_pass,
            fit: plan.fit,
            include_overflow_seed: plan.dropout,
        };

        let mut fragments = mix_chunk_lists(&sources, &options, ctx.rng());
        if plan.dropout {
            fragments = drop_chunks_to_limit(fragments, settings.limit, ctx.rng());
        }
        Ok(GeneratedNode::new(node, fragments, children))
    }
}
