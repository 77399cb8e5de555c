use super::document::{MixDocument, NodeBody, NodeState};
use crate::model::id::NodeId;
use crate::model::node::Node;
use crate::model::tree::MixTree;

/// Snapshot the whole tree as a document.
pub fn export_mix_state(tree: &MixTree) -> MixDocument {
    MixDocument {
        color_presets: tree.color_presets().to_vec(),
        mixes: tree
            .roots()
            .iter()
            .filter_map(|root| export_node(tree, *root))
            .collect(),
    }
}

/// Serialize one node and the subtree it owns.
pub fn export_node(tree: &MixTree, id: NodeId) -> Option<NodeState> {
    let node = tree.get_node(id)?;
    let body = match node {
        Node::Chunk(chunk) => NodeBody::Chunk {
            text: chunk.text.clone(),
        },
        Node::Mix(mix) => NodeBody::Mix {
            preserve: mix.preserve,
            children: mix
                .children
                .iter()
                .filter_map(|child| export_node(tree, *child))
                .collect(),
        },
        Node::Variable(variable) => NodeBody::Variable {
            target_id: variable.target_id,
        },
    };

    let settings = node.settings();
    Some(NodeState {
        id: Some(id),
        body,
        title: settings.title.clone(),
        length_mode: Some(settings.length_mode),
        order_mode: Some(settings.order_mode),
        randomize: None,
        delimiter: settings.delimiter.clone(),
        first_chunk_behavior: settings.first_chunk,
        single_pass: settings.single_pass,
        limit: settings.limit,
        display: node.display().clone(),
    })
}
