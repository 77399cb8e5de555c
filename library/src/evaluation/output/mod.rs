//! Annotated output of one `generate()` pass.

use std::collections::HashMap;

use serde::Serialize;

use crate::chunking::fill::total_len;
use crate::model::id::NodeId;
use crate::model::node::{Node, NodeKind};

/// One evaluated node with its fragments and the evaluated children.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub title: String,
    pub fragments: Vec<String>,
    pub output: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GeneratedNode>,
}

impl GeneratedNode {
    pub fn new(node: &Node, fragments: Vec<String>, children: Vec<GeneratedNode>) -> Self {
        Self {
            id: node.id(),
            kind: node.kind(),
            title: node.title().to_string(),
            output: fragments.concat(),
            fragments,
            children,
        }
    }

    pub fn empty(node: &Node) -> Self {
        Self::new(node, Vec::new(), Vec::new())
    }

    pub fn char_len(&self) -> usize {
        total_len(&self.fragments)
    }

    /// Find the output recorded for `id` in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&GeneratedNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Output string per node id for the whole subtree.
    pub fn outputs(&self) -> HashMap<NodeId, String> {
        let mut map = HashMap::new();
        self.collect_outputs(&mut map);
        map
    }

    fn collect_outputs(&self, map: &mut HashMap<NodeId, String>) {
        map.insert(self.id, self.output.clone());
        for child in &self.children {
            child.collect_outputs(map);
        }
    }
}
