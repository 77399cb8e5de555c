//! Id-indexed arena holding one loaded mix tree.
//!
//! Nodes reference each other only by [`NodeId`]. Mix nodes own their
//! children (each node has at most one parent); Variable nodes hold a lookup
//! key and never own their target.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde_json::Value;

use super::id::{IdGenerator, NodeId};
use super::node::Node;
use crate::error::LibraryError;

#[derive(Clone, Debug, Default)]
pub struct MixTree {
    nodes: HashMap<NodeId, Node>,
    parents: HashMap<NodeId, NodeId>,
    roots: Vec<NodeId>,
    ids: IdGenerator,
    /// Editor palette, carried through load and save untouched.
    color_presets: Vec<Value>,
}

impl MixTree {
    pub fn new() -> Self {
        Self::with_id_generator(IdGenerator::new())
    }

    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            nodes: HashMap::new(),
            parents: HashMap::new(),
            roots: Vec::new(),
            ids,
            color_presets: Vec::new(),
        }
    }

    pub fn id_generator(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn color_presets(&self) -> &[Value] {
        &self.color_presets
    }

    pub fn set_color_presets(&mut self, presets: Vec<Value>) {
        self.color_presets = presets;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Ids that some Variable points at but no node in this tree carries.
    pub fn dangling_targets(&self) -> HashSet<NodeId> {
        self.nodes
            .values()
            .filter_map(|node| match node {
                Node::Variable(variable) => variable.target_id,
                _ => None,
            })
            .filter(|target| !self.nodes.contains_key(target))
            .collect()
    }

    /// Next id from the generator that is not already taken in this tree.
    pub fn allocate_id(&self) -> NodeId {
        loop {
            let id = self.ids.next_id();
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn add_chunk(&mut self, parent: Option<NodeId>, text: &str) -> Result<NodeId, LibraryError> {
        let id = self.allocate_id();
        self.insert_node(Node::chunk(id, text), parent)
    }

    pub fn add_mix(&mut self, parent: Option<NodeId>) -> Result<NodeId, LibraryError> {
        let id = self.allocate_id();
        self.insert_node(Node::mix(id), parent)
    }

    pub fn add_variable(
        &mut self,
        parent: Option<NodeId>,
        target_id: Option<NodeId>,
    ) -> Result<NodeId, LibraryError> {
        let id = self.allocate_id();
        self.insert_node(Node::variable(id, target_id), parent)
    }

    /// Insert a node under its own id, appended to `parent` or to the roots.
    ///
    /// Mix children listed on the node are ignored; children are attached by
    /// inserting them with this node as their parent.
    pub fn insert_node(&mut self, mut node: Node, parent: Option<NodeId>) -> Result<NodeId, LibraryError> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(LibraryError::invalid_operation(format!(
                "node id {} is already in use",
                id
            )));
        }
        if let Some(parent_id) = parent {
            match self.nodes.get(&parent_id) {
                Some(Node::Mix(_)) => {}
                Some(other) => {
                    return Err(LibraryError::invalid_operation(format!(
                        "cannot add a child to {} node {}",
                        other.kind(),
                        parent_id
                    )));
                }
                None => return Err(LibraryError::NodeNotFound(parent_id)),
            }
        }

        match &mut node {
            Node::Mix(mix) => mix.children.clear(),
            // A target that does not exist yet must never be handed to an unrelated node.
            Node::Variable(variable) => {
                if let Some(target) = variable.target_id {
                    self.ids.observe(target);
                }
            }
            Node::Chunk(_) => {}
        }
        self.ids.observe(id);
        self.nodes.insert(id, node);
        self.link(id, parent, None);
        Ok(id)
    }

    /// Move a top-level node under `parent`.
    pub fn attach(&mut self, id: NodeId, parent: NodeId) -> Result<(), LibraryError> {
        if !self.nodes.contains_key(&id) {
            return Err(LibraryError::NodeNotFound(id));
        }
        if let Some(current) = self.parent_of(id) {
            return Err(LibraryError::invalid_operation(format!(
                "node {} already belongs to mix {}",
                id, current
            )));
        }
        match self.nodes.get(&parent) {
            Some(Node::Mix(_)) => {}
            Some(other) => {
                return Err(LibraryError::invalid_operation(format!(
                    "cannot add a child to {} node {}",
                    other.kind(),
                    parent
                )));
            }
            None => return Err(LibraryError::NodeNotFound(parent)),
        }
        if self.subtree(id).contains(&parent) {
            return Err(LibraryError::invalid_operation(format!(
                "node {} cannot own its ancestor {}",
                parent, id
            )));
        }
        self.unlink(id);
        self.link(id, Some(parent), None);
        Ok(())
    }

    /// Turn a node back into a top-level node. Already top-level nodes are left alone.
    pub fn detach(&mut self, id: NodeId) -> Result<(), LibraryError> {
        if !self.nodes.contains_key(&id) {
            return Err(LibraryError::NodeNotFound(id));
        }
        if self.parents.contains_key(&id) {
            self.unlink(id);
            self.link(id, None, None);
        }
        Ok(())
    }

    fn link(&mut self, id: NodeId, parent: Option<NodeId>, position: Option<usize>) {
        let siblings = match parent {
            Some(parent_id) => {
                self.parents.insert(id, parent_id);
                match self.nodes.get_mut(&parent_id) {
                    Some(Node::Mix(mix)) => &mut mix.children,
                    _ => return,
                }
            }
            None => &mut self.roots,
        };
        match position {
            Some(index) if index <= siblings.len() => siblings.insert(index, id),
            _ => siblings.push(id),
        }
    }

    fn unlink(&mut self, id: NodeId) {
        match self.parents.remove(&id) {
            Some(parent_id) => {
                if let Some(Node::Mix(mix)) = self.nodes.get_mut(&parent_id) {
                    mix.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    /// Pre-order list of `id` and every node it owns.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(current);
            for child in node.children().iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Remove a node together with everything it owns.
    ///
    /// Removing a Variable only removes the reference; its target stays.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<Node>, LibraryError> {
        if !self.nodes.contains_key(&id) {
            return Err(LibraryError::NodeNotFound(id));
        }
        self.unlink(id);
        let removed: Vec<Node> = self
            .subtree(id)
            .into_iter()
            .filter_map(|node_id| {
                self.parents.remove(&node_id);
                self.nodes.remove(&node_id)
            })
            .collect();
        debug!("Removed node {} ({} nodes total)", id, removed.len());
        Ok(removed)
    }

    /// Deep-copy a subtree with fresh ids and place the copy right after the
    /// original. Variables inside the copy keep pointing at their targets.
    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId, LibraryError> {
        if !self.nodes.contains_key(&id) {
            return Err(LibraryError::NodeNotFound(id));
        }
        let parent = self.parent_of(id);
        let siblings = match parent {
            Some(parent_id) => self
                .nodes
                .get(&parent_id)
                .map(|node| node.children().to_vec())
                .unwrap_or_default(),
            None => self.roots.clone(),
        };
        let position = siblings.iter().position(|sibling| *sibling == id).map(|i| i + 1);

        self.copy_subtree(id, parent, position)
            .ok_or(LibraryError::NodeNotFound(id))
    }

    fn copy_subtree(
        &mut self,
        source: NodeId,
        parent: Option<NodeId>,
        position: Option<usize>,
    ) -> Option<NodeId> {
        let mut node = self.nodes.get(&source)?.clone();
        let children = node.children().to_vec();
        let new_id = self.allocate_id();
        node.set_id(new_id);
        if let Node::Mix(mix) = &mut node {
            mix.children.clear();
        }
        self.nodes.insert(new_id, node);
        self.link(new_id, parent, position);
        for child in children {
            self.copy_subtree(child, Some(new_id), None);
        }
        Some(new_id)
    }

    /// Drop every node. The id generator and color presets are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.parents.clear();
        self.roots.clear();
    }
}
