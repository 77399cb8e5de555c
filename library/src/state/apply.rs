//! Loading documents into a [`MixTree`].
//!
//! Both entry points build the result in a staged copy and only swap it in
//! once every node is placed, so a failed load leaves the target untouched.

use std::collections::{HashMap, HashSet};

use log::{info, warn};

use super::document::{MixDocument, NodeBody, NodeState};
use super::migration::{resolve_length_mode, resolve_order_mode};
use crate::error::LibraryError;
use crate::model::id::NodeId;
use crate::model::node::{Node, NodeSettings};
use crate::model::tree::MixTree;
use crate::util::timing::timed_debug;

/// What a load did to the ids it was given.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LoadReport {
    /// Top-level nodes created by the load, in document order.
    pub roots: Vec<NodeId>,
    /// `(document id, assigned id)` for every node whose id was taken.
    pub rekeyed: Vec<(NodeId, NodeId)>,
    /// The document had no mixes and one default Mix was created instead.
    pub seeded_default: bool,
}

/// Replace the contents of `tree` with `document`.
///
/// `None`, or a document without mixes, leaves one default Mix behind.
pub fn apply_mix_state(
    document: Option<&MixDocument>,
    tree: &mut MixTree,
) -> Result<LoadReport, LibraryError> {
    let mut staged = MixTree::with_id_generator(tree.id_generator().clone());
    let report = match document {
        Some(document) if !document.mixes.is_empty() => {
            staged.set_color_presets(document.color_presets.clone());
            timed_debug(
                || format!("apply({} mixes)", document.mixes.len()),
                || load_mixes(document, &mut staged),
            )?
        }
        _ => {
            if let Some(document) = document {
                staged.set_color_presets(document.color_presets.clone());
            }
            let root = staged.add_mix(None)?;
            info!("Empty mix state, seeded default mix {}", root);
            LoadReport {
                roots: vec![root],
                rekeyed: Vec::new(),
                seeded_default: true,
            }
        }
    };
    *tree = staged;
    Ok(report)
}

/// Append the mixes of `document` to `tree`, rekeying ids that are taken.
///
/// Color presets of the existing tree are kept.
pub fn import_mix_state(document: &MixDocument, tree: &mut MixTree) -> Result<LoadReport, LibraryError> {
    let mut staged = tree.clone();
    let report = timed_debug(
        || format!("import({} mixes)", document.mixes.len()),
        || load_mixes(document, &mut staged),
    )?;
    *tree = staged;
    Ok(report)
}

impl MixTree {
    /// Fresh tree holding exactly what `document` describes.
    pub fn from_document(document: &MixDocument) -> Result<(Self, LoadReport), LibraryError> {
        let mut tree = MixTree::new();
        let report = apply_mix_state(Some(document), &mut tree)?;
        Ok((tree, report))
    }
}

struct Loader<'t> {
    tree: &'t mut MixTree,
    /// Ids already pointed at by a dangling Variable in the tree being loaded into.
    reserved: HashSet<NodeId>,
    /// First assignment of each document id; later duplicates do not overwrite it.
    assigned: HashMap<NodeId, NodeId>,
    /// Variables and the document id they point at, patched once all nodes exist.
    targets: Vec<(NodeId, NodeId)>,
    report: LoadReport,
}

fn load_mixes(document: &MixDocument, tree: &mut MixTree) -> Result<LoadReport, LibraryError> {
    // Keep freshly allocated ids clear of ids declared further down and of
    // ids that Variables point at, whether or not anything declares them.
    for id in document.declared_ids().into_iter().chain(document.target_ids()) {
        tree.id_generator().observe(id);
    }

    let reserved = tree.dangling_targets();
    let mut loader = Loader {
        tree,
        reserved,
        assigned: HashMap::new(),
        targets: Vec::new(),
        report: LoadReport::default(),
    };
    for state in &document.mixes {
        let root = loader.load_node(state, None)?;
        loader.report.roots.push(root);
    }
    loader.resolve_targets();

    let report = loader.report;
    if !report.rekeyed.is_empty() {
        info!("Rekeyed {} colliding node ids", report.rekeyed.len());
    }
    info!(
        "Loaded {} mixes ({} nodes in tree)",
        report.roots.len(),
        tree.len()
    );
    Ok(report)
}

impl Loader<'_> {
    fn load_node(&mut self, state: &NodeState, parent: Option<NodeId>) -> Result<NodeId, LibraryError> {
        let id = match state.id {
            Some(id) if !self.tree.contains(id) && !self.reserved.contains(&id) => id,
            Some(id) if !self.tree.contains(id) => {
                let fresh = self.tree.allocate_id();
                warn!("Node id {} is the target of an existing variable, rekeyed to {}", id, fresh);
                self.report.rekeyed.push((id, fresh));
                fresh
            }
            Some(id) => {
                let fresh = self.tree.allocate_id();
                warn!("Node id {} is already in use, rekeyed to {}", id, fresh);
                self.report.rekeyed.push((id, fresh));
                fresh
            }
            None => self.tree.allocate_id(),
        };
        if let Some(declared) = state.id {
            self.assigned.entry(declared).or_insert(id);
        }

        let node = node_from_state(id, state);
        if let NodeBody::Variable {
            target_id: Some(target),
        } = &state.body
        {
            self.targets.push((id, *target));
        }
        self.tree.insert_node(node, parent)?;

        for child in state.children() {
            self.load_node(child, Some(id))?;
        }
        Ok(id)
    }

    fn resolve_targets(&mut self) {
        for (variable, declared) in std::mem::take(&mut self.targets) {
            let Some(resolved) = self.assigned.get(&declared).copied() else {
                // Points outside this document; left for lookup at evaluation.
                continue;
            };
            if let Some(Node::Variable(v)) = self.tree.get_node_mut(variable) {
                v.target_id = Some(resolved);
            }
        }
    }
}

/// Build a detached node from its serialized state. Mix children are not
/// included; they are inserted separately.
pub fn node_from_state(id: NodeId, state: &NodeState) -> Node {
    let settings = NodeSettings {
        title: state.title.clone(),
        length_mode: resolve_length_mode(state),
        order_mode: resolve_order_mode(state),
        delimiter: state.delimiter.clone(),
        first_chunk: state.first_chunk_behavior,
        single_pass: state.single_pass,
        limit: state.limit,
    };

    let mut node = match &state.body {
        NodeBody::Chunk { text } => Node::chunk(id, text),
        NodeBody::Mix { preserve, .. } => {
            let mut node = Node::mix(id);
            if let Node::Mix(mix) = &mut node {
                mix.preserve = *preserve;
            }
            node
        }
        NodeBody::Variable { target_id } => Node::variable(id, *target_id),
    };
    *node.settings_mut() = settings;
    *node.display_mut() = state.display.clone();
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{LengthMode, NodeKind, OrderMode};

    #[test]
    fn none_seeds_default_mix() {
        let mut tree = MixTree::new();
        tree.add_chunk(None, "old, ").unwrap();
        let report = apply_mix_state(None, &mut tree).unwrap();

        assert!(report.seeded_default);
        assert_eq!(tree.len(), 1);
        let root = tree.get_node(report.roots[0]).unwrap();
        assert_eq!(root.kind(), NodeKind::Mix);
        assert!(root.children().is_empty());
    }

    #[test]
    fn document_without_mixes_seeds_default_mix() {
        let document = MixDocument::from_json(r##"{"colorPresets":["#ff0000"],"mixes":[]}"##).unwrap();
        let mut tree = MixTree::new();
        let report = apply_mix_state(Some(&document), &mut tree).unwrap();
        assert!(report.seeded_default);
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.color_presets().len(), 1);
    }

    #[test]
    fn missing_fields_take_type_defaults() {
        let document = MixDocument::from_json(
            r#"{"mixes":[{"type":"mix","id":1,"randomize":true,"children":[{"type":"chunk","id":2,"text":"x, "}]}]}"#,
        )
        .unwrap();
        let (tree, _) = MixTree::from_document(&document).unwrap();

        let mix = tree.get_node(NodeId(1)).unwrap();
        assert_eq!(mix.settings().length_mode, LengthMode::FitSmallest);
        assert_eq!(mix.settings().order_mode, OrderMode::RandomizeInterleave);
        assert_eq!(mix.settings().limit, 1000);

        let chunk = tree.get_node(NodeId(2)).unwrap();
        assert_eq!(chunk.settings().length_mode, LengthMode::ExactOnce);
        assert_eq!(chunk.settings().order_mode, OrderMode::Canonical);
    }

    #[test]
    fn duplicate_document_ids_are_rekeyed() {
        let document = MixDocument::from_json(
            r#"{"mixes":[{"type":"mix","id":1,"children":[{"type":"chunk","id":2},{"type":"chunk","id":2},{"type":"chunk","id":3}]}]}"#,
        )
        .unwrap();
        let (tree, report) = MixTree::from_document(&document).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(report.rekeyed.len(), 1);
        let (declared, fresh) = report.rekeyed[0];
        assert_eq!(declared, NodeId(2));
        // Declared ids are reserved up front, so the fresh id skips 3.
        assert_eq!(fresh, NodeId(4));
        assert_eq!(
            tree.get_node(NodeId(1)).unwrap().children(),
            &[NodeId(2), NodeId(4), NodeId(3)]
        );
    }

    #[test]
    fn missing_ids_are_allocated() {
        let document =
            MixDocument::from_json(r#"{"mixes":[{"type":"mix","children":[{"type":"chunk","id":7}]}]}"#)
                .unwrap();
        let (tree, report) = MixTree::from_document(&document).unwrap();
        assert!(report.rekeyed.is_empty());
        assert_eq!(report.roots, vec![NodeId(8)]);
        assert!(tree.contains(NodeId(7)));
    }

    #[test]
    fn import_appends_and_follows_rekeyed_targets() {
        let mut tree = MixTree::new();
        tree.add_mix(None).unwrap(); // id 1

        let document = MixDocument::from_json(
            r#"{"mixes":[{"type":"mix","id":1,"children":[{"type":"variable","id":2,"targetId":1}]}]}"#,
        )
        .unwrap();
        let report = import_mix_state(&document, &mut tree).unwrap();

        assert_eq!(tree.roots().len(), 2);
        let imported_root = report.roots[0];
        assert_ne!(imported_root, NodeId(1));
        match tree.get_node(NodeId(2)).unwrap() {
            Node::Variable(v) => assert_eq!(v.target_id, Some(imported_root)),
            other => panic!("expected variable, got {:?}", other.kind()),
        }
    }

    #[test]
    fn id_less_nodes_skip_dangling_targets() {
        let document = MixDocument::from_json(
            r#"{"mixes":[{"type":"mix","children":[{"type":"variable","id":2,"targetId":5},{"type":"chunk"}]}]}"#,
        )
        .unwrap();
        let (tree, report) = MixTree::from_document(&document).unwrap();
        assert!(!tree.contains(NodeId(5)));
        assert_eq!(report.roots, vec![NodeId(6)]);
        assert_eq!(tree.dangling_targets(), HashSet::from([NodeId(5)]));
    }

    #[test]
    fn failed_import_leaves_tree_untouched() {
        let mut tree = MixTree::new();
        let root = tree.add_mix(None).unwrap();
        let before = crate::state::export::export_mix_state(&tree);

        // Parsing fails before anything is applied.
        assert!(MixDocument::from_json(r#"{"mixes":[{"type":"mix","children":[{"type":"bogus"}]}]}"#).is_err());
        assert_eq!(crate::state::export::export_mix_state(&tree), before);
        assert!(tree.contains(root));
    }
}
