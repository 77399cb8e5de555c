//! Persisted form of a mix tree: `{ "colorPresets": [...], "mixes": [...] }`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LibraryError;
use crate::model::id::NodeId;
use crate::model::node::{DEFAULT_LIMIT, DisplayState, FirstChunkBehavior, LengthMode, NodeKind, OrderMode};
use crate::text::delimiter::DelimiterConfig;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MixDocument {
    #[serde(default)]
    pub color_presets: Vec<Value>,
    #[serde(default)]
    pub mixes: Vec<NodeState>,
}

impl MixDocument {
    pub fn from_json(json_str: &str) -> Result<Self, LibraryError> {
        let document: MixDocument = serde_json::from_str(json_str)?;
        Ok(document)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let json_str = fs::read_to_string(path)?;
        if json_str.trim().is_empty() {
            return Err(LibraryError::document(format!("{} is empty", path.display())));
        }
        Self::from_json(&json_str)
    }

    pub fn to_json(&self) -> Result<String, LibraryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, LibraryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every id the document declares, in document order.
    pub fn declared_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for state in &self.mixes {
            state.collect_ids(&mut ids);
        }
        ids
    }

    /// Every `targetId` carried by a Variable in the document.
    pub fn target_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for state in &self.mixes {
            state.collect_targets(&mut ids);
        }
        ids
    }
}

/// One serialized node. Missing fields fall back to defaults when applied;
/// `lengthMode` and `orderMode` stay optional here because their defaults
/// depend on the node type.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NodeState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(flatten)]
    pub body: NodeBody,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_mode: Option<LengthMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_mode: Option<OrderMode>,
    /// Pre-`orderMode` documents stored a single flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub randomize: Option<bool>,
    #[serde(default)]
    pub delimiter: DelimiterConfig,
    #[serde(default)]
    pub first_chunk_behavior: FirstChunkBehavior,
    #[serde(default)]
    pub single_pass: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(flatten)]
    pub display: DisplayState,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_preserve() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeBody {
    Chunk {
        #[serde(default)]
        text: String,
    },
    Mix {
        #[serde(default = "default_preserve")]
        preserve: bool,
        #[serde(default)]
        children: Vec<NodeState>,
    },
    Variable {
        #[serde(default, rename = "targetId", skip_serializing_if = "Option::is_none")]
        target_id: Option<NodeId>,
    },
}

impl NodeState {
    pub fn new(body: NodeBody) -> Self {
        Self {
            id: None,
            body,
            title: String::new(),
            length_mode: None,
            order_mode: None,
            randomize: None,
            delimiter: DelimiterConfig::default(),
            first_chunk_behavior: FirstChunkBehavior::Size,
            single_pass: false,
            limit: DEFAULT_LIMIT,
            display: DisplayState::default(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Chunk { .. } => NodeKind::Chunk,
            NodeBody::Mix { .. } => NodeKind::Mix,
            NodeBody::Variable { .. } => NodeKind::Variable,
        }
    }

    pub fn children(&self) -> &[NodeState] {
        match &self.body {
            NodeBody::Mix { children, .. } => children,
            _ => &[],
        }
    }

    fn collect_ids(&self, ids: &mut Vec<NodeId>) {
        if let Some(id) = self.id {
            ids.push(id);
        }
        for child in self.children() {
            child.collect_ids(ids);
        }
    }

    fn collect_targets(&self, ids: &mut Vec<NodeId>) {
        match &self.body {
            NodeBody::Variable {
                target_id: Some(target),
            } => ids.push(*target),
            NodeBody::Mix { children, .. } => {
                for child in children {
                    child.collect_targets(ids);
                }
            }
            _ => {}
        }
    }
}
