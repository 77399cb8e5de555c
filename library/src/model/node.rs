use serde::{Deserialize, Serialize};

use super::id::NodeId;
use crate::text::delimiter::DelimiterConfig;

pub const DEFAULT_LIMIT: usize = 1000;

/// How repetition and limit-fitting behave for a node.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum LengthMode {
    ExactOnce,
    Allow,
    FitSmallest,
    FitLargest,
    Dropout,
}

/// Which end of the source lengths a mix follows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FitPolicy {
    Smallest,
    Largest,
}

/// Builder/mixer parameters derived from a [`LengthMode`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LengthPlan {
    pub single_pass: bool,
    pub exact: bool,
    pub fit: FitPolicy,
    /// Overshoot with an overflow seed, then run the dropout reducer.
    pub dropout: bool,
}

impl LengthMode {
    pub fn plan(self) -> LengthPlan {
        match self {
            LengthMode::ExactOnce => LengthPlan {
                single_pass: true,
                exact: true,
                fit: FitPolicy::Largest,
                dropout: false,
            },
            LengthMode::Allow => LengthPlan {
                single_pass: false,
                exact: false,
                fit: FitPolicy::Largest,
                dropout: false,
            },
            LengthMode::FitSmallest => LengthPlan {
                single_pass: true,
                exact: false,
                fit: FitPolicy::Smallest,
                dropout: false,
            },
            LengthMode::FitLargest => LengthPlan {
                single_pass: true,
                exact: false,
                fit: FitPolicy::Largest,
                dropout: false,
            },
            LengthMode::Dropout => LengthPlan {
                single_pass: false,
                exact: false,
                fit: FitPolicy::Largest,
                dropout: true,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderMode {
    #[default]
    Canonical,
    RandomizeInterleave,
    FullRandomize,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FirstChunkBehavior {
    #[default]
    Size,
    RandomStart,
}

/// Evaluation settings shared by every node variant.
#[derive(Clone, PartialEq, Debug)]
pub struct NodeSettings {
    pub title: String,
    pub length_mode: LengthMode,
    pub order_mode: OrderMode,
    pub delimiter: DelimiterConfig,
    pub first_chunk: FirstChunkBehavior,
    pub single_pass: bool,
    pub limit: usize,
}

impl NodeSettings {
    pub fn with_length_mode(length_mode: LengthMode) -> Self {
        Self {
            title: String::new(),
            length_mode,
            order_mode: OrderMode::Canonical,
            delimiter: DelimiterConfig::default(),
            first_chunk: FirstChunkBehavior::Size,
            single_pass: false,
            limit: DEFAULT_LIMIT,
        }
    }

    /// The length plan with the node's own single-pass toggle applied.
    pub fn plan(&self) -> LengthPlan {
        let mut plan = self.length_mode.plan();
        plan.single_pass |= self.single_pass;
        plan
    }
}

/// Editor-only presentation state; never read during evaluation.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub maximized: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ChunkNode {
    pub id: NodeId,
    pub settings: NodeSettings,
    pub display: DisplayState,
    pub text: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct MixNode {
    pub id: NodeId,
    pub settings: NodeSettings,
    pub display: DisplayState,
    pub children: Vec<NodeId>,
    /// Keep child fragment boundaries; otherwise each child enters the mix
    /// as one collapsed string.
    pub preserve: bool,
}

/// Non-owning reference to another node in the same tree.
#[derive(Clone, PartialEq, Debug)]
pub struct VariableNode {
    pub id: NodeId,
    pub settings: NodeSettings,
    pub display: DisplayState,
    pub target_id: Option<NodeId>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Chunk,
    Mix,
    Variable,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeKind::Chunk => "chunk",
            NodeKind::Mix => "mix",
            NodeKind::Variable => "variable",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum Node {
    Chunk(ChunkNode),
    Mix(MixNode),
    Variable(VariableNode),
}

impl Node {
    pub fn chunk(id: NodeId, text: &str) -> Self {
        Node::Chunk(ChunkNode {
            id,
            settings: NodeSettings::with_length_mode(LengthMode::ExactOnce),
            display: DisplayState::default(),
            text: text.to_string(),
        })
    }

    pub fn mix(id: NodeId) -> Self {
        Node::Mix(MixNode {
            id,
            settings: NodeSettings::with_length_mode(LengthMode::FitSmallest),
            display: DisplayState::default(),
            children: Vec::new(),
            preserve: true,
        })
    }

    pub fn variable(id: NodeId, target_id: Option<NodeId>) -> Self {
        Node::Variable(VariableNode {
            id,
            settings: NodeSettings::with_length_mode(LengthMode::ExactOnce),
            display: DisplayState::default(),
            target_id,
        })
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Chunk(c) => c.id,
            Node::Mix(m) => m.id,
            Node::Variable(v) => v.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        match self {
            Node::Chunk(c) => c.id = id,
            Node::Mix(m) => m.id = id,
            Node::Variable(v) => v.id = id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Chunk(_) => NodeKind::Chunk,
            Node::Mix(_) => NodeKind::Mix,
            Node::Variable(_) => NodeKind::Variable,
        }
    }

    pub fn settings(&self) -> &NodeSettings {
        match self {
            Node::Chunk(c) => &c.settings,
            Node::Mix(m) => &m.settings,
            Node::Variable(v) => &v.settings,
        }
    }

    pub fn settings_mut(&mut self) -> &mut NodeSettings {
        match self {
            Node::Chunk(c) => &mut c.settings,
            Node::Mix(m) => &mut m.settings,
            Node::Variable(v) => &mut v.settings,
        }
    }

    pub fn display(&self) -> &DisplayState {
        match self {
            Node::Chunk(c) => &c.display,
            Node::Mix(m) => &m.display,
            Node::Variable(v) => &v.display,
        }
    }

    pub fn display_mut(&mut self) -> &mut DisplayState {
        match self {
            Node::Chunk(c) => &mut c.display,
            Node::Mix(m) => &mut m.display,
            Node::Variable(v) => &mut v.display,
        }
    }

    pub fn title(&self) -> &str {
        &self.settings().title
    }

    /// Owned children; only Mix nodes own anything.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Mix(m) => &m.children,
            _ => &[],
        }
    }
}
