pub mod id;
pub mod node;
pub mod tree;

pub use id::{IdGenerator, NodeId};
pub use node::{
    ChunkNode, DisplayState, FirstChunkBehavior, FitPolicy, LengthMode, LengthPlan, MixNode, Node,
    NodeKind, NodeSettings, OrderMode, VariableNode,
};
pub use tree::MixTree;
