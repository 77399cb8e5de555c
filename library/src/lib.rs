pub mod chunking;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod negatives;
pub mod random;
pub mod state;
pub mod text;
pub mod util;

pub use error::LibraryError;
pub use evaluation::{EvalEngine, GeneratedNode, generate, generate_all};
pub use model::{IdGenerator, MixTree, Node, NodeId, NodeKind};
pub use negatives::{NegativeVersions, NegativesOptions, build_versions};
pub use random::{RandomSource, SeededRandom, SequenceRandom};
pub use state::{LoadReport, MixDocument, apply_mix_state, export_mix_state, import_mix_state};

/// Parse `json_str`, load it into a fresh tree and generate every root.
pub fn generate_from_json(
    json_str: &str,
    rng: &mut dyn RandomSource,
) -> Result<Vec<GeneratedNode>, LibraryError> {
    let document = MixDocument::from_json(json_str)?;
    let (tree, _) = MixTree::from_document(&document)?;
    evaluation::generate_all(&tree, rng)
}
