//! Node evaluator implementations, one per node variant.

pub mod chunk;
pub mod mix;
pub mod variable;

pub use chunk::ChunkEvaluator;
pub use mix::MixEvaluator;
pub use variable::VariableEvaluator;
