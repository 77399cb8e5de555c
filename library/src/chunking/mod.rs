//! Fragment-sequence construction: building, mixing and dropout.

pub mod builder;
pub mod dropout;
pub mod fill;
pub mod mixer;

pub use builder::{ChunkListOptions, build_chunk_list};
pub use dropout::drop_chunks_to_limit;
pub use fill::{FillPolicy, char_len, total_len};
pub use mixer::{MixOptions, mix_chunk_lists};
