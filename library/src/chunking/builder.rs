use super::fill::{FillPolicy, fill_cycles};
use crate::model::node::FirstChunkBehavior;
use crate::random::{RandomSource, shuffle};
use crate::text::delimiter::DelimiterConfig;
use crate::text::tokenizer::tokenize_with;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChunkListOptions {
    pub limit: usize,
    pub exact_length: bool,
    /// Reshuffle the token cycle once per repetition.
    pub randomize_order: bool,
    pub single_pass: bool,
    pub first_chunk: FirstChunkBehavior,
    pub include_overflow_seed: bool,
}

impl ChunkListOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            exact_length: false,
            randomize_order: false,
            single_pass: false,
            first_chunk: FirstChunkBehavior::Size,
            include_overflow_seed: false,
        }
    }

    fn fill_policy(&self) -> FillPolicy {
        FillPolicy {
            limit: self.limit,
            exact: self.exact_length,
            single_pass: self.single_pass,
            overflow_seed: self.include_overflow_seed,
        }
    }
}

/// Expand one source text into a length-bounded fragment sequence by
/// cycling its tokens.
pub fn build_chunk_list(
    text: &str,
    delimiter: &DelimiterConfig,
    options: &ChunkListOptions,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    let tokens = tokenize_with(text, delimiter, options.first_chunk, rng);
    if tokens.is_empty() {
        return Vec::new();
    }

    let randomize = options.randomize_order;
    fill_cycles(options.fill_policy(), rng, |rng| {
        let mut cycle = tokens.clone();
        if randomize {
            shuffle(rng, &mut cycle);
        }
        cycle
    })
}
