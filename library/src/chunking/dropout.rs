use super::fill::{char_len, total_len};
use crate::random::RandomSource;

/// Remove random whole fragments until the rest fits in `limit`.
///
/// Survivors keep their relative order. When nothing fits the result is
/// empty.
pub fn drop_chunks_to_limit(
    mut fragments: Vec<String>,
    limit: usize,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    let mut total = total_len(&fragments);
    while total > limit && !fragments.is_empty() {
        let index = rng.index(fragments.len());
        let removed = fragments.remove(index);
        total -= char_len(&removed);
    }
    fragments
}
