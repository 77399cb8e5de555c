//! Round-based interleaving of several fragment lists.

use super::fill::{FillPolicy, fill_cycles};
use crate::model::node::FitPolicy;
use crate::random::{RandomSource, shuffle};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MixOptions {
    pub limit: usize,
    pub exact_length: bool,
    /// Fresh source order for every round.
    pub randomize_list_order: bool,
    pub single_pass: bool,
    pub fit: FitPolicy,
    pub include_overflow_seed: bool,
}

impl MixOptions {
    pub fn new(limit: usize, fit: FitPolicy) -> Self {
        Self {
            limit,
            exact_length: false,
            randomize_list_order: false,
            single_pass: false,
            fit,
            include_overflow_seed: false,
        }
    }

    fn fill_policy(&self) -> FillPolicy {
        FillPolicy {
            limit: self.limit,
            exact: self.exact_length,
            // The shortest source running out ends the mix.
            single_pass: self.single_pass || self.fit == FitPolicy::Smallest,
            overflow_seed: self.include_overflow_seed,
        }
    }
}

/// Number of rounds in one mixing cycle.
fn round_count(sources: &[Vec<String>], fit: FitPolicy) -> usize {
    let lengths = sources.iter().map(Vec::len);
    match fit {
        FitPolicy::Smallest => lengths.min().unwrap_or(0),
        FitPolicy::Largest => lengths.max().unwrap_or(0),
    }
}

/// Interleave `sources` one fragment per source per round.
///
/// With `FitPolicy::Smallest` the mix halts with the shortest source and is
/// never repeated, whatever `single_pass` says (an empty source empties the
/// whole mix). With `FitPolicy::Largest` shorter sources wrap around until
/// the longest one is used up, and the cycle repeats up to the limit unless
/// `single_pass` is set. Empty-string fragments occupy their round slot like
/// any other fragment.
pub fn mix_chunk_lists(
    sources: &[Vec<String>],
    options: &MixOptions,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    let rounds = round_count(sources, options.fit);
    if rounds == 0 {
        return Vec::new();
    }

    let active: Vec<usize> = (0..sources.len())
        .filter(|&i| !sources[i].is_empty())
        .collect();
    let randomize = options.randomize_list_order;

    fill_cycles(options.fill_policy(), rng, |rng| {
        let mut cycle = Vec::with_capacity(rounds * active.len());
        for round in 0..rounds {
            let mut order = active.clone();
            if randomize {
                shuffle(rng, &mut order);
            }
            for index in order {
                let source = &sources[index];
                cycle.push(source[round % source.len()].clone());
            }
        }
        cycle
    })
}
