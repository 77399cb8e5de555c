//! The repetition loop shared by the chunk builder and the list mixer.

use crate::random::RandomSource;

/// Upper bound on repetitions of one cycle.
const MAX_CYCLES: usize = 100_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FillPolicy {
    pub limit: usize,
    /// Trim the overflowing fragment so the output lands exactly on `limit`.
    pub exact: bool,
    /// Stop after one full cycle.
    pub single_pass: bool,
    /// Emit the first cycle completely, then keep one overflowing fragment.
    pub overflow_seed: bool,
}

pub fn char_len(fragment: &str) -> usize {
    fragment.chars().count()
}

pub fn total_len(fragments: &[String]) -> usize {
    fragments.iter().map(|f| char_len(f)).sum()
}

/// Append cycles from `next_cycle` until the policy says stop.
///
/// Fragments are taken in order and never reordered or skipped: the first
/// one that does not fit ends the fill (trimmed with `exact`, kept whole with
/// `overflow_seed`). A cycle with no length is not repeated.
pub fn fill_cycles<F>(policy: FillPolicy, rng: &mut dyn RandomSource, mut next_cycle: F) -> Vec<String>
where
    F: FnMut(&mut dyn RandomSource) -> Vec<String>,
{
    let mut out = Vec::new();
    let mut total = 0usize;

    for cycle_index in 0..MAX_CYCLES {
        let cycle = next_cycle(&mut *rng);
        if cycle.is_empty() {
            break;
        }

        let mut cycle_len = 0usize;
        for fragment in cycle {
            let len = char_len(&fragment);
            cycle_len += len;

            if total + len <= policy.limit {
                total += len;
                out.push(fragment);
                continue;
            }

            if policy.overflow_seed {
                if cycle_index == 0 {
                    total += len;
                    out.push(fragment);
                    continue;
                }
                out.push(fragment);
                return out;
            }

            if policy.exact {
                let room = policy.limit.saturating_sub(total);
                if room > 0 {
                    out.push(fragment.chars().take(room).collect());
                }
            }
            return out;
        }

        if policy.single_pass || cycle_len == 0 || total > policy.limit {
            break;
        }
    }
    out
}
