//! Paired positive/negative term lists built from a plain item list.
//!
//! Each item is negated with a random modifier ("not cat") and also paired
//! with randomly ordered descriptors ("Polka cat"). The negative list keeps
//! every negation and then as many descriptor terms as fit the length limit.
//! The positive list repeats the items until it is as long as the negative
//! one.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunking::char_len;
use crate::model::node::DEFAULT_LIMIT;
use crate::random::{RandomSource, shuffle};

/// Joins terms in both rendered versions.
pub const TERM_SEPARATOR: &str = ", ";

pub const DEFAULT_MODIFIERS: [&str; 3] = ["not", "no", "un-"];

/// Descriptor pool used when the caller brings none.
pub const DEFAULT_DESCRIPTORS: &str = "Horrorcore, Rockabilly, Soundtrack, kid's, children's, Christmas, \
    holiday, jingle, oldies, Teen, Vocaloid, idol, K-Pop, mandarin, LGBT, Swing, Country, Anime, \
    Black Metal, Straight Edge, Psychobilly, mediocre, Parody, humorous, Comedy, Reggaetón, Drill, \
    Future Bass, Big Room House, Dubstep, Bounce, Hardstyle, Trance, Jersey Club, Footwork, Chiptune, \
    Psytrance, Moombahton, Riddim Dubstep, Tech-House, Phonk, Electro-swing, Cumbia, Tango, Bossa Nova, \
    Samba, Dancehall, Bhangra, Disco, Polka, Vaporwave, Minimal Techno, Blues, Sea Shanty, \
    Lo-fi Hip-Hop, Synthwave, K-pop";

/// Line that ends line-per-item input.
pub const END_OF_LIST: &str = "END";

static ITEM_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;,]+").expect("static pattern"));

/// Split a comma or semicolon separated list into trimmed, non-empty items.
pub fn parse_items(raw: &str) -> Vec<String> {
    ITEM_SEPARATORS
        .split(raw)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// One item per non-empty line, up to a line reading `END` in any case.
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .take_while(|line| !line.eq_ignore_ascii_case(END_OF_LIST))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Length of `terms` once joined with [`TERM_SEPARATOR`].
pub fn joined_len(terms: &[String]) -> usize {
    let separators = terms.len().saturating_sub(1) * char_len(TERM_SEPARATOR);
    terms.iter().map(|t| char_len(t)).sum::<usize>() + separators
}

/// Prefix every item with a modifier drawn independently per item.
pub fn negate_items(items: &[String], modifiers: &[String], rng: &mut dyn RandomSource) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            if modifiers.is_empty() {
                return item.clone();
            }
            let modifier = &modifiers[rng.index(modifiers.len())];
            format!("{} {}", modifier, item)
        })
        .collect()
}

/// One term per descriptor, in shuffled descriptor order, cycling the items.
pub fn descriptor_terms(items: &[String], descriptors: &[String], rng: &mut dyn RandomSource) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }
    let mut order = descriptors.to_vec();
    shuffle(rng, &mut order);
    order
        .iter()
        .enumerate()
        .map(|(i, descriptor)| format!("{} {}", descriptor, items[i % items.len()]))
        .collect()
}

/// Every negated term, then descriptor terms while the joined list fits `limit`.
///
/// The negations are kept even when they alone exceed the limit. The first
/// descriptor term that does not fit ends the list.
pub fn combine_negated_first(negated: &[String], descriptors: &[String], limit: usize) -> Vec<String> {
    let mut combined = negated.to_vec();
    let mut len = joined_len(&combined);
    for term in descriptors {
        let separator = if combined.is_empty() { 0 } else { char_len(TERM_SEPARATOR) };
        let next = len + separator + char_len(term);
        if next > limit {
            break;
        }
        combined.push(term.clone());
        len = next;
    }
    combined
}

/// Items repeated in order until there are `count` of them.
pub fn positive_terms(items: &[String], count: usize) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }
    (0..count).map(|i| items[i % items.len()].clone()).collect()
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NegativesOptions {
    /// Character budget of the joined negative list.
    pub limit: usize,
    pub modifiers: Vec<String>,
    pub descriptors: Vec<String>,
    /// Shuffle the items before anything else is drawn.
    pub shuffle_items: bool,
}

impl Default for NegativesOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            modifiers: DEFAULT_MODIFIERS.iter().map(|m| m.to_string()).collect(),
            descriptors: parse_items(DEFAULT_DESCRIPTORS),
            shuffle_items: false,
        }
    }
}

/// The two lists produced by [`build_versions`]; always the same length.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NegativeVersions {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl NegativeVersions {
    pub fn good(&self) -> String {
        self.positive.join(TERM_SEPARATOR)
    }

    pub fn bad(&self) -> String {
        self.negative.join(TERM_SEPARATOR)
    }
}

/// Build the positive and negative lists for `items`.
///
/// Draws happen in a fixed order (item shuffle when enabled, one modifier
/// per item, then the descriptor shuffle), so a seeded source reproduces
/// the result. No items gives two empty lists.
pub fn build_versions(
    items: &[String],
    options: &NegativesOptions,
    rng: &mut dyn RandomSource,
) -> NegativeVersions {
    if items.is_empty() {
        return NegativeVersions::default();
    }

    let mut items = items.to_vec();
    if options.shuffle_items {
        shuffle(rng, &mut items);
    }

    let negated = negate_items(&items, &options.modifiers, rng);
    let described = descriptor_terms(&items, &options.descriptors, rng);
    let negative = combine_negated_first(&negated, &described, options.limit);
    let positive = positive_terms(&items, negative.len());
    debug!(
        "Built {} negative terms ({} of {} descriptor terms fit in {} chars)",
        negative.len(),
        negative.len() - negated.len(),
        described.len(),
        options.limit
    );

    NegativeVersions { positive, negative }
}
