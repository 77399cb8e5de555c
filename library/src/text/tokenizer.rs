//! Delimiter-aware splitting of source text into re-joinable fragments.

use regex::Regex;

use super::delimiter::{DelimiterConfig, SYNTHESIZED_TERMINATOR};
use crate::model::node::FirstChunkBehavior;
use crate::random::RandomSource;

/// Split `text` on `delimiter` matches.
///
/// With `keep_delimiters` each fragment keeps its delimiter and the
/// whitespace right after it, so fragments concatenate back without a
/// separator. Trailing text without a delimiter gets
/// [`SYNTHESIZED_TERMINATOR`]. `group_size` units are merged per fragment.
/// `RandomStart` rotates the units by one random offset before grouping.
pub fn tokenize(
    text: &str,
    keep_delimiters: bool,
    delimiter: &Regex,
    group_size: usize,
    first_chunk: FirstChunkBehavior,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut units = if keep_delimiters {
        split_keeping(text, delimiter)
    } else {
        split_dropping(text, delimiter)
    };

    if first_chunk == FirstChunkBehavior::RandomStart && units.len() > 1 {
        let offset = rng.index(units.len());
        units.rotate_left(offset);
    }

    let group_size = group_size.max(1);
    if group_size == 1 {
        return units;
    }
    units.chunks(group_size).map(|group| group.concat()).collect()
}

/// Tokenize with the delimiter settings of a node.
pub fn tokenize_with(
    text: &str,
    config: &DelimiterConfig,
    first_chunk: FirstChunkBehavior,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    tokenize(
        text,
        true,
        &config.regex(),
        config.group_size(),
        first_chunk,
        rng,
    )
}

fn delimiter_spans(text: &str, delimiter: &Regex) -> Vec<(usize, usize)> {
    delimiter
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| (m.start(), m.end()))
        .collect()
}

fn split_keeping(text: &str, delimiter: &Regex) -> Vec<String> {
    let spans = delimiter_spans(text, delimiter);
    let mut units = Vec::with_capacity(spans.len() + 1);
    let mut pos = 0;

    for (index, &(_, match_end)) in spans.iter().enumerate() {
        // Whitespace belongs to this unit up to where the next delimiter starts
        let bound = spans.get(index + 1).map_or(text.len(), |next| next.0);
        let mut end = match_end;
        for ch in text[match_end..bound].chars() {
            if !ch.is_whitespace() {
                break;
            }
            end += ch.len_utf8();
        }
        units.push(text[pos..end].to_string());
        pos = end;
    }

    let rest = &text[pos..];
    if !rest.is_empty() {
        match units.last_mut() {
            Some(last) if rest.trim().is_empty() => last.push_str(rest),
            _ => units.push(format!("{}{}", rest.trim_end(), SYNTHESIZED_TERMINATOR)),
        }
    }
    units
}

fn split_dropping(text: &str, delimiter: &Regex) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut pos = 0;
    for (start, end) in delimiter_spans(text, delimiter) {
        pieces.push(text[pos..start].trim().to_string());
        pos = end;
    }
    let rest = text[pos..].trim();
    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }
    pieces
}
