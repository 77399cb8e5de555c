use std::num::NonZeroUsize;
use std::sync::Mutex;

use log::{debug, warn};
use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Terminator appended to trailing text that has no delimiter of its own.
pub const SYNTHESIZED_TERMINATOR: &str = ". ";

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterMode {
    #[default]
    Comma,
    Semicolon,
    Sentence,
    Space,
    Newline,
    Custom,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DelimiterConfig {
    #[serde(default)]
    pub mode: DelimiterMode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom: String,
    /// Delimiter-terminated units merged into one fragment.
    #[serde(default = "default_group_size")]
    pub size: usize,
}

fn default_group_size() -> usize {
    1
}

impl Default for DelimiterConfig {
    fn default() -> Self {
        Self {
            mode: DelimiterMode::Comma,
            custom: String::new(),
            size: 1,
        }
    }
}

static COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(",").expect("static pattern"));
static SEMICOLON: Lazy<Regex> = Lazy::new(|| Regex::new(";").expect("static pattern"));
static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]").expect("static pattern"));
static SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("static pattern"));
static NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n").expect("static pattern"));

const CUSTOM_PATTERN_CACHE_SIZE: usize = 64;

/// Compiled custom patterns, keyed by their source text.
static CUSTOM_PATTERNS: Lazy<Mutex<LruCache<String, Regex>>> = Lazy::new(|| {
    let capacity = NonZeroUsize::new(CUSTOM_PATTERN_CACHE_SIZE).expect("CUSTOM_PATTERN_CACHE_SIZE must be > 0");
    Mutex::new(LruCache::new(capacity))
});

fn custom_regex(pattern: &str) -> Regex {
    if let Some(re) = CUSTOM_PATTERNS.lock().ok().and_then(|mut cache| cache.get(pattern).cloned()) {
        return re;
    }

    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Invalid custom delimiter '{}', matching it literally: {}", pattern, e);
            Regex::new(&regex::escape(pattern)).unwrap_or_else(|_| COMMA.clone())
        }
    };
    if let Ok(mut cache) = CUSTOM_PATTERNS.lock() {
        debug!("Caching custom delimiter '{}'", pattern);
        cache.put(pattern.to_string(), re.clone());
    }
    re
}

impl DelimiterConfig {
    pub fn new(mode: DelimiterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn custom(pattern: &str) -> Self {
        Self {
            mode: DelimiterMode::Custom,
            custom: pattern.to_string(),
            size: 1,
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn group_size(&self) -> usize {
        self.size.max(1)
    }

    /// The delimiter pattern.
    ///
    /// An empty custom pattern falls back to commas; an invalid one is
    /// matched literally. Custom patterns are compiled once and reused.
    pub fn regex(&self) -> Regex {
        match self.mode {
            DelimiterMode::Comma => COMMA.clone(),
            DelimiterMode::Semicolon => SEMICOLON.clone(),
            DelimiterMode::Sentence => SENTENCE.clone(),
            DelimiterMode::Space => SPACE.clone(),
            DelimiterMode::Newline => NEWLINE.clone(),
            DelimiterMode::Custom if self.custom.is_empty() => COMMA.clone(),
            DelimiterMode::Custom => custom_regex(&self.custom),
        }
    }
}
