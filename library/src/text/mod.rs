pub mod delimiter;
pub mod tokenizer;

pub use delimiter::{DelimiterConfig, DelimiterMode};
pub use tokenizer::{tokenize, tokenize_with};
