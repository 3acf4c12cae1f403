//! Semantic fallback path for symptom intent classification.
//!
//! When the primary classifier isn't confident enough, the router asks this
//! crate instead. The raw text (not the stop-word-stripped tokens) goes
//! through BERT WordPiece tokenization, an injected sentence-embedding model,
//! and a cosine-similarity search over one anchor vector per label.
//!
//! ## Pieces
//!
//! - [`WordPieceEncoder`]: text → fixed-length `input_ids` / `attention_mask`
//!   / `token_type_ids`, wrapped as `[CLS] … [SEP]` and padded with 0
//! - [`AnchorSet`]: the label → vector table, validated on load
//! - [`SemanticMatcher`]: lazy-loads the embedding scorer, runs it, returns
//!   the nearest anchor's label and similarity
//! - [`HashEmbeddingScorer`]: deterministic stub embedder for demos and tests
//!
//! ## Encoding convention
//!
//! Sentence embedders are trained on `[CLS] tokens [SEP]` input, so that is
//! what every encode produces. Over-long input loses trailing subwords but
//! keeps `[SEP]`. `SemanticConfig::add_special_tokens = false` drops the
//! markers for a model trained without them.
//!
//! ## Quick example
//!
//! ```
//! use std::sync::Arc;
//! use semantic::{bert_wordpiece_tokenizer, SemanticConfig, WordPieceEncoder};
//!
//! let vocab = ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "burn"];
//! let cfg = SemanticConfig::default().with_max_sequence_length(6);
//! let encoder = WordPieceEncoder::new(bert_wordpiece_tokenizer(&vocab).unwrap(), &cfg).unwrap();
//! let input = encoder.encode("Burn!").unwrap();
//! assert_eq!(input.input_ids, vec![2, 4, 1, 3, 0, 0]);
//! ```

mod anchors;
mod config;
mod error;
mod matcher;
mod normalize;
mod stub;
mod wordpiece;

pub use crate::anchors::{Anchor, AnchorSet};
pub use crate::config::{SemanticConfig, DEFAULT_EMBEDDING_SEQUENCE_LENGTH};
pub use crate::error::{AnchorError, SemanticError};
pub use crate::matcher::{best_match, SemanticMatcher};
pub use crate::normalize::{cosine_similarity, l2_normalize_in_place};
pub use crate::stub::{HashEmbeddingScorer, DEFAULT_STUB_DIM};
pub use crate::wordpiece::{
    bert_wordpiece_tokenizer, WordPieceEncoder, CLS_TOKEN, PAD_ID, SEP_TOKEN, UNK_TOKEN,
};
