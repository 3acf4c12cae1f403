//! Lexical stage for symptom intent classification.
//!
//! Turns raw symptom text into the fixed-length integer sequence the primary
//! classifier consumes.
//!
//! ## What we do
//!
//! - Unicode NFKC normalization and lower-casing
//! - Punctuation stripping (word characters and whitespace survive)
//! - Stop-word removal for conversational filler ("please", "help", "my", ...)
//! - Deterministic singularization (`ribs` → `rib`, `injuries` → `injury`)
//! - Vocabulary lookup with a reserved out-of-vocabulary id
//! - Post-padding / truncation to a fixed length `L`
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no locale. Same text + same config + same vocabulary
//! gives the same sequence on every machine. Neither normalizing nor
//! encoding can fail; only building a [`Vocabulary`] or a
//! [`SequenceEncoder`] validates its inputs.
//!
//! ```rust
//! use std::sync::Arc;
//! use lexical::{LexicalConfig, SequenceEncoder, Vocabulary};
//!
//! let vocab = Vocabulary::new([("chest", 2), ("hurt", 3)], 1).unwrap();
//! let encoder = SequenceEncoder::new(&LexicalConfig::default(), Arc::new(vocab)).unwrap();
//! let seq = encoder.encode_text("Please, my chest hurts!");
//! assert_eq!(&seq.as_slice()[..3], &[2, 3, 0]);
//! assert_eq!(seq.len(), 15);
//! ```

mod config;
mod error;
mod normalize;
mod sequence;
mod stem;
mod vocab;

pub use crate::config::{LexicalConfig, DEFAULT_MAX_SEQUENCE_LENGTH, DEFAULT_STOP_WORDS};
pub use crate::error::LexicalError;
pub use crate::normalize::{normalize, Normalizer};
pub use crate::sequence::{encode_tokens, EncodedSequence, SequenceEncoder};
pub use crate::stem::singularize;
pub use crate::vocab::{Vocabulary, DEFAULT_OOV_ID, PADDING_ID};
