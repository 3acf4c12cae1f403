use std::collections::BTreeMap;

use fxhash::FxHashMap;

use crate::error::LexicalError;

/// Id reserved for padding in every encoded sequence.
pub const PADDING_ID: u32 = 0;

/// Out-of-vocabulary id used by Keras-style tokenizers (`<OOV>` → 1).
pub const DEFAULT_OOV_ID: u32 = 1;

/// Word → token id table for the primary classifier.
///
/// Lookups are pure and total: unknown words resolve to the reserved OOV id.
/// Id `0` is the padding sentinel and may not appear in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    words: FxHashMap<String, u32>,
    oov_id: u32,
}

impl Vocabulary {
    /// Builds a vocabulary from `(word, id)` pairs.
    ///
    /// A word listed twice with different ids is rejected, as is any use of
    /// the padding id.
    pub fn new<I, S>(entries: I, oov_id: u32) -> Result<Self, LexicalError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        if oov_id == PADDING_ID {
            return Err(LexicalError::InvalidVocabulary(
                "oov id collides with the padding id 0".into(),
            ));
        }

        let mut words = FxHashMap::default();
        for (word, id) in entries {
            let word = word.into();
            if id == PADDING_ID {
                return Err(LexicalError::InvalidVocabulary(format!(
                    "word {word:?} maps to the padding id 0"
                )));
            }
            if let Some(previous) = words.insert(word.clone(), id) {
                if previous != id {
                    return Err(LexicalError::InvalidVocabulary(format!(
                        "word {word:?} mapped to both {previous} and {id}"
                    )));
                }
            }
        }

        Ok(Self { words, oov_id })
    }

    /// Parses a Keras `word_index` JSON object (`{"<OOV>": 1, "pain": 2, ...}`).
    ///
    /// The id of `oov_token` becomes the reserved OOV id.
    pub fn from_json_str(json: &str, oov_token: &str) -> Result<Self, LexicalError> {
        let index: BTreeMap<String, u32> = serde_json::from_str(json)?;
        let oov_id = *index.get(oov_token).ok_or_else(|| {
            LexicalError::InvalidVocabulary(format!("oov token {oov_token:?} missing from index"))
        })?;
        Self::new(index, oov_id)
    }

    /// Resolves `word` to its id, or the OOV id when absent.
    #[inline]
    pub fn lookup(&self, word: &str) -> u32 {
        self.words.get(word).copied().unwrap_or(self.oov_id)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn oov_id(&self) -> u32 {
        self.oov_id
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
