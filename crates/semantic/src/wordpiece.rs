use engine::EmbeddingInput;
use serde_json::{json, Map, Value};
use tokenizers::Tokenizer;

use crate::{SemanticConfig, SemanticError};

pub const CLS_TOKEN: &str = "[CLS]";
pub const SEP_TOKEN: &str = "[SEP]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const PAD_ID: i64 = 0;

/// Builds a BERT-style WordPiece tokenizer from an in-memory vocabulary.
///
/// Token ids are the positions in `vocab`, matching a `vocab.txt` read line
/// by line. The tokenizer lower-cases and strips accents (`BertNormalizer`)
/// and splits on whitespace and punctuation (`BertPreTokenizer`). Special
/// tokens are added by [`WordPieceEncoder`], not by the tokenizer.
pub fn bert_wordpiece_tokenizer<S: AsRef<str>>(vocab: &[S]) -> Result<Tokenizer, SemanticError> {
    let mut entries = Map::with_capacity(vocab.len());
    for (id, token) in vocab.iter().enumerate() {
        entries.insert(token.as_ref().to_string(), Value::from(id as u64));
    }
    if !entries.contains_key(UNK_TOKEN) {
        return Err(SemanticError::Tokenizer(format!(
            "vocabulary has no {UNK_TOKEN} token"
        )));
    }
    let definition = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": { "type": "BertPreTokenizer" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordPiece",
            "unk_token": UNK_TOKEN,
            "continuing_subword_prefix": "##",
            "max_input_chars_per_word": 100,
            "vocab": entries
        }
    });
    let bytes =
        serde_json::to_vec(&definition).map_err(|e| SemanticError::Tokenizer(e.to_string()))?;
    Tokenizer::from_bytes(bytes).map_err(|e| SemanticError::Tokenizer(e.to_string()))
}

/// Text → fixed-length embedding model inputs.
///
/// With special tokens on, every encoding is `[CLS] tokens… [SEP]` followed
/// by padding. Over-long inputs lose their trailing subwords; `[SEP]` always
/// stays in the last attended slot. Padding uses id 0 with mask 0, and
/// segment ids are all 0.
#[derive(Clone)]
pub struct WordPieceEncoder {
    tokenizer: Tokenizer,
    max_len: usize,
    markers: Option<(i64, i64)>,
}

impl WordPieceEncoder {
    pub fn new(tokenizer: Tokenizer, cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        let markers = if cfg.add_special_tokens {
            let id = |token: &str| {
                tokenizer.token_to_id(token).map(i64::from).ok_or_else(|| {
                    SemanticError::Tokenizer(format!("vocabulary has no {token} token"))
                })
            };
            Some((id(CLS_TOKEN)?, id(SEP_TOKEN)?))
        } else {
            None
        };
        Ok(Self {
            tokenizer,
            max_len: cfg.max_sequence_length,
            markers,
        })
    }

    pub fn encode(&self, text: &str) -> Result<EmbeddingInput, SemanticError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| SemanticError::Tokenizer(e.to_string()))?;

        let mut input_ids = Vec::with_capacity(self.max_len);
        match self.markers {
            Some((cls, sep)) => {
                let body = self.max_len - 2;
                input_ids.push(cls);
                input_ids.extend(encoding.get_ids().iter().take(body).map(|&id| i64::from(id)));
                input_ids.push(sep);
            }
            None => {
                input_ids.extend(
                    encoding
                        .get_ids()
                        .iter()
                        .take(self.max_len)
                        .map(|&id| i64::from(id)),
                );
            }
        }

        let attended = input_ids.len();
        let mut attention_mask = vec![1i64; attended];
        input_ids.resize(self.max_len, PAD_ID);
        attention_mask.resize(self.max_len, 0);

        Ok(EmbeddingInput {
            input_ids,
            attention_mask,
            token_type_ids: vec![0; self.max_len],
        })
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn adds_special_tokens(&self) -> bool {
        self.markers.is_some()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

impl std::fmt::Debug for WordPieceEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPieceEncoder")
            .field("max_len", &self.max_len)
            .field("markers", &self.markers)
            .finish()
    }
}
