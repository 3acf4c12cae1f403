use async_trait::async_trait;
use engine::{EmbeddingInput, EmbeddingScorer, ScorerError};
use fxhash::hash64;

use crate::normalize::l2_normalize_in_place;

/// Dimension of the MiniLM-style sentence embedders the stub stands in for.
pub const DEFAULT_STUB_DIM: usize = 384;

/// Deterministic stand-in for a sentence-embedding model.
///
/// Hashes the attended token ids and expands the hash into sinusoid values,
/// so identical token sequences always produce identical vectors and
/// different sequences almost always differ. There is no semantics behind the
/// vectors; this exists for demos and tests.
#[derive(Debug, Clone)]
pub struct HashEmbeddingScorer {
    dim: usize,
    normalize: bool,
}

impl HashEmbeddingScorer {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            normalize: true,
        }
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Synchronous form of [`EmbeddingScorer::run`].
    pub fn embed(&self, input: &EmbeddingInput) -> Vec<f32> {
        let attended: Vec<i64> = input
            .input_ids
            .iter()
            .zip(&input.attention_mask)
            .filter(|(_, mask)| **mask != 0)
            .map(|(&id, _)| id)
            .collect();
        let h = hash64(&attended);
        let mut v = vec![0f32; self.dim];
        for (idx, value) in v.iter_mut().enumerate() {
            let shifted = h.rotate_right((idx % 64) as u32) >> 40;
            *value = (shifted as f32 * 0.001 + idx as f32).sin();
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

impl Default for HashEmbeddingScorer {
    fn default() -> Self {
        Self::new(DEFAULT_STUB_DIM)
    }
}

#[async_trait]
impl EmbeddingScorer for HashEmbeddingScorer {
    async fn run(&self, input: &EmbeddingInput) -> Result<Vec<f32>, ScorerError> {
        if input.attention_mask.len() != input.input_ids.len() {
            return Err(ScorerError::new("attention_mask length differs from input_ids"));
        }
        Ok(self.embed(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ids: &[i64], len: usize) -> EmbeddingInput {
        let mut input_ids = ids.to_vec();
        let mut attention_mask = vec![1; ids.len()];
        input_ids.resize(len, 0);
        attention_mask.resize(len, 0);
        EmbeddingInput {
            input_ids,
            attention_mask,
            token_type_ids: vec![0; len],
        }
    }

    #[test]
    fn stub_dimension() {
        let scorer = HashEmbeddingScorer::default();
        assert_eq!(scorer.embed(&input(&[2, 5, 3], 8)).len(), 384);
        assert_eq!(HashEmbeddingScorer::new(16).embed(&input(&[2, 3], 8)).len(), 16);
    }

    #[test]
    fn stub_deterministic() {
        let scorer = HashEmbeddingScorer::new(32);
        assert_eq!(
            scorer.embed(&input(&[2, 7, 9, 3], 16)),
            scorer.embed(&input(&[2, 7, 9, 3], 16))
        );
    }

    #[test]
    fn padding_does_not_change_vector() {
        let scorer = HashEmbeddingScorer::new(32);
        assert_eq!(
            scorer.embed(&input(&[2, 7, 3], 8)),
            scorer.embed(&input(&[2, 7, 3], 32))
        );
    }

    #[test]
    fn different_ids_differ() {
        let scorer = HashEmbeddingScorer::new(32);
        assert_ne!(
            scorer.embed(&input(&[2, 7, 3], 8)),
            scorer.embed(&input(&[2, 8, 3], 8))
        );
    }

    #[test]
    fn stub_normalized() {
        let v = HashEmbeddingScorer::new(64).embed(&input(&[2, 11, 3], 8));
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "norm={norm}");
    }

    #[test]
    fn stub_values_in_range_without_normalization() {
        let v = HashEmbeddingScorer::new(64)
            .with_normalize(false)
            .embed(&input(&[2, 11, 3], 8));
        assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
    }

    #[tokio::test]
    async fn rejects_mismatched_mask() {
        let mut bad = input(&[2, 3], 4);
        bad.attention_mask.pop();
        assert!(HashEmbeddingScorer::default().run(&bad).await.is_err());
    }
}
