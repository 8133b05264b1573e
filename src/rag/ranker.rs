//! Linear-scan cosine ranking over an in-memory corpus.

use std::cmp::Ordering;

use super::store::{ChunkRecord, ScoredChunk};
use crate::core::errors::RagError;

/// Cosine similarity of two equal-length vectors, clamped to [-1, 1].
///
/// A zero-norm operand, or any non-finite intermediate, scores `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    if score.is_finite() {
        score.clamp(-1.0, 1.0) as f32
    } else {
        0.0
    }
}

/// Top-`k` records by cosine similarity to `query`, best first.
///
/// Equal scores keep corpus order. Every record must share the query's
/// dimensionality.
pub fn rank(
    query: &[f32],
    corpus: &[ChunkRecord],
    k: usize,
) -> Result<Vec<ScoredChunk>, RagError> {
    if k == 0 || corpus.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored = Vec::with_capacity(corpus.len());
    for (index, record) in corpus.iter().enumerate() {
        if record.embedding.len() != query.len() {
            return Err(RagError::DimensionMismatch {
                index,
                expected: query.len(),
                found: record.embedding.len(),
            });
        }
        scored.push(ScoredChunk {
            text: record.text.clone(),
            score: cosine_similarity(query, &record.embedding),
        });
    }

    // stable: ties stay in insertion order
    scored.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(k);

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(left: f32, right: f32) -> bool {
        (left - right).abs() < 1e-5
    }

    fn record(text: &str, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord::new(text, embedding)
    }

    #[test]
    fn cosine_is_one_for_identical_vectors() {
        let vec = vec![1.0, 2.0, 3.0, 4.0];
        assert!(approx_eq(cosine_similarity(&vec, &vec), 1.0));

        let tiny = vec![1e-3, -2e-3, 5e-4];
        assert!(approx_eq(cosine_similarity(&tiny, &tiny), 1.0));
    }

    #[test]
    fn cosine_is_symmetric() {
        let pairs = [
            (vec![0.3, -0.7, 2.0], vec![1.5, 0.2, -0.4]),
            (vec![1.0, 0.0], vec![0.0, 1.0]),
            (vec![-2.0, 4.0, 0.5], vec![-2.0, 4.0, 0.5]),
        ];
        for (a, b) in pairs {
            assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        }
    }

    #[test]
    fn cosine_is_zero_for_orthogonal_and_negative_for_opposite() {
        assert!(approx_eq(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0));
        assert!(approx_eq(cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]), -1.0));
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn tiny_non_zero_vectors_keep_full_similarity() {
        assert!(approx_eq(cosine_similarity(&[1e-30, 0.0], &[1.0, 0.0]), 1.0));
        assert!(approx_eq(cosine_similarity(&[1e-20, 1e-20], &[1e-20, 1e-20]), 1.0));
    }

    #[test]
    fn non_finite_components_score_zero() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn ranking_returns_highest_similarity_first() {
        let query = vec![1.0, 0.0];
        let corpus = vec![
            record("close", vec![0.8, 0.2]),
            record("far", vec![0.1, 0.9]),
            record("closest", vec![0.9, 0.0]),
        ];

        let ranked = rank(&query, &corpus, 3).unwrap();

        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["closest", "close", "far"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn ranking_picks_base_over_ethereum() {
        let corpus = vec![
            record("Base is a blockchain.", vec![0.9, 0.1, 0.0]),
            record("Ethereum is a blockchain.", vec![0.1, 0.9, 0.0]),
        ];
        let ranked = rank(&[1.0, 0.05, 0.0], &corpus, 1).unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].text, "Base is a blockchain.");
    }

    #[test]
    fn ranking_length_is_min_of_k_and_corpus() {
        let corpus = vec![
            record("a", vec![1.0, 0.0]),
            record("b", vec![0.0, 1.0]),
            record("c", vec![1.0, 1.0]),
        ];
        let query = [1.0, 0.5];

        assert_eq!(rank(&query, &corpus, 2).unwrap().len(), 2);
        assert_eq!(rank(&query, &corpus, 3).unwrap().len(), 3);
        assert_eq!(rank(&query, &corpus, 10).unwrap().len(), 3);
        assert!(rank(&query, &corpus, 0).unwrap().is_empty());
    }

    #[test]
    fn empty_corpus_ranks_to_empty() {
        assert!(rank(&[1.0, 2.0], &[], 3).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let corpus = vec![
            record("first", vec![2.0, 0.0]),
            record("other", vec![0.0, 1.0]),
            record("second", vec![1.0, 0.0]),
            record("third", vec![5.0, 0.0]),
        ];

        let ranked = rank(&[1.0, 0.0], &corpus, 4).unwrap();
        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third", "other"]);
    }

    #[test]
    fn zero_norm_records_rank_with_score_zero() {
        let corpus = vec![
            record("empty", vec![0.0, 0.0]),
            record("opposite", vec![-1.0, 0.0]),
            record("match", vec![1.0, 0.0]),
        ];

        let ranked = rank(&[1.0, 0.0], &corpus, 3).unwrap();
        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["match", "empty", "opposite"]);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let corpus = vec![record("ok", vec![1.0, 0.0]), record("bad", vec![1.0, 0.0, 0.0])];

        let err = rank(&[1.0, 0.0], &corpus, 2).unwrap_err();
        match err {
            RagError::DimensionMismatch {
                index,
                expected,
                found,
            } => {
                assert_eq!((index, expected, found), (1, 2, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
