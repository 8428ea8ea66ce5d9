use std::cmp::Ordering;

use kbsearch_core::types::SearchHit;

/// Inner product of two equal-length slices.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Rank order: higher score first, lower id on ties.
pub fn by_rank(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}

/// The `min(k, scores.len())` best hits, where `scores[i]` belongs to id `i`.
pub fn top_k(scores: &[f32], k: usize) -> Vec<SearchHit> {
    let k = k.min(scores.len());
    if k == 0 {
        return Vec::new();
    }
    let mut hits: Vec<SearchHit> = scores.iter().enumerate().map(|(id, &score)| SearchHit { id, score }).collect();
    if k < hits.len() {
        hits.select_nth_unstable_by(k - 1, by_rank);
        hits.truncate(k);
    }
    hits.sort_unstable_by(by_rank);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(hits: &[SearchHit]) -> Vec<usize> { hits.iter().map(|h| h.id).collect() }

    #[test]
    fn orders_by_score_then_id() {
        let hits = top_k(&[0.1, 0.9, 0.5, 0.9, 0.2], 5);
        assert_eq!(ids(&hits), vec![1, 3, 2, 4, 0]);
    }

    #[test]
    fn partial_selection_matches_full_sort() {
        let scores: Vec<f32> = (0..100).map(|i| ((i * 37) % 11) as f32 / 10.0).collect();
        let full = top_k(&scores, scores.len());
        for k in [1, 3, 10, 50] {
            assert_eq!(top_k(&scores, k), full[..k].to_vec(), "k={k}");
        }
    }

    #[test]
    fn caps_at_len_and_handles_zero() {
        assert_eq!(top_k(&[0.3, 0.4], 10).len(), 2);
        assert!(top_k(&[0.3, 0.4], 0).is_empty());
        assert!(top_k(&[], 3).is_empty());
    }
}
