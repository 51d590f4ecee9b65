//! Cosine similarity scoring of one query vector against many documents.
//!
//! Scores are positional: one per document, same order as the input. A
//! missing query yields all zeros and a missing document vector scores 0.0;
//! both are defined defaults, not errors.

/// Substituted for a zero L2 norm so degenerate vectors score 0.0 instead of
/// dividing by zero.
const ZERO_NORM_EPSILON: f64 = 1e-8;

/// Score every document against the query.
///
/// Vectors are f32 (model output) but the math runs in f64.
pub fn cosine_similarities<'a, I>(query: Option<&[f32]>, docs: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<&'a [f32]>>,
{
    let docs = docs.into_iter();

    let query = match query {
        Some(q) => q,
        None => return docs.map(|_| 0.0).collect(),
    };

    let query_norm = non_zero(l2_norm(query));

    docs.map(|doc| match doc {
        Some(v) if !v.is_empty() => {
            let denom = non_zero(l2_norm(v)) * query_norm;
            dot(query, v) / denom
        }
        _ => 0.0,
    })
    .collect()
}

/// Round a similarity score to 3 decimal places for responses.
pub fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|x| *x as f64 * *x as f64).sum::<f64>().sqrt()
}

fn non_zero(norm: f64) -> f64 {
    if norm == 0.0 {
        ZERO_NORM_EPSILON
    } else {
        norm
    }
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_query_scores_all_zero() {
        let a = [1.0f32, 0.0];
        let b = [0.0f32, 1.0];
        let docs = vec![Some(a.as_slice()), None, Some(b.as_slice())];
        let scores = cosine_similarities(None, docs);
        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_doc_vector_scores_zero() {
        let query = [1.0f32, 0.0];
        let scores = cosine_similarities(Some(&query), vec![None]);
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_empty_doc_vector_scores_zero() {
        let query = [1.0f32, 0.0];
        let scores = cosine_similarities(Some(&query), vec![Some([].as_slice())]);
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_identical_vectors_score_one() {
        let query = [0.3f32, 0.4, 0.5];
        let scores = cosine_similarities(Some(&query), vec![Some(query.as_slice())]);
        assert!((scores[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let query = [1.0f32, 0.0];
        let scores = cosine_similarities(Some(&query), vec![Some([0.0f32, 1.0].as_slice())]);
        assert!(scores[0].abs() < 1e-9);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        let query = [1.0f32, 0.0];
        let scores = cosine_similarities(Some(&query), vec![Some([-1.0f32, 0.0].as_slice())]);
        assert!((scores[0] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_matches_manual_formula() {
        let query = [1.0f32, 2.0, 3.0];
        let doc = [4.0f32, 5.0, 6.0];

        let dot = 1.0 * 4.0 + 2.0 * 5.0 + 3.0 * 6.0;
        let expected = dot / ((14.0f64).sqrt() * (77.0f64).sqrt());

        let scores = cosine_similarities(Some(&query), vec![Some(doc.as_slice())]);
        assert!((scores[0] - expected).abs() < 1e-12);
        assert!(scores[0] > -1.0 && scores[0] < 1.0);
    }

    #[test]
    fn test_zero_norm_vectors_do_not_panic() {
        let query = [0.0f32, 0.0];
        let scores = cosine_similarities(Some(&query), vec![Some([0.0f32, 0.0].as_slice())]);
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_positional_correspondence() {
        let query = [1.0f32, 0.0];
        let a = [1.0f32, 0.0];
        let b = [0.0f32, 1.0];
        let scores = cosine_similarities(
            Some(&query),
            vec![Some(b.as_slice()), None, Some(a.as_slice())],
        );

        assert_eq!(scores.len(), 3);
        assert!(scores[0].abs() < 1e-9);
        assert_eq!(scores[1], 0.0);
        assert!((scores[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.8424999), 0.842);
        assert_eq!(round3(0.8425001), 0.843);
        assert_eq!(round3(-0.0004), -0.0);
        assert_eq!(round3(1.0), 1.0);
    }
}
