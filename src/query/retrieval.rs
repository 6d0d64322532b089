//! Nearest-criterion lookup over the processed store.
//!
//! Each requested (bank, product) pair gets an independent top-1 cosine
//! search over its own stored criteria. A pair without usable rows yields
//! no hit instead of an error.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::SIMILARITY_THRESHOLD;
use crate::clients::embedder::Embedder;
use crate::processing::embedding::search_top_k;
use crate::query::QueryError;
use crate::repository::CriterionReader;

/// The stored criterion closest to a query embedding.
#[derive(Debug, Clone, Serialize)]
pub struct CriterionHit {
    pub criterion: String,
    pub value: String,
    pub source_url: String,
    pub captured_at: NaiveDateTime,
    /// `1.0 - cosine_distance` against the query embedding.
    pub similarity: f32,
}

/// Result of one pair lookup, in the order the pairs were requested.
#[derive(Debug, Clone, Serialize)]
pub struct PairMatch {
    pub bank_id: i32,
    pub product_id: i32,
    pub hit: Option<CriterionHit>,
}

/// Finds the closest stored criterion per (bank, product) pair.
///
/// Rows whose embedding dimensions differ from the query are skipped with a
/// warning. A weak best match is still returned; the caller decides what to
/// do below the similarity threshold.
pub fn best_match_for_pairs<R: CriterionReader>(
    repo: &R,
    pairs: &[(i32, i32)],
    query_embedding: &[f32],
) -> Result<Vec<PairMatch>, QueryError> {
    let mut matches = Vec::with_capacity(pairs.len());

    for &(bank_id, product_id) in pairs {
        let rows = repo.list_criteria_for_pair(bank_id, product_id)?;

        let candidates: Vec<(i32, &[f32])> = rows
            .iter()
            .filter(|row| row.embedding.len() == query_embedding.len())
            .map(|row| (row.id, row.embedding.as_slice()))
            .collect();
        if candidates.len() < rows.len() {
            log::warn!(
                "Skipped {} criteria of pair ({bank_id}, {product_id}) with mismatched embedding dimensions",
                rows.len() - candidates.len()
            );
        }

        let neighbors = search_top_k(query_embedding, &candidates, 1)
            .map_err(|err| QueryError::Index(err.to_string()))?;

        let hit = neighbors.first().and_then(|&(key, distance)| {
            let id = i32::try_from(key).ok()?;
            let row = rows.iter().find(|row| row.id == id)?;
            let similarity = 1.0 - distance;
            if similarity < SIMILARITY_THRESHOLD {
                log::warn!(
                    "Nearest criterion '{}' of pair ({bank_id}, {product_id}) is weak: similarity {similarity:.3}",
                    row.criterion
                );
            }
            Some(CriterionHit {
                criterion: row.criterion.clone(),
                value: row.value.clone(),
                source_url: row.source_url.clone(),
                captured_at: row.captured_at,
                similarity,
            })
        });

        matches.push(PairMatch {
            bank_id,
            product_id,
            hit,
        });
    }

    Ok(matches)
}

/// Embeds a criterion name once and finds its best match for every pair.
pub async fn retrieve_criterion<R, E>(
    repo: &R,
    embedder: &E,
    pairs: &[(i32, i32)],
    criterion: &str,
) -> Result<Vec<PairMatch>, QueryError>
where
    R: CriterionReader,
    E: Embedder,
{
    let query_embedding = embedder.embed(criterion).await?;
    best_match_for_pairs(repo, pairs, &query_embedding)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::best_match_for_pairs;
    use crate::domain::criterion::ProcessedCriterion;
    use crate::repository::CriterionReader;
    use crate::repository::errors::RepositoryResult;

    struct FixedStore {
        rows: Vec<ProcessedCriterion>,
    }

    impl CriterionReader for FixedStore {
        fn list_criteria_for_pair(
            &self,
            bank_id: i32,
            product_id: i32,
        ) -> RepositoryResult<Vec<ProcessedCriterion>> {
            Ok(self
                .rows
                .iter()
                .filter(|row| row.bank_id == bank_id && row.product_id == product_id)
                .cloned()
                .collect())
        }
    }

    fn row(id: i32, bank_id: i32, criterion: &str, embedding: Vec<f32>) -> ProcessedCriterion {
        ProcessedCriterion {
            id,
            bank_id,
            product_id: 1,
            criterion: criterion.to_string(),
            embedding,
            source_url: "https://example.com".to_string(),
            value: "17%".to_string(),
            captured_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .expect("valid date")
                .and_hms_opt(12, 0, 0)
                .expect("valid time"),
        }
    }

    #[test]
    fn picks_the_closest_criterion_per_pair() {
        let store = FixedStore {
            rows: vec![
                row(1, 1, "срок вклада", vec![0.0, 1.0, 0.0]),
                row(2, 1, "процентная ставка", vec![1.0, 0.0, 0.0]),
                row(3, 2, "кешбэк", vec![0.9, 0.1, 0.0]),
            ],
        };

        let matches = best_match_for_pairs(&store, &[(1, 1), (2, 1)], &[1.0, 0.0, 0.0])
            .expect("search succeeds");

        assert_eq!(matches.len(), 2);
        let first = matches[0].hit.as_ref().expect("pair (1, 1) has rows");
        assert_eq!(first.criterion, "процентная ставка");
        assert!(first.similarity > 0.99);
        let second = matches[1].hit.as_ref().expect("pair (2, 1) has rows");
        assert_eq!(second.criterion, "кешбэк");
    }

    #[test]
    fn pair_without_rows_has_no_hit() {
        let store = FixedStore {
            rows: vec![row(1, 1, "процентная ставка", vec![1.0, 0.0, 0.0])],
        };

        let matches = best_match_for_pairs(&store, &[(9, 9), (1, 1)], &[1.0, 0.0, 0.0])
            .expect("search succeeds");

        assert!(matches[0].hit.is_none());
        assert!(matches[1].hit.is_some());
    }

    #[test]
    fn rows_with_mismatched_dimensions_are_skipped() {
        let store = FixedStore {
            rows: vec![
                row(1, 1, "битый вектор", vec![1.0, 0.0]),
                row(2, 1, "процентная ставка", vec![0.8, 0.2, 0.0]),
            ],
        };

        let matches = best_match_for_pairs(&store, &[(1, 1)], &[1.0, 0.0, 0.0])
            .expect("search succeeds");

        let hit = matches[0].hit.as_ref().expect("one usable row");
        assert_eq!(hit.criterion, "процентная ставка");
    }
}
