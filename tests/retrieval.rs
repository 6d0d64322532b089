//! Integration tests for nearest-criterion retrieval over the processed store.

mod common;

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use bank_criteria::clients::embedder::{Embedder, EmbedderError};
use bank_criteria::domain::criterion::NewProcessedCriterion;
use bank_criteria::query::retrieval::{best_match_for_pairs, retrieve_criterion};
use bank_criteria::repository::{CriterionWriter, DieselRepository};

use crate::common::TestDb;

/// Embedder fake returning one fixed vector and counting its calls.
struct CountingEmbedder {
    embedding: Vec<f32>,
    calls: Mutex<usize>,
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedderError> {
        *self.calls.lock().expect("calls mutex poisoned") += 1;
        Ok(self.embedding.clone())
    }
}

fn seeded_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

fn criterion_row(
    bank_id: i32,
    product_id: i32,
    criterion: &str,
    value: &str,
    embedding: Vec<f32>,
) -> NewProcessedCriterion {
    NewProcessedCriterion {
        bank_id,
        product_id,
        criterion: criterion.to_string(),
        embedding,
        source_url: "https://www.banki.ru/products".to_string(),
        value: value.to_string(),
        captured_at: seeded_at(),
    }
}

#[test]
fn closest_row_wins_per_pair() {
    let db = TestDb::new();
    let repo = DieselRepository::new(db.pool());

    repo.create_criteria(&[
        criterion_row(1, 1, "срок вклада", "от 3 лет", vec![0.0, 1.0, 0.0]),
        criterion_row(1, 1, "процентная ставка", "17%", vec![1.0, 0.0, 0.0]),
        criterion_row(2, 1, "процентная ставка", "15%", vec![0.9, 0.1, 0.0]),
    ])
    .expect("Failed to insert criteria.");

    let matches = best_match_for_pairs(&repo, &[(1, 1), (2, 1)], &[1.0, 0.0, 0.0])
        .expect("Failed to search criteria.");

    assert_eq!(matches.len(), 2);
    assert_eq!((matches[0].bank_id, matches[0].product_id), (1, 1));
    let first = matches[0].hit.as_ref().expect("pair (1, 1) has rows");
    assert_eq!(first.criterion, "процентная ставка");
    assert_eq!(first.value, "17%");
    assert_eq!(first.captured_at, seeded_at());
    assert!(first.similarity > 0.99);

    let second = matches[1].hit.as_ref().expect("pair (2, 1) has rows");
    assert_eq!(second.value, "15%");
    assert!(second.similarity > 0.9);
}

#[test]
fn pair_without_rows_has_no_hit() {
    let db = TestDb::new();
    let repo = DieselRepository::new(db.pool());

    repo.create_criteria(&[criterion_row(
        1,
        1,
        "процентная ставка",
        "17%",
        vec![1.0, 0.0, 0.0],
    )])
    .expect("Failed to insert criteria.");

    let matches = best_match_for_pairs(&repo, &[(9, 9), (1, 1)], &[1.0, 0.0, 0.0])
        .expect("Failed to search criteria.");

    assert!(matches[0].hit.is_none());
    assert!(matches[1].hit.is_some());
}

#[test]
fn stored_rows_with_other_dimensions_are_ignored() {
    let db = TestDb::new();
    let repo = DieselRepository::new(db.pool());

    repo.create_criteria(&[
        criterion_row(1, 1, "вектор другой размерности", "10%", vec![1.0, 0.0]),
        criterion_row(1, 1, "процентная ставка", "17%", vec![0.8, 0.2, 0.0]),
    ])
    .expect("Failed to insert criteria.");

    let matches = best_match_for_pairs(&repo, &[(1, 1)], &[1.0, 0.0, 0.0])
        .expect("Failed to search criteria.");

    let hit = matches[0].hit.as_ref().expect("one usable row");
    assert_eq!(hit.criterion, "процентная ставка");
}

#[test]
fn duplicate_rows_still_yield_a_single_hit() {
    let db = TestDb::new();
    let repo = DieselRepository::new(db.pool());
    let row = criterion_row(1, 1, "процентная ставка", "17%", vec![1.0, 0.0, 0.0]);

    repo.create_criteria(&[row.clone(), row])
        .expect("Failed to insert criteria.");

    let matches = best_match_for_pairs(&repo, &[(1, 1)], &[1.0, 0.0, 0.0])
        .expect("Failed to search criteria.");

    let hit = matches[0].hit.as_ref().expect("duplicated rows still match");
    assert_eq!(hit.value, "17%");
}

#[tokio::test]
async fn retrieve_criterion_embeds_the_query_once() {
    let db = TestDb::new();
    let repo = DieselRepository::new(db.pool());

    repo.create_criteria(&[
        criterion_row(1, 1, "процентная ставка", "17%", vec![1.0, 0.0, 0.0]),
        criterion_row(2, 1, "процентная ставка", "15%", vec![1.0, 0.0, 0.0]),
        criterion_row(3, 1, "процентная ставка", "14%", vec![1.0, 0.0, 0.0]),
    ])
    .expect("Failed to insert criteria.");

    let embedder = CountingEmbedder {
        embedding: vec![1.0, 0.0, 0.0],
        calls: Mutex::new(0),
    };

    let matches = retrieve_criterion(&repo, &embedder, &[(1, 1), (2, 1), (3, 1)], "ставка")
        .await
        .expect("Failed to retrieve criterion.");

    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|pair| pair.hit.is_some()));
    assert_eq!(*embedder.calls.lock().expect("calls mutex poisoned"), 1);
}
