//! Batch pipeline turning raw capture rows into embedded criteria.
//!
//! One run selects raw records by day window and optional bank/product
//! filters, extracts criteria from each record, embeds every criterion name
//! and appends the results to the processed store. The run itself never
//! fails: every per-record and per-criterion error is logged, counted and
//! skipped.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use futures::future::join_all;

use crate::clients::embedder::Embedder;
use crate::clients::llm::StructuredCompletion;
use crate::domain::criterion::NewProcessedCriterion;
use crate::processing::embedding::normalize_embedding;
use crate::processing::extraction::CriterionExtractor;
use crate::repository::{CriterionWriter, RawRecordFilter, RawRecordReader, ReferenceReader};

/// Narrows a processing run to a subset of the raw store.
#[derive(Debug, Clone)]
pub struct ProcessFilter {
    pub bank_id: Option<i32>,
    pub product_id: Option<i32>,
    /// Restricts extraction to these criterion names. `None` or an empty
    /// list means open extraction.
    pub wanted_criteria: Option<Vec<String>>,
    /// When set, only records captured today (UTC) are processed. This is
    /// the daily-run default.
    pub only_today: bool,
}

impl Default for ProcessFilter {
    fn default() -> Self {
        Self {
            bank_id: None,
            product_id: None,
            wanted_criteria: None,
            only_today: true,
        }
    }
}

/// Counters describing one processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Raw records matched by the filter.
    pub records_matched: usize,
    /// Records whose criteria were extracted and persisted.
    pub records_processed: usize,
    /// Records dropped because extraction or persistence failed.
    pub records_failed: usize,
    /// Criteria returned by the extractor over all records.
    pub criteria_extracted: usize,
    /// Criteria embedded and written to the processed store.
    pub criteria_embedded: usize,
    /// Criteria dropped because their embedding request failed.
    pub criteria_skipped: usize,
}

impl fmt::Display for ProcessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "records_matched={}, records_processed={}, records_failed={}, criteria_extracted={}, criteria_embedded={}, criteria_skipped={}",
            self.records_matched,
            self.records_processed,
            self.records_failed,
            self.criteria_extracted,
            self.criteria_embedded,
            self.criteria_skipped,
        )
    }
}

/// Runs one batch over the raw store and returns its counters.
///
/// Bank and product names for the prompts come from the reference tables;
/// ids without a reference row fall back to `bank_<id>` / `product_<id>`
/// placeholders. Embeddings for the criteria of one record are requested
/// concurrently and normalized before persisting.
pub async fn process_raw_data<R, C, E>(
    repo: &R,
    extractor: &CriterionExtractor<C>,
    embedder: &E,
    filter: &ProcessFilter,
) -> ProcessSummary
where
    R: RawRecordReader + CriterionWriter + ReferenceReader,
    C: StructuredCompletion,
    E: Embedder,
{
    let mut summary = ProcessSummary::default();

    let raw_filter = RawRecordFilter {
        bank_id: filter.bank_id,
        product_id: filter.product_id,
        day: filter.only_today.then(|| Utc::now().date_naive()),
    };

    let records = match repo.list_raw_records(&raw_filter) {
        Ok(records) => records,
        Err(err) => {
            log::error!("Failed to list raw records: {err}");
            return summary;
        }
    };
    summary.records_matched = records.len();

    let bank_names: HashMap<i32, String> = match repo.list_banks() {
        Ok(banks) => banks.into_iter().map(|bank| (bank.id, bank.name)).collect(),
        Err(err) => {
            log::warn!("Failed to load bank names: {err}");
            HashMap::new()
        }
    };
    let product_names: HashMap<i32, String> = match repo.list_products() {
        Ok(products) => products
            .into_iter()
            .map(|product| (product.id, product.name))
            .collect(),
        Err(err) => {
            log::warn!("Failed to load product names: {err}");
            HashMap::new()
        }
    };

    let wanted = filter.wanted_criteria.as_deref().unwrap_or(&[]);

    for record in records {
        let bank_name = bank_names
            .get(&record.bank_id)
            .cloned()
            .unwrap_or_else(|| format!("bank_{}", record.bank_id));
        let product_name = product_names
            .get(&record.product_id)
            .cloned()
            .unwrap_or_else(|| format!("product_{}", record.product_id));

        let criteria = match extractor
            .extract_targeted(&record.raw_text, &bank_name, &product_name, wanted)
            .await
        {
            Ok(criteria) => criteria,
            Err(err) => {
                log::error!(
                    "Failed to extract criteria from record {}: {err}",
                    record.id
                );
                summary.records_failed += 1;
                continue;
            }
        };
        summary.criteria_extracted += criteria.len();

        if criteria.is_empty() {
            log::debug!("Record {} yielded no criteria", record.id);
            summary.records_processed += 1;
            continue;
        }

        let embeddings = join_all(
            criteria
                .iter()
                .map(|criterion| embedder.embed(&criterion.criterion)),
        )
        .await;

        let mut rows = Vec::with_capacity(criteria.len());
        for (criterion, embedding) in criteria.into_iter().zip(embeddings) {
            match embedding {
                Ok(embedding) => rows.push(NewProcessedCriterion {
                    bank_id: record.bank_id,
                    product_id: record.product_id,
                    criterion: criterion.criterion,
                    embedding: normalize_embedding(&embedding),
                    source_url: record.source_url.clone(),
                    value: criterion.value,
                    captured_at: record.captured_at,
                }),
                Err(err) => {
                    log::warn!(
                        "Skipping criterion '{}' of record {}: {err}",
                        criterion.criterion,
                        record.id
                    );
                    summary.criteria_skipped += 1;
                }
            }
        }

        if rows.is_empty() {
            summary.records_processed += 1;
            continue;
        }

        match repo.create_criteria(&rows) {
            Ok(inserted) => {
                summary.records_processed += 1;
                summary.criteria_embedded += inserted;
            }
            Err(err) => {
                log::error!(
                    "Failed to persist criteria for record {}: {err}",
                    record.id
                );
                summary.records_failed += 1;
            }
        }
    }

    summary
}
