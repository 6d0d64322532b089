use bytemuck::cast_slice;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::criterion::{
    NewProcessedCriterion as DomainNewProcessedCriterion,
    ProcessedCriterion as DomainProcessedCriterion,
};
use crate::schema::processed_criteria;

#[derive(Debug, Queryable)]
pub struct ProcessedCriterion {
    pub id: i32,
    pub bank_id: i32,
    pub product_id: i32,
    pub criterion: String,
    pub embedding: Vec<u8>,
    pub source_url: String,
    pub value: String,
    pub captured_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = processed_criteria)]
pub struct NewProcessedCriterion {
    pub bank_id: i32,
    pub product_id: i32,
    pub criterion: String,
    pub embedding: Vec<u8>,
    pub source_url: String,
    pub value: String,
    pub captured_at: NaiveDateTime,
}

impl TryFrom<ProcessedCriterion> for DomainProcessedCriterion {
    type Error = String;

    fn try_from(row: ProcessedCriterion) -> Result<Self, Self::Error> {
        let embedding = embedding_from_blob(&row.embedding)?;

        Ok(Self {
            id: row.id,
            bank_id: row.bank_id,
            product_id: row.product_id,
            criterion: row.criterion,
            embedding,
            source_url: row.source_url,
            value: row.value,
            captured_at: row.captured_at,
        })
    }
}

impl From<DomainNewProcessedCriterion> for NewProcessedCriterion {
    fn from(criterion: DomainNewProcessedCriterion) -> Self {
        // Convert &[f32] to &[u8]
        let blob: Vec<u8> = cast_slice(&criterion.embedding).to_vec();

        Self {
            bank_id: criterion.bank_id,
            product_id: criterion.product_id,
            criterion: criterion.criterion,
            embedding: blob,
            source_url: criterion.source_url,
            value: criterion.value,
            captured_at: criterion.captured_at,
        }
    }
}

/// Reinterprets an embedding BLOB as little-endian f32 values.
///
/// The blob allocation is not guaranteed to be 4-byte aligned, so a failed
/// cast falls back to a per-value copy.
fn embedding_from_blob(blob: &[u8]) -> Result<Vec<f32>, String> {
    if blob.len() % 4 != 0 {
        return Err(format!(
            "embedding blob of {} bytes cannot be read as f32 values",
            blob.len()
        ));
    }

    Ok(match bytemuck::try_cast_slice::<u8, f32>(blob) {
        Ok(values) => values.to_vec(),
        Err(_) => blob
            .chunks_exact(4)
            .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::embedding_from_blob;
    use bytemuck::cast_slice;

    #[test]
    fn blob_round_trips_to_f32_values() {
        let embedding = [0.25_f32, -1.0, 3.5];
        let blob: Vec<u8> = cast_slice(&embedding).to_vec();

        let decoded = embedding_from_blob(&blob).expect("valid blob");

        assert_eq!(decoded, embedding);
    }

    #[test]
    fn blob_with_truncated_length_is_rejected() {
        let blob = vec![0_u8; 5];

        let error = embedding_from_blob(&blob).unwrap_err();

        assert!(error.contains("5 bytes"));
    }

    #[test]
    fn unaligned_blob_still_decodes() {
        let embedding = [1.5_f32, -2.25];
        let mut padded = vec![0_u8];
        padded.extend_from_slice(cast_slice(&embedding));

        let decoded = embedding_from_blob(&padded[1..]).expect("valid slice");

        assert_eq!(decoded, embedding);
    }
}
