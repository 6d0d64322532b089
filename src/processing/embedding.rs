//! Embedding math shared by the batch processor and the retrieval engine.
//!
//! Vectors come from the external embedding service and are stored per
//! criterion; similarity search runs over an in-memory usearch index built
//! from the candidates of a single (bank, product) pair.

use std::error::Error;

use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

/// Normalize a vector to unit length.
///
/// Returns the original vector when the norm is zero.
pub(crate) fn normalize_embedding(vec: &[f32]) -> Vec<f32> {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        vec.to_vec()
    } else {
        vec.iter().map(|x| x / norm).collect()
    }
}

/// Search the top-k closest vectors to the query embedding.
///
/// Keys are the row ids of the candidate criteria; distances are cosine
/// distances, so `1.0 - distance` is the similarity. Ties keep the
/// insertion order of `items`.
pub(crate) fn search_top_k<'a, T>(
    query_embedding: &[f32],
    items: &'a [(i32, T)],
    k: usize,
) -> Result<Vec<(u64, f32)>, Box<dyn Error>>
where
    T: AsRef<[f32]> + 'a,
{
    if items.is_empty() || k == 0 {
        return Ok(Vec::new());
    }

    let dim = query_embedding.len();

    let index = Index::new(&IndexOptions {
        dimensions: dim,
        metric: MetricKind::Cos,
        quantization: ScalarKind::F32,
        ..Default::default()
    })?;

    index.reserve(items.len())?;

    for (id, embedding) in items {
        index.add(*id as u64, embedding.as_ref())?;
    }

    let neighbors = index.search(query_embedding, k)?;

    let results: Vec<(u64, f32)> = neighbors
        .keys
        .iter()
        .zip(neighbors.distances.iter())
        .map(|(&key, &distance)| (key, distance))
        .collect();

    Ok(results)
}
