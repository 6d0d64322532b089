pub mod clients;
pub mod db;
pub mod domain;
pub mod models;
pub mod processing;
pub mod query;
pub mod repository;
pub mod schema;

/// Cosine-similarity floor below which a retrieved criterion is considered
/// a weak match.
pub const SIMILARITY_THRESHOLD: f32 = 0.8;

/// Fuzzy-ratio floor (0-100 scale) for resolving user-written entity names
/// to reference rows.
pub const MATCH_THRESHOLD: f64 = 80.0;
