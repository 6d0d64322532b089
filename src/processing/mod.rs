pub mod batch;
pub mod embedding;
pub mod extraction;
