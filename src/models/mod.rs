pub mod config;
pub mod criterion;
pub mod raw_record;
pub mod reference;
