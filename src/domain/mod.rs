pub mod bank;
pub mod criterion;
pub mod product;
pub mod raw_record;
pub mod search_capture;
