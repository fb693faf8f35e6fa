//! Storage abstractions for service layer
//!
//! File-backed record storage keyed by integer id, persisted as one JSON
//! snapshot that also carries the id high-water mark.

pub mod json_record_store;

pub use json_record_store::{JsonRecordStore, Keyed, Records};
