//! Actress records: the store contract, its JSON-file backend and the
//! bulk-import source reader.

pub mod store;
pub mod file_store;
pub mod import;

pub use file_store::ActressFileStore;
pub use store::ActressStore;
