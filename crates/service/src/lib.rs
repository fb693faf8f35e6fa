//! Service layer for the actress registry.
//! - `storage` holds the generic JSON snapshot store and its atomic writes.
//! - `actress` exposes the `ActressStore` contract and its file backend.
//! - Validation rules live in the `models` crate and are reused here.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod actress;
