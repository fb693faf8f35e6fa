//! Record types for the actress registry and their input validation.

pub mod errors;
pub mod actress;

pub use actress::{Actress, ActressPatch, NewActress};
