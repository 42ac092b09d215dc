//! URL handling module for Dredge
//!
//! Canonicalization defines resource identity for the whole system: the
//! canonical string is the frontier dedup key and the index primary key.

mod canonical;

pub use canonical::{Canonicalizer, DEFAULT_TRACKING_PARAMS};
