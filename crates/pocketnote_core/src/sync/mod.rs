//! Portability: export document and import merge.
//!
//! # Responsibility
//! - Produce the single self-describing JSON document that is the only
//!   interchange format the system reads or writes.
//! - Merge an externally supplied document back in with last-write-wins
//!   semantics, atomically.

pub mod import;
pub mod portable;
