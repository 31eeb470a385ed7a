//! Free-text search entry points.
//!
//! # Responsibility
//! - Expose the case-insensitive substring search over notes and tasks.
//! - Keep result shaping inside core; the presentation layer only renders.

pub mod scan;
