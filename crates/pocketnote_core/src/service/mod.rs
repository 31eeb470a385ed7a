//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own the validation rules that storage deliberately does not enforce
//!   (empty titles, non-empty notebook deletion).
//! - Derive the read views (partitions, filters) without mutating the store.
//!
//! No service performs UI notification; every failure is a structured error
//! value returned to the caller.

pub mod autosave;
pub mod note_service;
pub mod notebook_service;
pub mod settings_service;
pub mod task_service;
