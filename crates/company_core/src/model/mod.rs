//! Record types and their validation rules.
//!
//! # Responsibility
//! - Define the department and employee records plus their write shapes.
//! - Keep validation pure so it runs without an open store.
//!
//! # Invariants
//! - Every record is identified by a `RecordId`.
//! - Repositories validate candidates with these rules before any write.

pub mod department;
pub mod employee;
pub mod id;
pub mod validation;
