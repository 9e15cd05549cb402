//! Inventory domain model.
//!
//! # Responsibility
//! - Define the canonical product record and its write-side shape.
//! - Provide the pure field validators applied before every mutation.
//!
//! # Invariants
//! - Every stored product is identified by a storage-assigned `ProductId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod product;
pub mod validation;
