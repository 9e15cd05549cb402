//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw operator input into validated repository calls.
//! - Keep the dispatcher decoupled from storage details.

pub mod inventory_service;
