//! Terminal presentation of product records.
//!
//! # Responsibility
//! - Render product sets and low-stock reports as fixed-width text lines.
//! - Apply optional ANSI colour through an explicit [`Palette`] value.
//!
//! # Invariants
//! - Rendering is pure: same input and palette always yield the same lines.
//! - Column widths are counted in characters, not bytes.

pub mod palette;
pub mod table;

pub use palette::Palette;
pub use table::{render_low_stock, render_products, truncate, TableCaption};
