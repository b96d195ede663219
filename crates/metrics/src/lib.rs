//! Metric name definitions for lumen.
//!
//! This crate provides a unified metrics interface using the `metrics` crate
//! facade. Crates record through the re-exported macros with the names defined
//! in [`definitions`]; the embedding application decides which recorder (if
//! any) to install, so recording stays a no-op until one exists.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumen_metrics::{applinks, counter};
//!
//! counter!(applinks::DECISIONS_TOTAL, "decision" => "show_prompt").increment(1);
//! ```

mod definitions;

pub use definitions::*;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
