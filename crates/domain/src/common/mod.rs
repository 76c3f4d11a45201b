//! Common utility functions shared across the Grimsheet crates.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Minimal dependencies** - serde and serde_json only

pub mod lenient;

pub use lenient::{coerce_bool, coerce_f64, coerce_i64};
