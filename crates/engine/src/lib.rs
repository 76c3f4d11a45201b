//! Grimsheet Engine library.
//!
//! Wires the pure domain crate to process concerns.
//!
//! ## Structure
//!
//! - `use_cases/` - Character sheet and dice operations
//! - `infrastructure/` - Ports, random sources, configuration
//! - `app` - Application composition

pub mod app;
pub mod error;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use error::EngineError;
