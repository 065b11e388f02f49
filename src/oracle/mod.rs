//! Build status oracle
//!
//! Remembers per builder whether the last build failed, and derives the
//! step-level decisions that depend on it.

pub mod flag;
pub mod step;

pub use flag::*;
pub use step::*;
