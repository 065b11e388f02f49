//! Build status grid parsing
//!
//! Turns the build master's per-revision status grid into a flat
//! `"<revision>--<bot>"` -> `"<build_number>--<status>"` mapping.

pub mod parser;
pub mod status;

pub use parser::*;
pub use status::*;
