//! Buildwatch - build status tracking for buildbot masters
//!
//! This library provides:
//! - A per-builder oracle remembering whether the last build failed
//! - Step outcome recording and smart-clean decisions driven by that oracle
//! - A parser for the build master's transposed status grid page
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use buildwatch::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod grid;
pub mod oracle;
