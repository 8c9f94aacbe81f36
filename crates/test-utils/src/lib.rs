//! Shared test utilities for the flood forecast workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic dataset generators producing newline-delimited JSON rows
//! - Fixtures mirroring the datasets the services load in production
//! - Temporary config file helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{detailed_fixture, series};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

use std::io::Write;

/// Write `contents` to a named temporary file that lives as long as the handle.
pub fn write_temp_file(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}
