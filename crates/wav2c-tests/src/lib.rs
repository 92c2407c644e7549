//! wav2c End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the decoding engine and the
//! convert command:
//!
//! - **Decoding**: chunk dispatch, format parsing and error reporting
//! - **Conversion**: output files, naming and batch behavior
//! - **Properties**: arbitrary input never panics and ordering rules hold
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wav2c-tests
//! ```
//!
//! Test inputs are built in memory with [`fixtures::WavBuilder`] and, where a
//! file is needed, written into a [`fixtures::WavFixture`] directory.

pub mod fixtures;
