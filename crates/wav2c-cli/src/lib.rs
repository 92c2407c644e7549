//! wav2c CLI library.
//!
//! This crate provides everything around the decoding engine that the
//! `wav2c` binary needs: input expansion, output naming, diagnostics setup
//! and the convert command.

pub mod commands;
pub mod input;
pub mod logging;
pub mod naming;
