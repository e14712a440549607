//! Integration test suite for docfill.
//!
//! End-to-end tests that build real `.docx`/`.pptx` packages in a temporary
//! clients root, generate documents and inspect the written parts.
//!
//! # Test Modules
//!
//! - **batch**: concurrent generation and output conflicts
//! - **cli**: the `docfill` binary
//! - **generation**: context chain, computed fields and every text surface
//! - **history**: the per-folder generation log
//! - **missing_tokens**: pre-flight validation and the placeholder policy

#[path = "../common/mod.rs"]
mod common;

mod batch;
mod cli;
mod generation;
mod history;
mod missing_tokens;
