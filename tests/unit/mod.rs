//! Unit test suite for docfill.
//!
//! Property-style checks of the public building blocks, one module per
//! concern:
//!
//! - **grammar**: token boundaries and e-mail safety
//! - **numbers**: the regional number convention and formatting idempotence
//! - **expressions**: computed fields and their pass bound
//! - **context**: layer precedence over a real folder hierarchy
//! - **loader**: the three data file formats

#[path = "../common/mod.rs"]
mod common;

mod context;
mod expressions;
mod grammar;
mod loader;
