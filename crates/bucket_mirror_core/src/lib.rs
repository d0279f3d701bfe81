//! Shared bucket mirror domain primitives.
//!
//! This crate owns the listing/copy contracts, copy-source encoding and the
//! static mirror configuration. It intentionally excludes AWS SDK and Lambda
//! runtime concerns.

pub mod config;
pub mod contract;
pub mod copy_source;
