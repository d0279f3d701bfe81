//! AWS-oriented adapters and handlers for the bucket mirror.
//!
//! This crate owns runtime integration details (the Lambda handler, the S3
//! store adapter and logging setup) together with the listing and copy
//! stages that drive one sync run. Domain contracts live in
//! `bucket_mirror_core`, re-exported here as `runtime`.

pub mod adapters;
pub mod error;
pub mod fanout;
pub mod handlers;
pub mod listing;
pub mod logging;

pub use bucket_mirror_core as runtime;
