//! Weekly time tracking from the terminal. Log hours against projects, give every project a
//! weekly min/target/max and see each week reconciled against your budget.
//!
//! The core is [engine]: every change goes through a [Command](engine::Command) applied to an
//! immutable [AppState](engine::AppState). [metrics] derives the weekly figures and [storage]
//! keeps the profile on disk.

pub mod cli;
pub mod engine;
pub mod fs;
pub mod metrics;
pub mod model;
pub mod storage;
pub mod utils;
