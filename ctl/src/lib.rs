//! botops library
//!
//! Deployment lifecycle and diagnostics for the summarizer bot container.

pub mod analysis;
pub mod cancel;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod health;
pub mod logs;
pub mod monitor;
pub mod runtime;
pub mod storage;
pub mod utils;
