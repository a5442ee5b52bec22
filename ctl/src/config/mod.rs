//! Configuration module

pub mod env_file;
pub mod settings;
pub mod target;
