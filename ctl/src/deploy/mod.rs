//! Deployment module

pub mod controller;
pub mod outcome;
