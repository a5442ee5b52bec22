//! Host storage module

pub mod layout;
