//! Command implementations for the quake-rs CLI

pub mod md2;
