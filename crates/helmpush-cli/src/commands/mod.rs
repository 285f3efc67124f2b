//! CLI commands

pub mod push;
