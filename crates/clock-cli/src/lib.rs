//! Attendance report CLI library.
//!
//! This crate provides the CLI interface for attendance reports.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
