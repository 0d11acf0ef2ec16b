//! CLI subcommand implementations.

pub mod day;
pub mod double_time;
pub mod spans;
pub mod util;
pub mod week;
pub mod weeks;
