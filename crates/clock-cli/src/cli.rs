//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clock_core::{Clip, SubjectId};

/// Attendance reports.
///
/// Reads clock-in/clock-out records and reports hours per subject by day,
/// by week, year to date, and as double-time credit.
#[derive(Debug, Parser)]
#[command(name = "clock", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Attendance records JSON file (`-` for stdin). Overrides the config.
    #[arg(long, global = true)]
    pub records: Option<PathBuf>,

    /// Instant used to close records still clocked in (default: now).
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hours per subject for one day.
    Day {
        /// Any instant within the day (default: today).
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Daily, weekly, and year-to-date hours for one week.
    Week {
        /// Any instant within the week (default: this week).
        #[arg(long)]
        date: Option<String>,

        /// Print a sheet for every week with attendance, newest first.
        #[arg(long, conflicts_with = "date")]
        all: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Week totals for every week with completed attendance.
    Weeks {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Double-time credit for sessions inside a window.
    DoubleTime {
        /// Window start.
        #[arg(long)]
        from: String,

        /// Window end.
        #[arg(long)]
        to: String,

        /// Minimum credited minutes (default from config).
        #[arg(long)]
        min_minutes: Option<i64>,

        /// Output as JSON.
        #[arg(long, conflicts_with = "emit_records")]
        json: bool,

        /// Output attendance rows tagged `doubletime` instead of a report.
        #[arg(long)]
        emit_records: bool,
    },

    /// List one subject's spans, optionally sliced by a window.
    Spans {
        /// Subject ID.
        #[arg(long)]
        subject: SubjectId,

        /// Window start.
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Window end.
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Clipping policy: `cc` clamps both edges, `co` clamps only the start.
        #[arg(long, default_value = "cc")]
        clip: Clip,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
