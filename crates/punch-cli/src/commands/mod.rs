//! CLI subcommand implementations.

pub mod clock_in;
pub mod clock_out;
pub mod edit;
pub mod log;
pub mod projects;
pub mod status;
pub mod switch;
pub mod task;
pub mod watch;
