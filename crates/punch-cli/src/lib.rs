//! Punch clock CLI library.
//!
//! This crate provides the command-line interface for the punch time
//! tracker: argument parsing, configuration, and the command handlers.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ProjectsAction, TaskAction};
pub use config::Config;

use punch_core::SessionEngine;
use punch_store::{FileLogStore, FileSessionStore};

/// The engine wired to on-disk storage, as every command uses it.
pub type Engine = SessionEngine<FileLogStore, FileSessionStore>;
