use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use punch_cli::commands::{clock_in, clock_out, edit, log, projects, status, switch, task, watch};
use punch_cli::{Cli, Commands, Config, Engine, ProjectsAction, TaskAction};

/// Load config and wire the engine to its data directory.
fn open_engine(config_path: Option<&Path>) -> Result<(Engine, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    std::fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;

    let roster = punch_store::load_roster(&config.projects_path())
        .context("failed to load project roster")?;
    let engine = Engine::new(
        roster,
        punch_store::FileLogStore::new(config.logs_dir()),
        punch_store::FileSessionStore::new(config.session_path()),
        config.reminder(),
        Utc::now(),
    );
    Ok((engine, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support. Storage problems are
    // reported as warnings, so those stay visible by default.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::In { project, task }) => {
            let (mut engine, _config) = open_engine(cli.config.as_deref())?;
            clock_in::run(
                &mut stdout,
                &mut engine,
                project.as_deref(),
                task.as_deref(),
                Utc::now(),
            )?;
        }
        Some(Commands::Out { notes }) => {
            let (mut engine, _config) = open_engine(cli.config.as_deref())?;
            clock_out::run(&mut stdout, &mut engine, notes.clone(), Utc::now())?;
        }
        Some(Commands::Switch { project, task }) => {
            let (mut engine, _config) = open_engine(cli.config.as_deref())?;
            switch::run(&mut stdout, &mut engine, project, task.as_deref(), Utc::now())?;
        }
        Some(Commands::Status) => {
            let (engine, _config) = open_engine(cli.config.as_deref())?;
            status::run(&mut stdout, &engine, Utc::now())?;
        }
        Some(Commands::Log {
            today,
            all,
            from,
            to,
            json,
        }) => {
            let (engine, _config) = open_engine(cli.config.as_deref())?;
            let period = if *all {
                log::Period::All
            } else if *today {
                log::Period::Today
            } else if from.is_some() || to.is_some() {
                log::Period::Range {
                    from: *from,
                    to: *to,
                }
            } else {
                log::Period::Week
            };
            log::run(&mut stdout, &engine, period, *json, Local::now().date_naive())?;
        }
        Some(Commands::Edit {
            clock_out,
            project,
            task,
            duration,
        }) => {
            let (mut engine, _config) = open_engine(cli.config.as_deref())?;
            edit::run(
                &mut stdout,
                &mut engine,
                *clock_out,
                project,
                task.as_deref(),
                duration,
            )?;
        }
        Some(Commands::Projects(action)) => {
            let (mut engine, config) = open_engine(cli.config.as_deref())?;
            let roster_path = config.projects_path();
            match action {
                ProjectsAction::List { archived } => {
                    projects::list(&mut stdout, &engine, *archived)?;
                }
                ProjectsAction::Add { name, number } => {
                    projects::add(&mut stdout, &mut engine, &roster_path, name, number.clone())?;
                }
                ProjectsAction::Archive { name } => {
                    projects::archive(&mut stdout, &mut engine, &roster_path, name)?;
                }
                ProjectsAction::Restore { name } => {
                    projects::restore(&mut stdout, &mut engine, &roster_path, name)?;
                }
            }
        }
        Some(Commands::Task(action)) => {
            let (mut engine, config) = open_engine(cli.config.as_deref())?;
            match action {
                TaskAction::Add {
                    project,
                    number,
                    name,
                } => {
                    task::add(
                        &mut stdout,
                        &mut engine,
                        &config.projects_path(),
                        project,
                        number,
                        name.clone(),
                    )?;
                }
            }
        }
        Some(Commands::Watch { project, task }) => {
            let (mut engine, config) = open_engine(cli.config.as_deref())?;
            watch::run(
                &mut stdout,
                &mut engine,
                &config,
                project.as_deref(),
                task.as_deref(),
            )?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
