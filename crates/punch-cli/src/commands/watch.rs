//! Interactive watch mode.
//!
//! Keeps the session loop in the foreground: clocks in on startup, asks
//! periodically whether you are still working, back-dates a clock-out when
//! the machine was suspended, and takes simple commands on stdin.

use std::io::Write;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use punch_core::{ReminderPrompt, format_hhmm};
use tokio::io::AsyncBufReadExt;
use tokio::time::MissedTickBehavior;

use crate::commands::{clock_in, clock_out, status, switch};
use crate::{Config, Engine};

/// One parsed line of watch-mode input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Yes,
    No,
    Out { notes: Option<String> },
    Status,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Input::Yes,
        "n" | "no" => Input::No,
        "out" => Input::Out { notes: None },
        "status" => Input::Status,
        "q" | "quit" => Input::Quit,
        _ => match line.split_once(' ') {
            Some((command, rest)) if command.eq_ignore_ascii_case("out") => Input::Out {
                notes: Some(rest.trim().to_string()),
            },
            _ => Input::Unknown,
        },
    }
}

/// Applies one line of input. Returns true when the loop should exit.
fn handle_input<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    prompt: &mut Option<ReminderPrompt>,
    input: Input,
    now: DateTime<Utc>,
) -> Result<bool> {
    match input {
        Input::Yes if prompt.is_some() => {
            *prompt = None;
            engine.reminder_response(true, now);
            writeln!(writer, "Okay, still tracking.")?;
        }
        Input::No if prompt.is_some() => {
            *prompt = None;
            if let Some(entry) = engine.reminder_response(false, now) {
                writeln!(
                    writer,
                    "Clocked out of {} ({} logged).",
                    entry.project_name,
                    format_hhmm(entry.duration())
                )?;
            }
        }
        // Answers without a pending prompt are ignored
        Input::Yes | Input::No => {}
        Input::Out { notes } => {
            *prompt = None;
            clock_out::run(writer, engine, notes, now)?;
        }
        Input::Status => status::run(writer, engine, now)?,
        Input::Quit => {
            report_exit(writer, engine)?;
            return Ok(true);
        }
        Input::Unknown => {
            writeln!(writer, "Commands: out [notes], status, quit, y/n.")?;
        }
    }
    Ok(false)
}

fn report_exit<W: Write>(writer: &mut W, engine: &Engine) -> Result<()> {
    if let Some(session) = engine.session() {
        writeln!(
            writer,
            "Exiting; {} is still clocked in. Run `punch out` to stop.",
            session.project_name
        )?;
    }
    Ok(())
}

/// Sleeps until a wall-clock instant; an instant already past returns
/// immediately.
async fn sleep_until(deadline: DateTime<Utc>) {
    let wait = (deadline - Utc::now())
        .to_std()
        .unwrap_or(StdDuration::ZERO);
    tokio::time::sleep(wait).await;
}

async fn event_loop<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    config: &Config,
    project: Option<&str>,
    task: Option<&str>,
) -> Result<()> {
    let now = Utc::now();
    if engine.session().is_some() {
        match project {
            Some(project) => switch::run(writer, engine, project, task, now)?,
            None => {
                if let Some(session) = engine.session() {
                    let started = session.clock_in.with_timezone(&Local).format("%H:%M");
                    writeln!(
                        writer,
                        "Continuing {} (clocked in at {started}).",
                        session.project_name
                    )?;
                }
            }
        }
    } else {
        clock_in::run(writer, engine, project, task, now)?;
    }
    writeln!(writer, "Watching. Commands: out [notes], status, quit.")?;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(StdDuration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = Utc::now();
    let mut prompt: Option<ReminderPrompt> = None;

    loop {
        // A pending prompt's answer window takes priority over the next
        // scheduled reminder.
        let deadline = prompt
            .as_ref()
            .map(|p| p.respond_by)
            .or_else(|| engine.reminder_due_at());

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let now = Utc::now();
                match line {
                    Ok(Some(line)) => {
                        if handle_input(writer, engine, &mut prompt, parse_input(&line), now)? {
                            break;
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed; keyboard input disabled");
                        stdin_open = false;
                    }
                }
            }
            _ = ticker.tick() => {
                let now = Utc::now();
                if now - last_tick >= config.suspend_gap() {
                    if let Some(entry) = engine.handle_suspend(last_tick) {
                        writeln!(
                            writer,
                            "Suspend detected; clocked out of {} as of {} ({} logged).",
                            entry.project_name,
                            entry.clock_out.with_timezone(&Local).format("%H:%M"),
                            format_hhmm(entry.duration())
                        )?;
                    }
                    if let Some(notice) = engine.handle_resume() {
                        writeln!(
                            writer,
                            "Welcome back. {} stopped at {}; clock in to resume.",
                            notice.project_name,
                            notice.clocked_out_at.with_timezone(&Local).format("%H:%M")
                        )?;
                    }
                    prompt = None;
                }
                last_tick = now;
            }
            () = sleep_until(deadline.unwrap_or_default()), if deadline.is_some() => {
                let now = Utc::now();
                if prompt.take().is_some() {
                    // The answer window elapsed; an unanswered prompt is a "no"
                    if let Some(entry) = engine.reminder_response(false, now) {
                        writeln!(
                            writer,
                            "No answer; clocked out of {} ({} logged).",
                            entry.project_name,
                            format_hhmm(entry.duration())
                        )?;
                    }
                } else if let Some(due) = engine.due_reminder(now) {
                    writeln!(writer, "Still working on {}? [Y/n]", due.project_name)?;
                    prompt = Some(due);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                // The session survives on purpose; recovery picks it up
                report_exit(writer, engine)?;
                break;
            }
        }
    }
    Ok(())
}

/// Runs the watch loop until quit, Ctrl-C, or an IO failure.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    config: &Config,
    project: Option<&str>,
    task: Option<&str>,
) -> Result<()> {
    let runtime =
        tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let result = runtime.block_on(event_loop(writer, engine, config, project, task));
    // The stdin reader holds a blocking read that cannot be cancelled; the
    // runtime must not wait for it.
    runtime.shutdown_background();
    result
}
