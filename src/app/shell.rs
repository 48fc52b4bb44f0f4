//! Interactive command shell driving one queue instance
//!
//! Reads one command per line until `quit`, `exit` or end of input, then
//! shuts the queue down. Replays started with `simulate` run against a
//! separate queue so the shell's own jobs are left untouched.

use crate::app::display::{
    render_history_table, render_replay_step, render_status, SIMULATION_END_BANNER,
    SIMULATION_START_BANNER,
};
use crate::core::styles::StyleRole;
use crate::queue::{JobRequest, PrintQueueManager, QueueConfig, QueueError};
use crate::simulator::{load_events, Simulator};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};
use tokio::runtime::Handle;

pub const PROMPT: &str = "(print-queue) ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Enqueue,
    Batch,
    Print,
    Tick,
    Status,
    History,
    Simulate,
    Help,
    #[strum(serialize = "quit", serialize = "exit")]
    Quit,
}

impl Verb {
    fn usage(self) -> &'static str {
        match self {
            Verb::Enqueue => "enqueue <user> <job> <priority>",
            Verb::Batch => "batch <user:job:priority>...",
            Verb::Print => "print",
            Verb::Tick => "tick [count]",
            Verb::Status => "status",
            Verb::History => "history [json]",
            Verb::Simulate => "simulate <file>",
            Verb::Help => "help",
            Verb::Quit => "quit | exit",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Verb::Enqueue => "Add a print job (0 is the most urgent priority)",
            Verb::Batch => "Add several jobs at once",
            Verb::Print => "Print the most urgent job",
            Verb::Tick => "Advance time, then show the queue",
            Verb::Status => "Show the queue",
            Verb::History => "Show the event history",
            Verb::Simulate => "Replay a JSON events file on a fresh queue",
            Verb::Help => "Show this help",
            Verb::Quit => "Shut the queue down and leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Enqueue(JobRequest),
    Batch(Vec<JobRequest>),
    Print,
    Tick(u32),
    Status,
    History { json: bool },
    Simulate(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellParseError {
    #[error("No command given")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("Invalid arguments. Usage: {0}")]
    Usage(&'static str),
}

// user:job:priority
fn parse_batch_entry(entry: &str) -> Option<JobRequest> {
    let mut parts = entry.splitn(3, ':');
    let user = parts.next()?;
    let job = parts.next()?;
    let priority = parts.next()?.parse::<i64>().ok()?;
    Some(JobRequest::new(user, job, priority))
}

impl FromStr for ShellCommand {
    type Err = ShellParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(ShellParseError::Empty)?;
        let verb =
            Verb::from_str(word).map_err(|_| ShellParseError::UnknownCommand(word.to_string()))?;
        let rest: Vec<&str> = words.collect();
        let usage = || ShellParseError::Usage(verb.usage());

        match verb {
            Verb::Enqueue => match rest.as_slice() {
                [user, job, priority] => {
                    let priority = priority.parse::<i64>().map_err(|_| usage())?;
                    Ok(ShellCommand::Enqueue(JobRequest::new(*user, *job, priority)))
                }
                _ => Err(usage()),
            },
            Verb::Batch if rest.is_empty() => Err(usage()),
            Verb::Batch => rest
                .iter()
                .map(|entry| parse_batch_entry(entry))
                .collect::<Option<Vec<_>>>()
                .map(ShellCommand::Batch)
                .ok_or_else(usage),
            Verb::Tick => match rest.as_slice() {
                [] => Ok(ShellCommand::Tick(1)),
                [count] => count
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(ShellCommand::Tick)
                    .ok_or_else(usage),
                _ => Err(usage()),
            },
            Verb::History => match rest.as_slice() {
                [] => Ok(ShellCommand::History { json: false }),
                [format] if format.eq_ignore_ascii_case("json") => {
                    Ok(ShellCommand::History { json: true })
                }
                _ => Err(usage()),
            },
            Verb::Simulate => match rest.as_slice() {
                [path] => Ok(ShellCommand::Simulate(PathBuf::from(path))),
                _ => Err(usage()),
            },
            Verb::Print => Ok(ShellCommand::Print),
            Verb::Status => Ok(ShellCommand::Status),
            Verb::Help => Ok(ShellCommand::Help),
            Verb::Quit => Ok(ShellCommand::Quit),
        }
    }
}

pub fn help_text(color: bool) -> String {
    let width = Verb::iter().map(|v| v.usage().len()).max().unwrap_or(0);
    let mut text = StyleRole::Header.paint("Commands:", color);
    for verb in Verb::iter() {
        let usage = format!("{:<width$}", verb.usage(), width = width);
        text.push_str(&format!(
            "\n  {}  {}",
            StyleRole::Literal.paint(&usage, color),
            verb.summary()
        ));
    }
    text
}

pub struct Shell<W: Write> {
    queue: Arc<PrintQueueManager>,
    out: W,
    color: bool,
    runtime: Handle,
    simulation_config: QueueConfig,
    simulation_delay: Duration,
}

impl<W: Write> Shell<W> {
    /// `runtime` runs `simulate` replays; the shell itself never enters it
    pub fn new(queue: Arc<PrintQueueManager>, out: W, color: bool, runtime: Handle) -> Self {
        let simulation_config = *queue.config();
        Self {
            queue,
            out,
            color,
            runtime,
            simulation_config,
            simulation_delay: Duration::ZERO,
        }
    }

    pub fn with_simulation_delay(mut self, delay: Duration) -> Self {
        self.simulation_delay = delay;
        self
    }

    pub fn queue(&self) -> &Arc<PrintQueueManager> {
        &self.queue
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read and execute commands until quit or end of input
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        let result = self.command_loop(input);
        self.queue.shutdown();
        log::info!("shell closed at time {}", self.queue.current_time());
        result
    }

    fn command_loop<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            StyleRole::Header.paint("Print queue shell. Type 'help' for commands.", self.color)
        )?;

        let mut lines = input.lines();
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                return Ok(());
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ShellCommand>() {
                Ok(ShellCommand::Quit) => return Ok(()),
                Ok(command) => self.execute(command)?,
                Err(e) => self.error(&e.to_string())?,
            }
        }
    }

    fn say(&mut self, role: StyleRole, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", role.paint(text, self.color))
    }

    fn error(&mut self, text: &str) -> io::Result<()> {
        self.say(StyleRole::Error, text)
    }

    pub fn execute(&mut self, command: ShellCommand) -> io::Result<()> {
        log::debug!("shell command: {:?}", command);
        match command {
            ShellCommand::Enqueue(request) => {
                let job_id = request.job_id.clone();
                match self.queue.submit(request) {
                    Ok(()) => self.say(StyleRole::Success, &format!("Added job {}", job_id)),
                    Err(QueueError::QueueFull { .. }) => self.error("Queue is full!"),
                    Err(e) => self.error(&e.to_string()),
                }
            }
            ShellCommand::Batch(requests) => {
                let result = self.queue.submit_batch(&requests);
                let summary = format!(
                    "Batch submit: {} succeeded, {} failed",
                    result.success_count, result.failed_count
                );
                if result.failed_jobs.is_empty() {
                    self.say(StyleRole::Success, &summary)
                } else {
                    self.say(StyleRole::Warning, &summary)?;
                    self.say(
                        StyleRole::Warning,
                        &format!("Rejected: {}", result.failed_jobs.join(", ")),
                    )
                }
            }
            ShellCommand::Print => match self.queue.dequeue(false) {
                Some(job) => {
                    if let Err(e) = self.queue.complete(job.job_id()) {
                        log::warn!("could not complete {}: {}", job.job_id(), e);
                    }
                    self.say(
                        StyleRole::Success,
                        &format!("Printed job {} from {}", job.job_id(), job.user_id()),
                    )
                }
                None => self.say(StyleRole::Warning, "No jobs available to print"),
            },
            ShellCommand::Tick(count) => {
                let mut expired = Vec::new();
                for _ in 0..count {
                    expired.extend(self.queue.tick().expired_jobs);
                }
                if !expired.is_empty() {
                    self.say(StyleRole::Warning, &format!("Expired: {}", expired.join(", ")))?;
                }
                self.show_status()
            }
            ShellCommand::Status => self.show_status(),
            ShellCommand::History { json: true } => {
                let json = serde_json::to_string_pretty(&self.queue.history())
                    .map_err(io::Error::other)?;
                writeln!(self.out, "{}", json)
            }
            ShellCommand::History { json: false } => {
                let table = render_history_table(&self.queue.history(), self.color);
                writeln!(self.out, "{}", table)
            }
            ShellCommand::Simulate(path) => self.simulate(&path),
            ShellCommand::Help => {
                let help = help_text(self.color);
                writeln!(self.out, "{}", help)
            }
            ShellCommand::Quit => Ok(()),
        }
    }

    fn show_status(&mut self) -> io::Result<()> {
        let status = render_status(&self.queue.status(true), self.color);
        writeln!(self.out, "{}", status)
    }

    fn simulate(&mut self, path: &Path) -> io::Result<()> {
        let events = match self.runtime.block_on(load_events(path)) {
            Ok(events) => events,
            Err(e) => return self.error(&format!("Simulation failed: {}", e)),
        };
        let simulator = match Simulator::new(self.simulation_config) {
            Ok(simulator) => simulator,
            Err(e) => return self.error(&format!("Simulation failed: {}", e)),
        };

        self.say(StyleRole::Header, SIMULATION_START_BANNER)?;
        let color = self.color;
        let out = &mut self.out;
        let mut write_result = Ok(());
        let report = self.runtime.block_on(simulator.run(
            events,
            self.simulation_delay,
            |outcome, status| {
                if write_result.is_ok() {
                    write_result =
                        writeln!(out, "{}\n", render_replay_step(outcome, status, color));
                }
            },
        ));
        write_result?;

        if report.ignored_count() > 0 {
            self.say(
                StyleRole::Warning,
                &format!("{} event(s) skipped", report.ignored_count()),
            )?;
        }
        self.say(StyleRole::Header, SIMULATION_END_BANNER)
    }
}
