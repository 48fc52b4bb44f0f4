//! Binary entry point: arguments, configuration, logging, dispatch

use crate::app::cli::{load_config_file, Args, Command, Settings, SimulateArgs};
use crate::app::display::{render_replay_step, SIMULATION_END_BANNER, SIMULATION_START_BANNER};
use crate::app::error::{AppError, AppResult};
use crate::app::shell::Shell;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::styles::{palette_to_clap, StyleRole};
use crate::queue::PrintQueueManager;
use crate::simulator::{load_events, Simulator};
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

pub fn startup() -> ExitCode {
    let help_color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let matches = Args::command()
        .styles(palette_to_clap(help_color))
        .get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not up yet
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(
        Some(&settings.log_level),
        Some(&settings.log_format),
        settings.log_file.as_ref().and_then(|p| p.to_str()),
        settings.use_color(),
    ) {
        eprintln!("Error: {}", AppError::Logging { message: e.to_string() });
        return ExitCode::FAILURE;
    }
    log::debug!("Resolved settings: {:?}", settings);

    match run(&args, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error_with_context(&e, "printqueue failed");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(args: &Args) -> AppResult<Settings> {
    let config = load_config_file(args.config_file.as_deref())?;
    Ok(Settings::resolve(args, config.as_ref())?)
}

fn run(args: &Args, settings: &Settings) -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    match args.selected_command() {
        Command::Shell => {
            let queue = Arc::new(PrintQueueManager::with_config(settings.queue)?);
            log::info!(
                "Print queue ready: capacity {}, aging every {} ticks, expiry after {} ticks",
                settings.queue.capacity,
                settings.queue.aging_interval,
                settings.queue.expiry_time
            );
            let stdout = std::io::stdout();
            let mut shell = Shell::new(queue, stdout.lock(), settings.use_color(), runtime.handle().clone())
                .with_simulation_delay(settings.delay);
            shell.run(std::io::stdin().lock())?;
            Ok(())
        }
        Command::Simulate(simulate_args) => runtime.block_on(simulate(settings, &simulate_args)),
    }
}

async fn simulate(settings: &Settings, args: &SimulateArgs) -> AppResult<()> {
    let events = load_events(&args.file).await?;
    let simulator = Simulator::new(settings.queue)?;
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(settings.delay);
    let color = settings.use_color();

    println!("{}", StyleRole::Header.paint(SIMULATION_START_BANNER, color));
    let replay = &simulator;
    let report = ShutdownCoordinator::guard(move |shutdown_rx| {
        replay.run_until_shutdown(events, delay, shutdown_rx, move |outcome, status| {
            println!("{}\n", render_replay_step(outcome, status, color));
        })
    })
    .await;
    println!("{}", StyleRole::Header.paint(SIMULATION_END_BANNER, color));

    if !report.completed {
        log::warn!(
            "Simulation interrupted after {} events",
            report.outcomes.len()
        );
    }
    if report.ignored_count() > 0 {
        log::warn!("{} event(s) skipped", report.ignored_count());
    }
    if args.json_history {
        println!("{}", serde_json::to_string_pretty(&simulator.queue().history())?);
    }
    Ok(())
}
