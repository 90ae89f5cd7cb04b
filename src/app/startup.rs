//! Application startup
//!
//! Parses arguments, merges the configuration file, starts logging and runs
//! the requested command against the queue file. The queue is always opened
//! with retention on: an operator tool must never delete a queue on exit.
//! Unless `--priorities` is given, an existing file is opened with the
//! priority count it was created with.

use super::cli::args::Args;
use super::cli::config::load_config_file;
use super::cli::error::CliError;
use super::commands::run_command;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::queue::{PriorityQueue, QueueError, QueueOptions};
use clap::Parser;

/// Run the binary and return the process exit code
pub async fn startup() -> i32 {
    restore_default_sigpipe();

    let mut args = Args::parse();
    match load_config_file(args.config_file.as_deref()).await {
        Ok(Some(config)) => {
            if let Err(err) = args.apply_toml_values(&config) {
                eprintln!("Error in configuration file: {}", err);
                return 1;
            }
        }
        Ok(None) => {}
        Err(err) => {
            eprintln!("Error: {}", err);
            return 1;
        }
    }

    let color = args.use_color();
    colored::control::set_override(color);
    if let Err(err) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        args.effective_log_file(),
        color,
    ) {
        eprintln!("Error: could not initialise logging: {}", err);
        return 1;
    }
    log::debug!("Final arguments: {:?}", args);

    match run(args).await {
        Ok(()) => 0,
        Err(err) => {
            log_error_with_context(&err, "Queue command failed");
            1
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let path = args.queue_path().ok_or_else(|| CliError::Config {
        message: "No queue file given and no data directory available; use --queue".to_string(),
    })?;
    let priorities = args.priorities_or_default();
    // without an explicit count, existing files keep the one they were created with
    let options = QueueOptions::new()
        .retain_on_close(true)
        .adopt_stored_priorities(args.priorities.is_none());

    tokio::task::spawn_blocking(move || -> Result<(), CliError> {
        // a trailing separator names the directory itself
        let directory = if path.to_string_lossy().ends_with(std::path::MAIN_SEPARATOR) {
            Some(path.as_path())
        } else {
            path.parent().filter(|p| !p.as_os_str().is_empty())
        };
        if let Some(directory) = directory {
            std::fs::create_dir_all(directory)?;
        }
        let queue =
            PriorityQueue::open_with(&path, priorities, options).map_err(CliError::from_queue)?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let outcome = run_command(&queue, &args.command, &mut out);
        queue.close()?;
        outcome
    })
    .await
    .map_err(|err| {
        CliError::Queue(QueueError::Internal {
            message: format!("command task failed: {}", err),
        })
    })?
}

/// Exit quietly when stdout is a closed pipe (`prioq dequeue -C 100 | head`)
fn restore_default_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
