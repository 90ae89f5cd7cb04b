//! Logging setup on flexi_logger
//!
//! The binary initialises logging once at startup; the library itself only
//! emits through the `log` macros.

use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

// dropping the handle would stop the logger
static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `time LVL message`
    #[default]
    Text,
    /// `time LVL message (module/file.rs:line)`
    Extended,
    /// one JSON object per line
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to [`LogFormat::Text`]
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("ext") => LogFormat::Extended,
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&Path>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut logger = Logger::try_with_str(log_level.unwrap_or("info"))?;

    logger = match (LogFormat::from_name(log_format), color_enabled) {
        (LogFormat::Json, _) => logger.format(json_format),
        (LogFormat::Extended, true) => logger.format(extended_color_format),
        (LogFormat::Extended, false) => logger.format(extended_format),
        (LogFormat::Text, true) => logger.format(simple_color_format),
        (LogFormat::Text, false) => logger.format(simple_format),
    };

    if let Some(file_path) = log_file {
        logger = logger.log_to_file(FileSpec::try_from(file_path)?);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));
    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn colored_level(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    let abbr = level_abbr(level);
    match level {
        log::Level::Error => abbr.red().bold(),
        log::Level::Warn => abbr.yellow(),
        log::Level::Info => abbr.green(),
        log::Level::Debug => abbr.blue(),
        log::Level::Trace => abbr.magenta(),
    }
}

fn timestamp(now: &mut DeferredNow) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

fn simple_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        timestamp(now),
        level_abbr(record.level()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        timestamp(now).dimmed(),
        colored_level(record.level()),
        record.args()
    )
}

fn extended_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        timestamp(now),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {} ({})",
        timestamp(now).dimmed(),
        colored_level(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn json_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let line = serde_json::json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line()),
    });

    // compact, flexi_logger adds the line break
    match serde_json::to_string(&line) {
        Ok(json) => w.write_all(json.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

/// `prioq::queue::engine` at line 42 becomes `queue/engine.rs:42`
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("prioq::") {
        Some(module) => module.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };
    match line {
        Some(line) => format!("{}:{}", path_like, line),
        None => path_like,
    }
}
