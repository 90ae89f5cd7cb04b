//! Subcommand implementations
//!
//! Commands write their results to the given writer (stdout in the binary)
//! and leave diagnostics to the logger, so output can be piped.

use super::cli::args::Command;
use super::cli::error::CliError;
use crate::queue::PriorityQueue;
use serde::Serialize;
use std::io::Write;

/// Snapshot printed by `stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub path: Option<String>,
    pub priorities: u64,
    pub total: u64,
    pub buckets: Vec<BucketStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub priority: u64,
    pub size: u64,
}

impl QueueStats {
    pub fn collect(queue: &PriorityQueue) -> Result<Self, CliError> {
        let buckets: Vec<BucketStats> = queue
            .bucket_sizes()?
            .into_iter()
            .map(|(priority, size)| BucketStats { priority, size })
            .collect();
        Ok(Self {
            path: queue.path().map(|p| p.display().to_string()),
            priorities: queue.priorities(),
            total: buckets.iter().map(|b| b.size).sum(),
            buckets,
        })
    }
}

pub fn run_command(
    queue: &PriorityQueue,
    command: &Command,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Enqueue { priority, values } => {
            for value in values {
                queue
                    .enqueue_string(*priority, value)
                    .map_err(CliError::from_queue)?;
            }
            log::info!("Enqueued {} value(s) at priority {}", values.len(), priority);
        }
        Command::Dequeue { count } => {
            let mut removed = 0;
            while removed < *count {
                let Some(value) = queue.dequeue_string()? else {
                    break;
                };
                writeln!(out, "{}", value)?;
                removed += 1;
            }
            log::debug!("Dequeued {} of {} requested value(s)", removed, count);
        }
        Command::Size { priority } => {
            let size = match priority {
                Some(priority) => queue.size(*priority).map_err(CliError::from_queue)?,
                None => queue.total_size()?,
            };
            writeln!(out, "{}", size)?;
        }
        Command::Stats { json } => {
            let stats = QueueStats::collect(queue)?;
            if *json {
                let text = serde_json::to_string_pretty(&stats).map_err(|e| CliError::Usage {
                    message: format!("Could not render stats: {}", e),
                })?;
                writeln!(out, "{}", text)?;
            } else {
                write_stats_text(&stats, out)?;
            }
        }
    }
    Ok(())
}

fn write_stats_text(stats: &QueueStats, out: &mut dyn Write) -> std::io::Result<()> {
    if let Some(path) = &stats.path {
        writeln!(out, "queue:      {}", path)?;
    }
    writeln!(out, "priorities: {}", stats.priorities)?;
    writeln!(out, "total:      {}", stats.total)?;
    for bucket in &stats.buckets {
        writeln!(out, "  p{:<8} {}", bucket.priority, bucket.size)?;
    }
    Ok(())
}
