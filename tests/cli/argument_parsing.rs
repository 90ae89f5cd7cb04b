//! CLI argument parsing tests

use clap::Parser;
use prioq::app::cli::args::*;
use std::path::PathBuf;

#[test]
fn test_global_flags_before_subcommand() {
    let args = Args::try_parse_from([
        "prioq",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--queue",
        "/data/jobs.db",
        "--priorities",
        "4",
        "stats",
        "--json",
    ])
    .unwrap();

    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.queue, Some(PathBuf::from("/data/jobs.db")));
    assert_eq!(args.priorities, Some(4));
    assert_eq!(args.command, Command::Stats { json: true });
}

#[test]
fn test_unknown_log_format_rejected() {
    let result = Args::try_parse_from(["prioq", "--log-format", "xml", "size"]);
    assert!(result.is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(Args::try_parse_from(["prioq", "--queue", "q.db"]).is_err());
}

#[test]
fn test_dequeue_count() {
    let args = Args::try_parse_from(["prioq", "dequeue", "--count", "25"]).unwrap();
    assert_eq!(args.command, Command::Dequeue { count: 25 });
}

#[test]
fn test_size_with_priority() {
    let args = Args::try_parse_from(["prioq", "size", "-p", "7"]).unwrap();
    assert_eq!(args.command, Command::Size { priority: Some(7) });
}
