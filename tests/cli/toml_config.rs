//! CLI TOML configuration tests

use clap::Parser;
use prioq::app::cli::args::*;
use prioq::app::cli::error::CliError;
use std::path::PathBuf;
use toml::Table;

#[test]
fn test_toml_supplies_queue_and_priorities() {
    let mut args = Args::try_parse_from(["prioq", "size"]).unwrap();

    let mut config = Table::new();
    config.insert("queue".to_string(), toml::Value::String("/srv/jobs.db".into()));
    config.insert("priorities".to_string(), toml::Value::Integer(6));
    args.apply_toml_values(&config).unwrap();

    assert_eq!(args.queue_path(), Some(PathBuf::from("/srv/jobs.db")));
    assert_eq!(args.priorities_or_default(), 6);
}

#[test]
fn test_cli_overrides_toml() {
    let mut args =
        Args::try_parse_from(["prioq", "--priorities", "3", "--log-format", "ext", "size"]).unwrap();

    let mut config = Table::new();
    config.insert("priorities".to_string(), toml::Value::Integer(12));
    config.insert("log-format".to_string(), toml::Value::String("json".into()));
    args.apply_toml_values(&config).unwrap();

    assert_eq!(args.priorities, Some(3));
    assert_eq!(args.log_format.as_deref(), Some("ext"));
}

#[test]
fn test_negative_priorities_in_toml_rejected() {
    let mut args = Args::try_parse_from(["prioq", "size"]).unwrap();
    let mut config = Table::new();
    config.insert("priorities".to_string(), toml::Value::Integer(-2));

    let err = args.apply_toml_values(&config).unwrap_err();
    assert!(matches!(err, CliError::Config { .. }));
    assert!(err.to_string().contains("priorities"));
}

#[test]
fn test_toml_log_file_none_disables_file_logging() {
    let mut args = Args::try_parse_from(["prioq", "size"]).unwrap();
    let mut config = Table::new();
    config.insert("log-file".to_string(), toml::Value::String("none".into()));
    args.apply_toml_values(&config).unwrap();

    assert!(args.effective_log_file().is_none());
}
