//! End-to-end runs of the `prioq` binary
//!
//! Every run passes an empty config file so a config in the user's home
//! directory cannot change the outcome.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("prioq.toml");
        std::fs::write(&config, "log-level = \"warn\"\n").unwrap();
        Self { dir, config }
    }

    fn queue(&self) -> PathBuf {
        self.dir.path().join("jobs.db")
    }

    fn run(&self, queue: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_prioq"))
            .arg("--config-file")
            .arg(&self.config)
            .arg("--no-color")
            .arg("--queue")
            .arg(queue)
            .arg("--priorities")
            .arg("5")
            .args(args)
            .output()
            .expect("failed to run prioq")
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(&self.queue(), args);
        assert!(
            output.status.success(),
            "prioq {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }
}

#[test]
fn test_enqueue_and_dequeue_across_runs() {
    let ws = Workspace::new();

    ws.stdout(&["enqueue", "-p", "1", "first", "second"]);
    ws.stdout(&["enqueue", "-p", "4", "urgent"]);
    assert!(ws.queue().exists(), "queue file must survive the process");

    assert_eq!(ws.stdout(&["size"]), "3\n");
    assert_eq!(ws.stdout(&["size", "-p", "1"]), "2\n");
    assert_eq!(ws.stdout(&["dequeue", "--count", "2"]), "urgent\nfirst\n");
    assert_eq!(ws.stdout(&["dequeue", "--count", "10"]), "second\n");
    assert_eq!(ws.stdout(&["dequeue"]), "");
    assert_eq!(ws.stdout(&["size"]), "0\n");
}

#[test]
fn test_stats_json_output() {
    let ws = Workspace::new();
    ws.stdout(&["enqueue", "-p", "2", "a", "b"]);
    ws.stdout(&["enqueue", "-p", "0", "c"]);

    let stats: serde_json::Value = serde_json::from_str(&ws.stdout(&["stats", "--json"])).unwrap();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["priorities"], 5);
    assert_eq!(stats["buckets"][0]["priority"], 2);
    assert_eq!(stats["buckets"][0]["size"], 2);
    assert_eq!(stats["buckets"][1]["priority"], 0);
}

#[test]
fn test_out_of_range_priority_fails() {
    let ws = Workspace::new();
    let output = ws.run(&ws.queue(), &["enqueue", "-p", "5", "nope"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid priority 5"), "stderr: {}", stderr);
}

#[test]
fn test_missing_config_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_prioq"))
        .args(["--config-file", "/no/such/prioq.toml", "size"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_directory_queue_path_creates_file() {
    let ws = Workspace::new();
    let dir = ws.dir.path().join("spool");
    let dir_arg = format!("{}/", dir.display());

    let output = ws.run(Path::new(&dir_arg), &["enqueue", "x"]);
    assert!(output.status.success());

    let files: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("pq") && files[0].ends_with(".db"));
}

#[test]
fn test_priority_count_comes_from_existing_file() {
    let ws = Workspace::new();
    let queue = ws.queue();
    let run = |extra: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_prioq"))
            .arg("--config-file")
            .arg(&ws.config)
            .arg("--no-color")
            .arg("--queue")
            .arg(&queue)
            .args(extra)
            .output()
            .unwrap()
    };

    assert!(run(&["-n", "300", "enqueue", "-p", "3", "job"]).status.success());

    // no --priorities: the file's own count (300) is used, not the default
    let output = run(&["stats", "--json"]);
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["priorities"], 300);
    assert_eq!(stats["total"], 1);

    // an explicit, different count is refused
    let output = run(&["-n", "10", "size"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("300 priorities"), "stderr: {}", stderr);

    let output = run(&["dequeue"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "job\n");
}
