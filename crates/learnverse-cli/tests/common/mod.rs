//! Helpers for running the `learnverse` binary in isolation.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// A private data dir plus the API URL the binary should talk to.
pub struct Sandbox {
    pub data_dir: TempDir,
    pub api: String,
}

impl Sandbox {
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            data_dir: TempDir::new().expect("Failed to create temp dir"),
            api: api.into(),
        }
    }

    /// Seed the credential file as a previous run would have left it.
    pub fn with_credentials(self, json: serde_json::Value) -> Self {
        let path = self.data_dir.path().join("credentials.json");
        std::fs::write(path, serde_json::to_vec_pretty(&json).unwrap()).unwrap();
        self
    }

    pub fn credentials(&self) -> serde_json::Value {
        let path = self.data_dir.path().join("credentials.json");
        let content = std::fs::read_to_string(path).unwrap_or_else(|_| "{}".to_string());
        serde_json::from_str(&content).unwrap()
    }

    /// Run the binary; blocking, so call from `spawn_blocking` under tokio.
    pub fn run(&self, args: &[&str]) -> Output {
        run_cli(args, self.data_dir.path(), &self.api)
    }
}

pub fn run_cli(args: &[&str], data_dir: &Path, api: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_learnverse"));
    cmd.args(args);
    cmd.env("LEARNVERSE_API", api);
    cmd.env("LEARNVERSE_DATA_DIR", data_dir);
    cmd.env_remove("LEARNVERSE_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert success and return stdout.
pub fn success(args: &[&str], output: &Output) -> String {
    if !output.status.success() {
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr(output));
    }
    stdout(output)
}
