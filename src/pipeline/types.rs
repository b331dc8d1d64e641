use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::docker::ContainerId;

/// Why the command sequence stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepError {
    #[error("Command {command:?} failed with exit code {code}")]
    Failed { command: Vec<String>, code: i32 },

    #[error("Command {command:?} could not be executed: {message}")]
    Exec {
        command: Vec<String>,
        message: String,
    },
}

impl StepError {
    /// The argument list of the command that stopped the sequence.
    pub fn command(&self) -> &[String] {
        match self {
            StepError::Failed { command, .. } | StepError::Exec { command, .. } => command,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub command: String,
    /// `None` when the exec session never ran.
    pub exit_code: Option<i32>,
    pub status: String,
}

impl StepResult {
    pub fn finished(command: &str, code: i32) -> Self {
        Self {
            command: command.to_string(),
            exit_code: Some(code),
            status: if code == 0 { "pass" } else { "fail" }.to_string(),
        }
    }

    pub fn not_started(command: &str) -> Self {
        Self {
            command: command.to_string(),
            exit_code: None,
            status: "fail".to_string(),
        }
    }

    pub fn passed(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Commands configured, whether or not they ran.
    pub total: usize,
    pub executed: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Outcome of a whole run. Only produced when the container was started
/// and stopped cleanly; a failed command is recorded here, not returned as
/// an error.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub image: String,
    pub container: ContainerId,
    pub steps: Vec<StepResult>,
    pub failure: Option<StepError>,
    pub summary: Summary,
}

impl RunReport {
    pub fn new(
        cfg: &Config,
        container: ContainerId,
        steps: Vec<StepResult>,
        failure: Option<StepError>,
    ) -> Self {
        let passed = steps.iter().filter(|s| s.passed()).count();
        let summary = Summary {
            total: cfg.commands.len(),
            executed: steps.len(),
            passed,
            failed: steps.len() - passed,
        };
        Self {
            image: cfg.image.clone(),
            container,
            steps,
            failure,
            summary,
        }
    }

    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}
