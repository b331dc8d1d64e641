//! In-memory runtime for tests.
//!
//! Records every call and serves scripted exit codes, so the command
//! sequencing can be checked without a container daemon.

use std::collections::HashMap;

use anyhow::{Result, bail};

use super::ContainerRuntime;
use super::types::{ContainerId, ContainerSpec};

/// One call made against a [`MockRuntime`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateAndStart(ContainerSpec),
    Exec { id: ContainerId, argv: Vec<String> },
    Stop(ContainerId),
}

/// A test double that records calls and answers with pre-configured results.
#[derive(Debug, Default)]
pub struct MockRuntime {
    /// All calls made against this runtime, in order.
    pub calls: Vec<Call>,
    /// Exit codes keyed by the command joined with single spaces.
    /// Commands not listed exit 0.
    pub exit_codes: HashMap<String, i32>,
    /// Commands whose exec session cannot be set up.
    pub broken_execs: Vec<String>,
    pub fail_create: bool,
    pub fail_stop: bool,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with `code`.
    pub fn with_exit_code(mut self, command: &str, code: i32) -> Self {
        self.exit_codes.insert(command.to_string(), code);
        self
    }

    /// Make creating an exec session for `command` fail.
    pub fn with_broken_exec(mut self, command: &str) -> Self {
        self.broken_execs.push(command.to_string());
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Commands passed to `exec`, joined back with single spaces.
    pub fn executed(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Exec { argv, .. } => Some(argv.join(" ")),
                _ => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Stop(_)))
            .count()
    }
}

impl ContainerRuntime for MockRuntime {
    fn create_and_start(&mut self, spec: &ContainerSpec) -> Result<ContainerId> {
        self.calls.push(Call::CreateAndStart(spec.clone()));
        if self.fail_create {
            bail!("mock: image {} not found", spec.image);
        }
        Ok(ContainerId::new(format!("mock-{}", self.calls.len())))
    }

    fn exec(&mut self, id: &ContainerId, argv: &[String]) -> Result<i32> {
        self.calls.push(Call::Exec {
            id: id.clone(),
            argv: argv.to_vec(),
        });
        let command = argv.join(" ");
        if argv.is_empty() || self.broken_execs.contains(&command) {
            bail!("mock: cannot create exec session for '{command}'");
        }
        Ok(self.exit_codes.get(&command).copied().unwrap_or(0))
    }

    fn stop(&mut self, id: &ContainerId) -> Result<()> {
        self.calls.push(Call::Stop(id.clone()));
        if self.fail_stop {
            bail!("mock: container {id} did not stop");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn spec() -> ContainerSpec {
        ContainerSpec::from_config(&Config::for_dir("/tmp"), None)
    }

    #[test]
    fn records_calls_in_order() {
        let mut mock = MockRuntime::new();
        let id = mock.create_and_start(&spec()).unwrap();
        mock.exec(&id, &["true".to_string()]).unwrap();
        mock.stop(&id).unwrap();
        assert_eq!(mock.calls.len(), 3);
        assert!(matches!(mock.calls[0], Call::CreateAndStart(_)));
        assert_eq!(mock.executed(), vec!["true"]);
        assert_eq!(mock.stop_count(), 1);
    }

    #[test]
    fn serves_scripted_exit_codes() {
        let mut mock = MockRuntime::new().with_exit_code("cargo build", 101);
        let id = mock.create_and_start(&spec()).unwrap();
        let argv = vec!["cargo".to_string(), "build".to_string()];
        assert_eq!(mock.exec(&id, &argv).unwrap(), 101);
        assert_eq!(mock.exec(&id, &["ls".to_string()]).unwrap(), 0);
    }

    #[test]
    fn configured_failures_surface_as_errors() {
        let mut mock = MockRuntime::new()
            .failing_create()
            .failing_stop()
            .with_broken_exec("ls");
        assert!(mock.create_and_start(&spec()).is_err());
        let id = ContainerId::new("x");
        assert!(mock.exec(&id, &["ls".to_string()]).is_err());
        assert!(mock.stop(&id).is_err());
    }
}
