use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info, warn};

use super::ContainerRuntime;
use super::commands::{create_args, exec_args, start_args, stop_args};
use super::engine::negotiate_version;
use super::types::{ContainerId, ContainerSpec};

/// Drives the daemon through the `docker` client binary.
#[derive(Debug)]
pub struct DockerCli {
    api_version: String,
}

impl DockerCli {
    /// Connect to the daemon. Fails if it is unreachable.
    pub fn connect() -> Result<Self> {
        let api_version = negotiate_version()?;
        info!(api_version = %api_version, "connected to docker daemon");
        Ok(Self { api_version })
    }
}

impl ContainerRuntime for DockerCli {
    fn create_and_start(&mut self, spec: &ContainerSpec) -> Result<ContainerId> {
        let stdout = docker_output(&create_args(spec))
            .with_context(|| format!("failed to create container from {}", spec.image))?;
        if stdout.is_empty() {
            bail!("docker create did not return a container id");
        }
        let id = ContainerId::new(stdout);
        debug!(container = %id, api_version = %self.api_version, "container created");

        if let Err(e) = docker_output(&start_args(&id)) {
            // Auto-remove only fires on stop, so this container stays behind.
            warn!(container = %id, "created container was never started and is left in place");
            return Err(e.context(format!("failed to start container {id}")));
        }
        info!(container = %id, image = %spec.image, "container started");
        Ok(id)
    }

    fn exec(&mut self, id: &ContainerId, argv: &[String]) -> Result<i32> {
        if argv.is_empty() {
            bail!("cannot exec an empty command");
        }
        let status = Command::new("docker")
            .args(exec_args(id, argv))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to start exec session in {id}"))?;

        exec_outcome(status.code(), argv)
    }

    fn stop(&mut self, id: &ContainerId) -> Result<()> {
        docker_output(&stop_args(id)).with_context(|| format!("failed to stop container {id}"))?;
        info!(container = %id, "container stopped");
        Ok(())
    }
}

/// `docker exec` exits 125 when the CLI or daemon rejects the request, so no
/// session ever ran. Anything else is the command's own exit code.
const DOCKER_EXEC_ERROR: i32 = 125;

fn exec_outcome(code: Option<i32>, argv: &[String]) -> Result<i32> {
    match code {
        Some(DOCKER_EXEC_ERROR) => bail!("docker could not start an exec session for {argv:?}"),
        Some(code) => Ok(code),
        None => Err(anyhow!("exec session for {argv:?} was terminated by a signal")),
    }
}

/// Run a short-lived `docker` subcommand and return its trimmed stdout.
fn docker_output(args: &[String]) -> Result<String> {
    let sub = args.first().map(String::as_str).unwrap_or_default();
    debug!(args = ?args, "docker");
    let output = Command::new("docker")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to invoke `docker {sub}`"))?;

    if !output.status.success() {
        bail!(
            "`docker {sub}` failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv() -> Vec<String> {
        vec!["cargo".into(), "test".into()]
    }

    #[test]
    fn command_exit_codes_pass_through() {
        assert_eq!(exec_outcome(Some(0), &argv()).unwrap(), 0);
        assert_eq!(exec_outcome(Some(101), &argv()).unwrap(), 101);
        assert_eq!(exec_outcome(Some(127), &argv()).unwrap(), 127);
    }

    #[test]
    fn docker_exec_error_means_no_session() {
        let err = exec_outcome(Some(125), &argv()).unwrap_err();
        assert!(err.to_string().contains("could not start an exec session"));
    }

    #[test]
    fn signal_termination_is_an_error() {
        assert!(exec_outcome(None, &argv()).is_err());
    }
}
