// Container runtime boundary. `DockerCli` talks to the daemon; `MockRuntime`
// stands in for it in tests.

pub mod commands;
pub mod engine;
pub mod mock;
pub mod run;
pub mod types;

use anyhow::Result;

pub use engine::{current_user, negotiate_version};
pub use mock::MockRuntime;
pub use run::DockerCli;
pub use types::{ContainerId, ContainerSpec, Mount};

/// The three operations a run needs from a container runtime.
pub trait ContainerRuntime {
    /// Create a container from `spec` and start it.
    fn create_and_start(&mut self, spec: &ContainerSpec) -> Result<ContainerId>;

    /// Run one command inside the container with a pseudo-terminal,
    /// passing its combined output straight through to our own stdout.
    ///
    /// Returns the command's exit code. `Err` means the exec session could
    /// not be set up at all, never that the command exited non-zero.
    fn exec(&mut self, id: &ContainerId, argv: &[String]) -> Result<i32>;

    /// Stop the container without overriding the runtime's stop timeout.
    fn stop(&mut self, id: &ContainerId) -> Result<()>;
}
