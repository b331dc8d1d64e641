use anyhow::Result;
use tracing::{debug, info};

use crate::config::Config;
use crate::docker::{ContainerId, ContainerRuntime, ContainerSpec};

use super::commands::split_command;
use super::types::{RunReport, StepError, StepResult};

/// Create and start the build container described by `cfg`.
pub fn launch<R>(runtime: &mut R, cfg: &Config, user: Option<String>) -> Result<ContainerId>
where
    R: ContainerRuntime + ?Sized,
{
    let spec = ContainerSpec::from_config(cfg, user);
    info!(
        image = %spec.image,
        work_dir = %spec.work_dir.display(),
        user = spec.user.as_deref().unwrap_or("<image default>"),
        "launching container"
    );
    runtime.create_and_start(&spec)
}

/// Run `commands` in order inside `id`, stopping at the first one that
/// exits non-zero or cannot be executed.
pub fn run_commands<R>(
    runtime: &mut R,
    id: &ContainerId,
    commands: &[String],
) -> Result<Vec<StepResult>, StepError>
where
    R: ContainerRuntime + ?Sized,
{
    let mut steps = Vec::with_capacity(commands.len());
    execute_all(runtime, id, commands, &mut steps)?;
    Ok(steps)
}

/// Stop the container. Auto-remove deletes it afterwards.
pub fn teardown<R>(runtime: &mut R, id: &ContainerId) -> Result<()>
where
    R: ContainerRuntime + ?Sized,
{
    runtime.stop(id)
}

/// Launch, run every configured command, then tear down.
///
/// Teardown happens exactly once whatever the commands did. A failing
/// command is printed before teardown and recorded in the report; it does
/// not make this return `Err`. Launch and teardown errors are returned,
/// with any earlier command failure attached to the teardown error.
pub fn run<R>(runtime: &mut R, cfg: &Config, user: Option<String>) -> Result<RunReport>
where
    R: ContainerRuntime + ?Sized,
{
    let id = launch(runtime, cfg, user)?;

    let mut steps = Vec::with_capacity(cfg.commands.len());
    let failure = execute_all(runtime, &id, &cfg.commands, &mut steps).err();
    if let Some(err) = &failure {
        println!("err: {err}");
        debug!(command = ?err.command(), "command sequence stopped early");
    }

    if let Err(e) = teardown(runtime, &id) {
        return Err(match &failure {
            Some(err) => e.context(format!("failed to stop container {id} after: {err}")),
            None => e,
        });
    }
    Ok(RunReport::new(cfg, id, steps, failure))
}

fn execute_all<R>(
    runtime: &mut R,
    id: &ContainerId,
    commands: &[String],
    steps: &mut Vec<StepResult>,
) -> Result<(), StepError>
where
    R: ContainerRuntime + ?Sized,
{
    for command in commands {
        println!("$ {command}");
        let argv = split_command(command);

        let code = match runtime.exec(id, &argv) {
            Ok(code) => code,
            Err(e) => {
                steps.push(StepResult::not_started(command));
                return Err(StepError::Exec {
                    command: argv,
                    message: format!("{e:#}"),
                });
            }
        };
        debug!(command = %command, code, "command finished");
        steps.push(StepResult::finished(command, code));

        if code != 0 {
            return Err(StepError::Failed {
                command: argv,
                code,
            });
        }
    }
    Ok(())
}
