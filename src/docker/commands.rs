// Argument lists for the `docker` CLI. Kept free of side effects so they
// can be checked without a daemon.

use super::types::{ContainerId, ContainerSpec, Mount};

/// `docker create` for the long-lived build container.
pub fn create_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec!["create".to_string()];
    if spec.auto_remove {
        args.push("--rm".into());
    }
    if spec.tty {
        args.push("--tty".into());
    }
    if let Some(user) = &spec.user {
        args.extend(["--user".into(), user.clone()]);
    }
    args.extend(["--workdir".into(), spec.work_dir.display().to_string()]);
    for var in &spec.env {
        args.extend(["--env".into(), var.clone()]);
    }
    for mount in &spec.mounts {
        args.extend(["--mount".into(), mount_arg(mount)]);
    }
    args.push(spec.image.clone());
    args.extend(spec.cmd.iter().cloned());
    args
}

fn mount_arg(mount: &Mount) -> String {
    format!(
        "type=bind,source={},target={}",
        mount.source.display(),
        mount.target.display()
    )
}

pub fn start_args(id: &ContainerId) -> Vec<String> {
    vec!["start".into(), id.to_string()]
}

/// `docker exec` with a pseudo-terminal, so stdout and stderr arrive as a
/// single interleaved stream.
pub fn exec_args(id: &ContainerId, argv: &[String]) -> Vec<String> {
    let mut args = vec!["exec".into(), "--tty".into(), id.to_string()];
    args.extend(argv.iter().cloned());
    args
}

pub fn stop_args(id: &ContainerId) -> Vec<String> {
    vec!["stop".into(), id.to_string()]
}
