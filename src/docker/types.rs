use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;

/// Opaque handle the runtime hands back after creating a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A host path exposed inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mount {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Mount {
    /// Read-write bind mount.
    pub fn bind(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Everything needed to create the build container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSpec {
    pub image: String,
    /// `uid:gid`, or the image's default user when `None`.
    pub user: Option<String>,
    pub work_dir: PathBuf,
    pub env: Vec<String>,
    pub cmd: Vec<String>,
    pub tty: bool,
    pub auto_remove: bool,
    pub mounts: Vec<Mount>,
}

impl ContainerSpec {
    /// The project directory is mounted at the same path and used as the
    /// working directory, so paths in tool output match the host.
    pub fn from_config(cfg: &Config, user: Option<String>) -> Self {
        Self {
            image: cfg.image.clone(),
            user,
            work_dir: cfg.work_dir.clone(),
            env: cfg.env.clone(),
            cmd: cfg.keep_alive.clone(),
            tty: true,
            auto_remove: true,
            mounts: vec![Mount::bind(&cfg.work_dir, &cfg.work_dir)],
        }
    }
}
