use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Check that the Docker daemon is reachable and return the API version
/// the client negotiated with it.
pub fn negotiate_version() -> Result<String> {
    let output = Command::new("docker")
        .args(["version", "--format", "{{.Server.APIVersion}}"])
        .stdin(Stdio::null())
        .output()
        .context("failed to invoke `docker`; is it installed and on PATH?")?;

    if !output.status.success() {
        bail!(
            "docker daemon is not reachable ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        bail!("docker daemon did not report an API version");
    }
    Ok(version)
}

/// Returns `uid:gid` of the invoking process on Unix so the container
/// writes files as that user. `None` on other platforms.
pub fn current_user() -> Option<String> {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() and getegid() are simple POSIX getters that always succeed and have no side effects.
        let uid = unsafe { libc::geteuid() };
        let gid = unsafe { libc::getegid() };
        Some(format!("{uid}:{gid}"))
    }

    #[cfg(not(unix))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiate_version_does_not_panic() {
        // CI may or may not have Docker.
        let _ = negotiate_version();
    }

    #[cfg(unix)]
    #[test]
    fn current_user_is_uid_gid_pair() {
        let user = current_user().unwrap();
        let (uid, gid) = user.split_once(':').unwrap();
        assert!(uid.parse::<u32>().is_ok());
        assert!(gid.parse::<u32>().is_ok());
    }
}
