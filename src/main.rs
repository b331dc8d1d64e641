use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cibox::config::Config;
use cibox::docker::{self, ContainerSpec, DockerCli, commands::create_args};
use cibox::pipeline::{self, RunReport};

/// Run the project's build, lint and test steps inside a throwaway
/// toolchain container mounted on the current directory.
#[derive(Parser, Debug)]
#[command(name = "cibox", version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    /// Print the container and command plan as JSON without running anything
    #[arg(long)]
    dry_run: bool,

    /// Exit non-zero when a command fails (by default only container errors do)
    #[arg(long)]
    strict: bool,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[derive(Serialize)]
struct Plan<'a> {
    config: &'a Config,
    container: ContainerSpec,
    docker_create: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = Config::from_current_dir()?;
    let user = docker::current_user();

    if cli.dry_run {
        let container = ContainerSpec::from_config(&cfg, user);
        let plan = Plan {
            config: &cfg,
            docker_create: create_args(&container),
            container,
        };
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut runtime = DockerCli::connect()?;
    let report = pipeline::run(&mut runtime, &cfg, user)?;

    if let Some(path) = &cli.report {
        write_report(path, &report)?;
    }
    Ok(ExitCode::from(exit_status(&report, cli.strict)))
}

/// A failed command only changes the exit status under `--strict`.
/// Container errors never reach here: `main` returns them as `Err`.
fn exit_status(report: &RunReport, strict: bool) -> u8 {
    if strict && !report.success() { 1 } else { 0 }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cibox::pipeline::StepError;

    #[test]
    fn cli_defaults_are_lenient() {
        let cli = Cli::parse_from(["cibox"]);
        assert!(!cli.strict);
        assert!(!cli.dry_run);
        assert!(cli.report.is_none());
    }

    #[test]
    fn cli_accepts_all_flags() {
        let cli = Cli::parse_from(["cibox", "-v", "--strict", "--report", "out.json"]);
        assert!(cli.verbose);
        assert!(cli.strict);
        assert_eq!(cli.report, Some(PathBuf::from("out.json")));
    }

    fn report(failure: Option<StepError>) -> RunReport {
        let cfg = Config::for_dir("/tmp/project");
        RunReport::new(&cfg, docker::ContainerId::new("c1"), Vec::new(), failure)
    }

    fn build_failure() -> Option<StepError> {
        Some(StepError::Failed {
            command: vec!["cargo".into(), "build".into()],
            code: 101,
        })
    }

    #[test]
    fn passing_run_exits_zero_in_both_modes() {
        assert_eq!(exit_status(&report(None), false), 0);
        assert_eq!(exit_status(&report(None), true), 0);
    }

    #[test]
    fn failed_command_exits_zero_by_default() {
        assert_eq!(exit_status(&report(build_failure()), false), 0);
    }

    #[test]
    fn failed_command_exits_one_when_strict() {
        assert_eq!(exit_status(&report(build_failure()), true), 1);
    }

    #[test]
    fn write_report_produces_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let cfg = Config::for_dir(dir.path());
        let report = RunReport::new(&cfg, docker::ContainerId::new("c1"), Vec::new(), None);
        write_report(&path, &report).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["container"], "c1");
        assert_eq!(value["summary"]["total"], 5);
    }
}
