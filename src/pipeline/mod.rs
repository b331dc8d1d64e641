pub mod commands;
pub mod orchestrator;
mod types;

pub use commands::split_command;
pub use orchestrator::{launch, run, run_commands, teardown};
pub use types::{RunReport, StepError, StepResult, Summary};
