// Fixed run configuration. Nothing here is read from disk.

mod types;

pub use types::{Config, DEFAULT_COMMANDS, DEFAULT_IMAGE};
