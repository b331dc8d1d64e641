pub mod config;
pub mod docker;
pub mod pipeline;
