//! Configuration loading
//!
//! Builds a [`daytrace_domain::Config`] from environment variables, a config
//! file, or built-in defaults.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
