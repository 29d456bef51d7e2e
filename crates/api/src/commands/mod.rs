//! Host commands - the operations exposed to the UI and the CLI

pub mod activity;
pub mod cache;

pub use activity::*;
pub use cache::*;
