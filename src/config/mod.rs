//! Configuration file loading, saving, and default materialization.

pub mod codec;
pub mod file;
pub mod path;
pub mod task;

pub use file::{ConfigFile, DefaultOutcome, LoadOutcome, SaveDefaultOptions};
pub use task::{ConfigTask, Execution};
