//! Generates shell scripts that synchronize a list of subdirectories between
//! two directory trees in both directions.

/// Command line arguments.
pub mod args;
/// Optional RON settings for the generated scripts.
pub mod config;
/// Parses specification files into descriptors.
pub mod descriptor;
/// Renders descriptors into scripts and writes them out.
pub mod emitter;
pub mod error;
/// Runs parsing and emitting over every input of an invocation.
pub mod generate;
/// Path helpers shared by the other modules.
pub mod utils;

pub use config::GenConfig;
pub use descriptor::SyncDescriptor;
pub use error::{GenError, Result};
pub use generate::{Generator, Report};
