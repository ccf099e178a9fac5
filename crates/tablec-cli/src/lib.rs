//! Library half of the `tablec` binary: argument types, commands, logging
//! and terminal summaries.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
