//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - External process execution with captured output
//! - `shell` - Shell escaping, quoting and command-line assembly

pub mod command;
pub mod shell;
