//! Subprocess execution adapters

mod shell_runner;

pub use shell_runner::ShellProcessRunner;
