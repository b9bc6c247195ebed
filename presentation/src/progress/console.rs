//! Console progress for direct tool runs

use colored::Colorize;
use runbook_application::{InvocationProgress, OutputStream};

/// Prints step headers and streamed output lines to stdout
pub struct ConsoleProgress;

impl ConsoleProgress {
    pub fn step_header(index: usize, total: usize, name: &str) -> String {
        format!(
            "{} {} is running",
            format!("Step [{}/{}]", index, total).cyan(),
            name.bold()
        )
    }

    pub fn output_line(stream: OutputStream, line: &str) -> String {
        let prefix = format!("[{}]", stream);
        let prefix = match stream {
            OutputStream::Stdout => prefix.dimmed(),
            OutputStream::Stderr => prefix.yellow(),
        };
        format!("{} {}", prefix, line)
    }
}

impl InvocationProgress for ConsoleProgress {
    fn on_step_start(&self, index: usize, total: usize, name: &str) {
        println!("{}", Self::step_header(index, total, name));
    }

    fn on_output_line(&self, stream: OutputStream, line: &str) {
        println!("{}", Self::output_line(stream, line));
    }

    fn on_step_complete(&self, index: usize, name: &str, success: bool) {
        if !success {
            println!("  {} step {} ({}) failed", "x".red(), index, name);
        }
    }
}
