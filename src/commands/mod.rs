pub mod remove;
pub mod restore;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub details: Vec<String>,
    pub warnings: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            details: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.warnings.push(text.into());
    }

    /// Warnings always go to stderr; details only in verbose mode.
    pub fn print(&self, verbose: bool) {
        if verbose {
            for line in &self.details {
                println!("{line}");
            }
        }
        for line in &self.warnings {
            eprintln!("gomi {}: {line}", self.command);
        }
    }
}
