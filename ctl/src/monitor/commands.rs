//! Monitor command set
//!
//! Every diagnostic operation is a member of one enumerated set; the
//! interactive loop and the single-shot path both dispatch through it.

use std::fmt;

/// A diagnostic command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    /// Container state and health summary
    Status,

    /// Recent log tail
    Logs,

    /// Error/warning classification over the full log
    Errors,

    /// Blocking live log stream
    Follow,

    /// Restart the container
    Restart,

    /// Static command reference
    Commands,

    /// Leave the interactive loop
    Exit,
}

/// Operations accepted by `monitor <op>` (single-shot form)
pub const SINGLE_SHOT_OPS: &[&str] = &["status", "logs", "errors", "commands"];

impl MonitorCommand {
    /// Parse a single-shot operation name. Long-running and mutating
    /// commands are interactive-only.
    pub fn from_op(op: &str) -> Option<Self> {
        match op {
            "status" => Some(MonitorCommand::Status),
            "logs" => Some(MonitorCommand::Logs),
            "errors" => Some(MonitorCommand::Errors),
            "commands" => Some(MonitorCommand::Commands),
            _ => None,
        }
    }

    /// Parse an interactive menu selection (number or name)
    pub fn from_menu(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "status" => Some(MonitorCommand::Status),
            "2" | "logs" => Some(MonitorCommand::Logs),
            "3" | "errors" => Some(MonitorCommand::Errors),
            "4" | "follow" => Some(MonitorCommand::Follow),
            "5" | "restart" => Some(MonitorCommand::Restart),
            "6" | "commands" | "help" => Some(MonitorCommand::Commands),
            "0" | "exit" | "quit" | "q" => Some(MonitorCommand::Exit),
            _ => None,
        }
    }
}

impl fmt::Display for MonitorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonitorCommand::Status => "status",
            MonitorCommand::Logs => "logs",
            MonitorCommand::Errors => "errors",
            MonitorCommand::Follow => "follow",
            MonitorCommand::Restart => "restart",
            MonitorCommand::Commands => "commands",
            MonitorCommand::Exit => "exit",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shot_parsing() {
        assert_eq!(MonitorCommand::from_op("status"), Some(MonitorCommand::Status));
        assert_eq!(MonitorCommand::from_op("errors"), Some(MonitorCommand::Errors));
        // Interactive-only names are rejected in single-shot form
        assert_eq!(MonitorCommand::from_op("follow"), None);
        assert_eq!(MonitorCommand::from_op("restart"), None);
        assert_eq!(MonitorCommand::from_op("badcommand"), None);
    }

    #[test]
    fn test_menu_parsing() {
        assert_eq!(MonitorCommand::from_menu("1"), Some(MonitorCommand::Status));
        assert_eq!(MonitorCommand::from_menu(" follow "), Some(MonitorCommand::Follow));
        assert_eq!(MonitorCommand::from_menu("q"), Some(MonitorCommand::Exit));
        assert_eq!(MonitorCommand::from_menu("RESTART"), Some(MonitorCommand::Restart));
        assert_eq!(MonitorCommand::from_menu("nope"), None);
    }
}
