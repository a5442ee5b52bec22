//! Log severity classification
//!
//! Pure text analysis; callers fetch log text through the runtime client and
//! hand it in, so the rules stay testable without a live container.

use serde::{Deserialize, Serialize};

/// Derived severity of a single log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Substring rules, checked in order; first match wins. Case-sensitive,
/// matching the service's log format (loguru-style uppercase level names).
pub const SEVERITY_RULES: &[(&str, Severity)] = &[
    ("ERROR", Severity::Error),
    ("CRITICAL", Severity::Error),
    ("WARNING", Severity::Warning),
];

/// Most recent error lines kept as a sample
pub const ERROR_SAMPLE_SIZE: usize = 5;

/// Most recent warning lines kept as a sample
pub const WARNING_SAMPLE_SIZE: usize = 3;

/// Portion of the log to analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    /// Last `n` lines
    Tail(usize),

    /// Everything available
    Full,
}

/// Classification result over one scope of log text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogAnalysis {
    /// Exact count of Error-severity lines
    pub error_count: usize,

    /// Exact count of Warning-severity lines
    pub warning_count: usize,

    /// Most recent error lines, in original chronological order
    pub sample_errors: Vec<String>,

    /// Most recent warning lines, in original chronological order
    pub sample_warnings: Vec<String>,
}

impl LogAnalysis {
    /// Whether any Error-severity lines were found
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Classify a single line against the rule table
pub fn classify_line(line: &str) -> Severity {
    for (pattern, severity) in SEVERITY_RULES {
        if line.contains(pattern) {
            return *severity;
        }
    }
    Severity::Info
}

/// Classify log text line-by-line over the given scope
pub fn analyze(text: &str, scope: LogScope) -> LogAnalysis {
    let lines: Vec<&str> = text.lines().collect();
    let scoped: &[&str] = match scope {
        LogScope::Full => &lines,
        LogScope::Tail(n) => {
            let start = lines.len().saturating_sub(n);
            &lines[start..]
        }
    };

    let mut analysis = LogAnalysis::default();
    let mut errors: Vec<&str> = Vec::new();
    let mut warnings: Vec<&str> = Vec::new();

    for line in scoped {
        match classify_line(line) {
            Severity::Error => {
                analysis.error_count += 1;
                errors.push(line);
            }
            Severity::Warning => {
                analysis.warning_count += 1;
                warnings.push(line);
            }
            Severity::Info => {}
        }
    }

    analysis.sample_errors = last_n(&errors, ERROR_SAMPLE_SIZE);
    analysis.sample_warnings = last_n(&warnings, WARNING_SAMPLE_SIZE);
    analysis
}

fn last_n(lines: &[&str], n: usize) -> Vec<String> {
    let start = lines.len().saturating_sub(n);
    lines[start..].iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line("2024-01-01 ERROR boom"), Severity::Error);
        assert_eq!(classify_line("CRITICAL meltdown"), Severity::Error);
        assert_eq!(classify_line("WARNING slow response"), Severity::Warning);
        assert_eq!(classify_line("INFO all good"), Severity::Info);
        // Case-sensitive by design
        assert_eq!(classify_line("error lowercase"), Severity::Info);
    }

    #[test]
    fn test_analyze_counts_and_samples() {
        let text = "\
INFO start
ERROR one
INFO ok
ERROR two
WARNING careful
ERROR three
INFO ok
INFO ok
INFO ok
INFO done";
        let analysis = analyze(text, LogScope::Full);
        assert_eq!(analysis.error_count, 3);
        assert_eq!(analysis.warning_count, 1);
        assert_eq!(
            analysis.sample_errors,
            vec!["ERROR one", "ERROR two", "ERROR three"]
        );
        assert_eq!(analysis.sample_warnings, vec!["WARNING careful"]);
    }

    #[test]
    fn test_analyze_tail_scope() {
        let text = "ERROR old\nINFO a\nINFO b\nERROR recent";
        let analysis = analyze(text, LogScope::Tail(2));
        assert_eq!(analysis.error_count, 1);
        assert_eq!(analysis.sample_errors, vec!["ERROR recent"]);
    }

    #[test]
    fn test_sample_bounded_to_most_recent() {
        let text: String = (1..=8).map(|i| format!("ERROR {}\n", i)).collect();
        let analysis = analyze(&text, LogScope::Full);
        assert_eq!(analysis.error_count, 8);
        assert_eq!(
            analysis.sample_errors,
            vec!["ERROR 4", "ERROR 5", "ERROR 6", "ERROR 7", "ERROR 8"]
        );
    }

    #[test]
    fn test_empty_log() {
        let analysis = analyze("", LogScope::Full);
        assert_eq!(analysis.error_count, 0);
        assert_eq!(analysis.warning_count, 0);
        assert!(analysis.sample_errors.is_empty());
        assert!(!analysis.has_errors());
    }
}
