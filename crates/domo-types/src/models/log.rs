//! Diagnostic log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational
    Info,
    /// Degraded but recoverable
    Warning,
    /// Operation failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Info => write!(f, "Info"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// One entry in a logger's buffer. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
    /// Owning application name
    pub application: String,
    /// Severity
    pub severity: Severity,
    /// Log message
    pub message: String,
    /// Active breadcrumb labels joined with `->`
    pub breadcrumb: String,
    /// Innermost function of the trimmed call chain
    pub function_name: String,
    /// Source file of the innermost frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Source line of the innermost frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Trimmed call chain, outermost first, joined with ` -> `
    pub function_trail: String,
    /// Entity the entry refers to (an account id, for instance)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Domo instance the entry refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} {}: {}",
            self.timestamp.to_rfc3339(),
            self.application,
            self.severity,
            self.function_name,
            self.message
        )
    }
}
