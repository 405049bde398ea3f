//! Diagnostic logger with breadcrumbs and call-chain capture.
//!
//! A [`Logger`] is explicit, process-local state: construct one per
//! subsystem, share it behind an `Arc` if several operations write to it.
//! Every entry is also emitted as a `tracing` event so the diagnostic buffer
//! and the process log agree.
//!
//! Each entry costs a symbolized backtrace rendered to text. Loggers on hot
//! paths can opt out with [`Logger::without_stack_capture`]; their entries
//! carry `<unknown>` and an empty trail.

use chrono::Utc;
use domo_types::{LogEntry, Severity};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::utils::stack::{self, Frame, DEFAULT_ROOT_MARKER};

/// Receives the whole buffer on [`Logger::flush`].
pub type OutputFn = Arc<dyn Fn(&[LogEntry]) + Send + Sync>;

/// Optional per-entry context.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    pub entity_id: Option<String>,
    pub instance: Option<String>,
    /// Innermost caller frames to drop (the logger's own frames are always dropped)
    pub frames_to_drop: usize,
}

impl LogContext {
    /// Context naming an entity on an instance.
    pub fn entity(entity_id: impl ToString, instance: impl Into<String>) -> Self {
        Self {
            entity_id: Some(entity_id.to_string()),
            instance: Some(instance.into()),
            frames_to_drop: 0,
        }
    }

    #[must_use]
    pub const fn drop_frames(mut self, frames_to_drop: usize) -> Self {
        self.frames_to_drop = frames_to_drop;
        self
    }
}

#[derive(Default)]
struct LoggerState {
    logs: Vec<LogEntry>,
    breadcrumb: Vec<String>,
}

/// In-memory, per-application log buffer.
pub struct Logger {
    app_name: String,
    /// `None` disables stack capture
    root_marker: Option<String>,
    output_fn: Option<OutputFn>,
    state: Mutex<LoggerState>,
}

impl Logger {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            root_marker: Some(DEFAULT_ROOT_MARKER.to_string()),
            output_fn: None,
            state: Mutex::new(LoggerState::default()),
        }
    }

    /// Function name at which captured call chains start.
    #[must_use]
    pub fn with_root_marker(mut self, root_marker: impl Into<String>) -> Self {
        self.root_marker = Some(root_marker.into());
        self
    }

    /// Skip backtrace capture for every entry.
    #[must_use]
    pub fn without_stack_capture(mut self) -> Self {
        self.root_marker = None;
        self
    }

    #[must_use]
    pub fn with_output_fn(
        mut self,
        output_fn: impl Fn(&[LogEntry]) + Send + Sync + 'static,
    ) -> Self {
        self.output_fn = Some(Arc::new(output_fn));
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn root_marker(&self) -> Option<&str> {
        self.root_marker.as_deref()
    }

    /// Add a breadcrumb label. No-op if already active.
    pub fn start_breadcrumb(&self, label: impl Into<String>) {
        let label = label.into();
        let mut state = self.state.lock();
        if !state.breadcrumb.contains(&label) {
            state.breadcrumb.push(label);
        }
    }

    /// Remove a breadcrumb label. No-op if not active.
    pub fn stop_breadcrumb(&self, label: &str) {
        let mut state = self.state.lock();
        if let Some(pos) = state.breadcrumb.iter().position(|l| l == label) {
            state.breadcrumb.remove(pos);
        }
    }

    /// Active breadcrumb path, joined with `->`.
    pub fn breadcrumb(&self) -> String {
        self.state.lock().breadcrumb.join("->")
    }

    pub fn log(&self, message: impl Into<String>, severity: Severity) -> LogEntry {
        self.log_with(severity, message, LogContext::default())
    }

    pub fn log_info(&self, message: impl Into<String>) -> LogEntry {
        self.log_with(Severity::Info, message, LogContext::default())
    }

    pub fn log_warning(&self, message: impl Into<String>) -> LogEntry {
        self.log_with(Severity::Warning, message, LogContext::default())
    }

    pub fn log_error(&self, message: impl Into<String>) -> LogEntry {
        self.log_with(Severity::Error, message, LogContext::default())
    }

    /// Capture the call chain and append an entry.
    #[inline(never)]
    pub fn log_with(
        &self,
        severity: Severity,
        message: impl Into<String>,
        context: LogContext,
    ) -> LogEntry {
        let mut frames = if self.root_marker.is_some() { stack::capture() } else { Vec::new() };
        while frames.last().is_some_and(is_logger_frame) {
            frames.pop();
        }
        self.record_frames(severity, message, context, &frames)
    }

    /// Append an entry for an explicit call chain (outermost first).
    pub fn record_frames(
        &self,
        severity: Severity,
        message: impl Into<String>,
        context: LogContext,
        frames: &[Frame],
    ) -> LogEntry {
        let trimmed = stack::trim(frames, self.root_marker.as_deref(), context.frames_to_drop);
        let details = stack::details(trimmed);

        let mut state = self.state.lock();
        let entry = LogEntry {
            timestamp: Utc::now(),
            application: self.app_name.clone(),
            severity,
            message: message.into(),
            breadcrumb: state.breadcrumb.join("->"),
            function_name: details.function_name,
            file_name: details.file_name,
            line: details.line,
            function_trail: details.function_trail,
            entity_id: context.entity_id,
            instance: context.instance,
        };
        emit(&entry);
        state.logs.push(entry.clone());
        entry
    }

    /// Snapshot of the buffer.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().logs.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().logs.is_empty()
    }

    /// Hand the whole buffer to the output function. The buffer is kept.
    ///
    /// Without an output function the entries are written through `tracing`.
    pub fn flush(&self) {
        let logs = self.entries();
        match &self.output_fn {
            Some(output) => output(&logs),
            None => {
                for entry in &logs {
                    tracing::info!(target: "domo_core::logger::flush", "{}", entry);
                }
            },
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("app_name", &self.app_name)
            .field("root_marker", &self.root_marker)
            .field("has_output_fn", &self.output_fn.is_some())
            .field("entries", &self.len())
            .finish()
    }
}

fn is_logger_frame(frame: &Frame) -> bool {
    frame.function.contains("modules::logger::Logger::")
}

fn emit(entry: &LogEntry) {
    let entity_id = entry.entity_id.as_deref().unwrap_or("");
    let instance = entry.instance.as_deref().unwrap_or("");
    match entry.severity {
        Severity::Info => tracing::info!(
            app = %entry.application,
            breadcrumb = %entry.breadcrumb,
            function = %entry.function_name,
            entity_id,
            instance,
            "{}",
            entry.message
        ),
        Severity::Warning => tracing::warn!(
            app = %entry.application,
            breadcrumb = %entry.breadcrumb,
            function = %entry.function_name,
            entity_id,
            instance,
            "{}",
            entry.message
        ),
        Severity::Error => tracing::error!(
            app = %entry.application,
            breadcrumb = %entry.breadcrumb,
            function = %entry.function_name,
            entity_id,
            instance,
            "{}",
            entry.message
        ),
    }
}

/// Install a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Returns `false` if a subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
