//! Call-stack capture and trimming.
//!
//! The only place in the crate that looks at stack frames. Frames come from
//! `std::backtrace::Backtrace`, parsed out of its rendered form, and are
//! handed back outermost first so that index 0 is the entry point.

use regex::Regex;
use std::backtrace::Backtrace;
use std::sync::OnceLock;

/// Root marker used when none is configured: the binary's `main`.
pub const DEFAULT_ROOT_MARKER: &str = "main";

static FRAME_REGEX: OnceLock<Regex> = OnceLock::new();
static LOCATION_REGEX: OnceLock<Regex> = OnceLock::new();
static HASH_SUFFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn frame_regex() -> &'static Regex {
    FRAME_REGEX.get_or_init(|| Regex::new(r"^\s*\d+:\s+(.+?)\s*$").expect("Frame regex is valid"))
}

fn location_regex() -> &'static Regex {
    LOCATION_REGEX.get_or_init(|| {
        Regex::new(r"^\s+at\s+(.+?):(\d+)(?::\d+)?\s*$").expect("Location regex is valid")
    })
}

fn hash_suffix_regex() -> &'static Regex {
    HASH_SUFFIX_REGEX
        .get_or_init(|| Regex::new(r"::h[0-9a-f]{16}$").expect("Hash suffix regex is valid"))
}

/// One stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Demangled symbol path, e.g. `domo_core::modules::account::AccountManager::refresh`
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(function: impl Into<String>) -> Self {
        Self { function: function.into(), file: None, line: None }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Readable name: generic arguments and closure or shim segments dropped,
    /// last path segment kept, qualified by its type when the parent segment
    /// is one.
    ///
    /// `a::b::Manager::refresh::{{closure}}` → `Manager::refresh`
    /// `<alloc::boxed::Box<F> as core::ops::FnOnce<()>>::call_once` → `Box::call_once`
    pub fn short_name(&self) -> String {
        let path = strip_generics(&self.function);
        let segments: Vec<&str> = path
            .split("::")
            .filter(|s| !s.starts_with('{'))
            .map(|s| s.split('{').next().unwrap_or(s).trim())
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [] => self.function.clone(),
            [only] => (*only).to_string(),
            [.., parent, last] if parent.starts_with(|c: char| c.is_ascii_uppercase()) => {
                format!("{parent}::{last}")
            },
            [.., last] => (*last).to_string(),
        }
    }

    /// Whether this frame is the root marker: an exact symbol match, or the
    /// marker as the final path segment.
    pub fn is_marker(&self, marker: &str) -> bool {
        self.function == marker || self.function.ends_with(&format!("::{marker}"))
    }
}

/// Summary of a trimmed call chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceDetails {
    /// Innermost function
    pub function_name: String,
    pub file_name: Option<String>,
    pub line: Option<u32>,
    /// All functions, outermost first, joined with ` -> `
    pub function_trail: String,
}

/// Capture the current stack, outermost first.
///
/// Frames belonging to the capture itself (std's backtrace machinery and
/// this function) are removed.
#[inline(never)]
pub fn capture() -> Vec<Frame> {
    let rendered = Backtrace::force_capture().to_string();
    let mut frames = parse_backtrace(&rendered);

    // Rendered innermost first; cut everything up to and including this function.
    if let Some(pos) = frames.iter().position(|f| f.function.ends_with("utils::stack::capture")) {
        frames.drain(..=pos);
    } else {
        let machinery = frames.iter().take_while(|f| is_backtrace_machinery(&f.function)).count();
        frames.drain(..machinery);
    }

    frames.reverse();
    frames
}

/// Reduce `<T as Trait>::f` to `T::f`, then drop every `<...>` span.
fn strip_generics(symbol: &str) -> String {
    let path = match symbol.strip_prefix('<') {
        Some(rest) => match matching_close(rest) {
            Some(close) => {
                let qualified = &rest[..close];
                let self_ty = qualified.split(" as ").next().unwrap_or(qualified);
                format!("{self_ty}{}", &rest[close + 1..])
            },
            None => symbol.to_string(),
        },
        None => symbol.to_string(),
    };

    let mut out = String::with_capacity(path.len());
    let mut depth = 0_usize;
    let mut prev = ' ';
    for c in path.chars() {
        match c {
            '<' => depth += 1,
            // `->` in `Fn() -> T` is not a closing bracket
            '>' if prev != '-' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {},
        }
        prev = c;
    }
    out
}

/// Byte index of the `>` closing an already-opened `<`.
fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 1_usize;
    let mut prev = ' ';
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            },
            _ => {},
        }
        prev = c;
    }
    None
}

fn is_backtrace_machinery(function: &str) -> bool {
    function.starts_with("std::backtrace")
        || function.starts_with("<std::backtrace")
        || function.starts_with("std::backtrace_rs")
}

/// Parse the rendered form of a `std::backtrace::Backtrace`.
///
/// Returns frames in rendered order (innermost first).
pub fn parse_backtrace(rendered: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in rendered.lines() {
        if let Some(caps) = location_regex().captures(line) {
            if let Some(frame) = frames.last_mut() {
                if frame.file.is_none() {
                    frame.file = caps.get(1).map(|m| m.as_str().to_string());
                    frame.line = caps.get(2).and_then(|m| m.as_str().parse().ok());
                }
            }
        } else if let Some(caps) = frame_regex().captures(line) {
            let symbol = caps.get(1).map_or("", |m| m.as_str());
            frames.push(Frame::new(hash_suffix_regex().replace(symbol, "").into_owned()));
        }
    }
    frames
}

/// Keep the segment starting at the most recent root-marker frame, then drop
/// `frames_to_drop` innermost frames.
///
/// When the marker is `None` or never appears the segment starts at index 0.
pub fn trim<'a>(
    frames: &'a [Frame],
    root_marker: Option<&str>,
    frames_to_drop: usize,
) -> &'a [Frame] {
    let start = root_marker
        .and_then(|marker| frames.iter().rposition(|f| f.is_marker(marker)))
        .unwrap_or(0);
    let end = frames.len().saturating_sub(frames_to_drop).max(start);
    &frames[start..end]
}

/// Summarise a trimmed chain. An empty chain yields `<unknown>` and an empty trail.
pub fn details(frames: &[Frame]) -> TraceDetails {
    let function_trail =
        frames.iter().map(Frame::short_name).collect::<Vec<_>>().join(" -> ");
    match frames.last() {
        Some(innermost) => TraceDetails {
            function_name: innermost.short_name(),
            file_name: innermost.file.clone(),
            line: innermost.line,
            function_trail,
        },
        None => TraceDetails {
            function_name: "<unknown>".to_string(),
            file_name: None,
            line: None,
            function_trail,
        },
    }
}
