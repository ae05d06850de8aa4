//! Error types for the playground backend.

use thiserror::Error;

/// Errors that can occur while executing a snippet in the sandbox.
#[derive(Error, Debug)]
pub enum SandboxError {
    /// The submitted source was empty (or whitespace-only) after trimming.
    #[error("no code provided")]
    EmptySource,

    /// The execution exceeded the configured wall-clock timeout.
    #[error("execution timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The execution exceeded the memory ceiling.
    #[error("memory limit exceeded: {0}")]
    MemoryLimitExceeded(String),

    /// The snippet wrote more than the captured-output ceiling allows.
    #[error("output limit exceeded ({0} bytes)")]
    OutputLimitExceeded(usize),

    /// Execution ran out of fuel (instruction limit).
    #[error("execution ran out of fuel")]
    OutOfFuel,

    /// Failed to initialize the Wasm runtime.
    #[error("failed to initialize runtime: {0}")]
    RuntimeInit(#[source] anyhow::Error),

    /// Failed to load or instantiate the interpreter module.
    #[error("failed to load interpreter: {0}")]
    ModuleLoad(#[source] anyhow::Error),

    /// The interpreter wasm file was not found on disk.
    #[error("interpreter wasm not found at: {0}")]
    InterpreterNotFound(String),

    /// The snippet execution failed for a reason other than a guest exception.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A Python exception was raised by the snippet.
    #[error("Python {exception_type}: {message}")]
    PythonException {
        /// The exception class name (e.g. "ValueError").
        exception_type: String,
        /// The exception message.
        message: String,
        /// The full traceback, if one was printed.
        traceback: Option<String>,
    },

    /// I/O error while talking to the host filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SandboxError {
    /// Classify stderr output from the interpreter into a structured error.
    pub fn from_python_stderr(stderr: &str) -> Option<Self> {
        parse_python_exception(stderr)
    }

    /// True for faults caused by the caller's input rather than the runtime.
    pub fn is_input_error(&self) -> bool {
        matches!(self, SandboxError::EmptySource)
    }

    /// True if this error represents a resource bound being hit.
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            SandboxError::Timeout(_)
                | SandboxError::MemoryLimitExceeded(_)
                | SandboxError::OutputLimitExceeded(_)
                | SandboxError::OutOfFuel
        )
    }

    /// True if this error represents a guest-level Python exception.
    pub fn is_python_exception(&self) -> bool {
        matches!(self, SandboxError::PythonException { .. })
    }
}

/// Result type alias for sandbox operations.
pub type Result<T> = std::result::Result<T, SandboxError>;

/// Extract the exception type, message, and traceback from Python stderr.
///
/// Python prints the traceback first and the `Type: message` line last, so
/// the last line that looks like an exception wins.
pub fn parse_python_exception(stderr: &str) -> Option<SandboxError> {
    let lines: Vec<&str> = stderr.lines().collect();

    let mut traceback_start = None;
    let mut exception_line = None;
    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("Traceback (most recent call last):") {
            traceback_start = Some(i);
        }
        if !line.starts_with(' ') && looks_like_exception(line) {
            exception_line = Some((i, *line));
        }
    }

    let (line_idx, raw) = exception_line?;
    let (exception_type, message) = match raw.find(':') {
        Some(pos) => (
            raw[..pos].trim().to_string(),
            raw[pos + 1..].trim().to_string(),
        ),
        None => (raw.trim().to_string(), String::new()),
    };
    let traceback = traceback_start.map(|start| lines[start..=line_idx].join("\n"));

    Some(SandboxError::PythonException {
        exception_type,
        message,
        traceback,
    })
}

/// Heuristic for "this line names a Python exception".
fn looks_like_exception(line: &str) -> bool {
    if !line.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return false;
    }

    let name_end = line.find(':').unwrap_or(line.len());
    let name = line[..name_end].trim();
    if name.is_empty() || name.contains(' ') {
        return false;
    }

    name.ends_with("Error")
        || name.ends_with("Exception")
        || name.ends_with("Warning")
        || matches!(
            name,
            "KeyboardInterrupt" | "SystemExit" | "StopIteration" | "GeneratorExit"
        )
}
