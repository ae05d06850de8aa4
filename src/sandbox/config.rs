//! Sandbox configuration with builder pattern.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for snippet execution.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Maximum wall-clock time before the execution is interrupted.
    pub timeout: Duration,
    /// Maximum guest memory in bytes.
    pub max_memory: u64,
    /// Maximum fuel (instruction count limit). `None` disables fuel metering.
    pub max_fuel: Option<u64>,
    /// Maximum bytes captured per output stream (stdout and stderr each).
    pub max_output: usize,
    /// Path to the RustPython wasm interpreter.
    pub interpreter_path: PathBuf,
    /// Epoch interruption interval for cooperative timeout.
    pub epoch_tick_interval: Duration,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_memory: 64 * 1024 * 1024,
            max_fuel: None,
            max_output: 256 * 1024,
            interpreter_path: PathBuf::from("assets/rustpython.wasm"),
            epoch_tick_interval: Duration::from_millis(10),
        }
    }
}

impl SandboxConfig {
    /// Create a new builder for `SandboxConfig`.
    pub fn builder() -> SandboxConfigBuilder {
        SandboxConfigBuilder::default()
    }
}

/// Builder for [`SandboxConfig`] instances.
#[derive(Debug, Clone, Default)]
pub struct SandboxConfigBuilder {
    timeout: Option<Duration>,
    max_memory: Option<u64>,
    max_fuel: Option<u64>,
    max_output: Option<usize>,
    interpreter_path: Option<PathBuf>,
    epoch_tick_interval: Option<Duration>,
}

impl SandboxConfigBuilder {
    /// Set the maximum execution timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum guest memory in bytes.
    pub fn max_memory(mut self, bytes: u64) -> Self {
        self.max_memory = Some(bytes);
        self
    }

    /// Set the maximum fuel (instruction count).
    pub fn max_fuel(mut self, fuel: u64) -> Self {
        self.max_fuel = Some(fuel);
        self
    }

    /// Set the per-stream captured-output ceiling in bytes.
    pub fn max_output(mut self, bytes: usize) -> Self {
        self.max_output = Some(bytes);
        self
    }

    /// Set the path to the RustPython wasm interpreter.
    pub fn interpreter_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.interpreter_path = Some(path.into());
        self
    }

    /// Set the epoch tick interval for timeout checking.
    pub fn epoch_tick_interval(mut self, interval: Duration) -> Self {
        self.epoch_tick_interval = Some(interval);
        self
    }

    /// Build the `SandboxConfig`, falling back to defaults for unset fields.
    pub fn build(self) -> SandboxConfig {
        let default = SandboxConfig::default();
        SandboxConfig {
            timeout: self.timeout.unwrap_or(default.timeout),
            max_memory: self.max_memory.unwrap_or(default.max_memory),
            max_fuel: self.max_fuel.or(default.max_fuel),
            max_output: self.max_output.unwrap_or(default.max_output),
            interpreter_path: self.interpreter_path.unwrap_or(default.interpreter_path),
            epoch_tick_interval: self
                .epoch_tick_interval
                .unwrap_or(default.epoch_tick_interval),
        }
    }
}
