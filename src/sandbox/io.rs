//! Per-execution output capture.
//!
//! Each execution owns a fresh pair of bounded in-memory WASI pipes, so no
//! output can leak between calls and no snippet can grow the host's memory
//! without bound.

use wasmtime_wasi::pipe::MemoryOutputPipe;

/// Captured stdout/stderr for a single sandbox execution.
#[derive(Clone)]
pub struct SandboxIo {
    capacity: usize,
    /// Captured stdout.
    pub stdout: MemoryOutputPipe,
    /// Captured stderr.
    pub stderr: MemoryOutputPipe,
}

impl SandboxIo {
    /// Create capture pipes with the given per-stream byte ceiling.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            stdout: MemoryOutputPipe::new(capacity),
            stderr: MemoryOutputPipe::new(capacity),
        }
    }

    /// Captured stdout, lossily decoded.
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout.contents()).into_owned()
    }

    /// Captured stderr, lossily decoded.
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr.contents()).into_owned()
    }

    /// The configured per-stream ceiling.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether either stream filled its buffer.
    ///
    /// The pipe rejects writes past capacity, so a full buffer means the
    /// snippet tried to write more than the ceiling allows.
    pub fn overflowed(&self) -> bool {
        self.stdout.contents().len() >= self.capacity
            || self.stderr.contents().len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pipes_are_empty() {
        let io = SandboxIo::with_capacity(1024);
        assert!(io.stdout_str().is_empty());
        assert!(io.stderr_str().is_empty());
        assert!(!io.overflowed());
    }

    #[test]
    fn capacity_is_recorded() {
        let io = SandboxIo::with_capacity(8);
        assert_eq!(io.capacity(), 8);
        assert!(!io.overflowed());
    }
}
