//! Resource limiting for the Wasm store.

use wasmtime::ResourceLimiter;

/// Enforces memory and table growth ceilings for a single execution.
pub struct SandboxLimiter {
    max_memory: u64,
    max_table_elements: u64,
    peak_memory: u64,
    limit_exceeded: bool,
}

impl SandboxLimiter {
    /// Create a limiter with the given memory ceiling in bytes.
    pub fn new(max_memory: u64) -> Self {
        Self {
            max_memory,
            max_table_elements: 10_000,
            peak_memory: 0,
            limit_exceeded: false,
        }
    }

    /// Whether any growth request was denied.
    pub fn limit_exceeded(&self) -> bool {
        self.limit_exceeded
    }

    /// Highest memory allocation observed during the execution.
    pub fn peak_memory(&self) -> u64 {
        self.peak_memory
    }
}

impl ResourceLimiter for SandboxLimiter {
    fn memory_growing(
        &mut self,
        _current: usize,
        desired: usize,
        _maximum: Option<usize>,
    ) -> anyhow::Result<bool> {
        let desired = desired as u64;
        if desired > self.max_memory {
            self.limit_exceeded = true;
            return Ok(false);
        }
        self.peak_memory = self.peak_memory.max(desired);
        Ok(true)
    }

    fn table_growing(
        &mut self,
        _current: usize,
        desired: usize,
        _maximum: Option<usize>,
    ) -> anyhow::Result<bool> {
        if desired as u64 > self.max_table_elements {
            self.limit_exceeded = true;
            return Ok(false);
        }
        Ok(true)
    }
}

/// Store data for one execution: the limiter plus the WASI context.
pub struct StoreData {
    /// The resource limiter.
    pub limiter: SandboxLimiter,
    /// WASI Preview 1 context.
    pub wasi: wasmtime_wasi::preview1::WasiP1Ctx,
}

impl StoreData {
    /// Create store data with the given memory ceiling and WASI context.
    pub fn new(max_memory: u64, wasi: wasmtime_wasi::preview1::WasiP1Ctx) -> Self {
        Self {
            limiter: SandboxLimiter::new(max_memory),
            wasi,
        }
    }
}
