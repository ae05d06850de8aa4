//! Core execution engine for snippet sandboxing.
//!
//! Submitted code never touches a host interpreter: it runs inside
//! RustPython compiled to WebAssembly, under wasmtime, with no preopened
//! directories, no network, a memory ceiling, a wall-clock bound, and
//! bounded output capture.

use wasmtime::{Linker, Module, Store, Trap};
use wasmtime_wasi::preview1;
use wasmtime_wasi::{I32Exit, WasiCtxBuilder};

use crate::error::{Result, SandboxError};
use crate::sandbox::cache::{global_cache, SharedEngine};
use crate::sandbox::config::SandboxConfig;
use crate::sandbox::io::SandboxIo;
use crate::sandbox::limits::StoreData;

/// Result of one snippet execution.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Captured stdout output, byte order preserved.
    pub stdout: String,
    /// Captured stderr output.
    pub stderr: String,
    /// Guest exit code (0 for success).
    pub exit_code: i32,
}

impl ExecutionResult {
    /// Check if the execution was successful (exit code 0).
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Strip a single leading and trailing Markdown code fence, then reject
/// empty input.
///
/// Callers may paste either a bare snippet or one wrapped in the fences a
/// browser UI tends to produce (``` or ```python).
pub fn normalize_source(source: &str) -> Result<String> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(SandboxError::EmptySource);
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines
        .first()
        .is_some_and(|l| l.trim_start().starts_with("```"))
    {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim() == "```") {
        lines.pop();
    }

    let normalized = lines.join("\n");
    if normalized.trim().is_empty() {
        return Err(SandboxError::EmptySource);
    }
    Ok(normalized)
}

/// A sandboxed execution environment for untrusted Python snippets.
///
/// The interpreter module is resolved lazily through the global module
/// cache, so constructing a sandbox is cheap and never touches the
/// filesystem; a missing interpreter surfaces as an error from
/// [`SnippetSandbox::execute`] instead.
pub struct SnippetSandbox {
    config: SandboxConfig,
    engine: SharedEngine,
}

impl SnippetSandbox {
    /// Create a sandbox with the given configuration.
    pub fn new(config: SandboxConfig) -> Result<Self> {
        let engine = if config.max_fuel.is_some() {
            SharedEngine::with_fuel()?
        } else {
            SharedEngine::new()?
        };
        Ok(Self { config, engine })
    }

    /// The active configuration.
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Execute a snippet and capture its output.
    ///
    /// The source is normalized first (fence stripping, empty check). The
    /// execution itself runs on a blocking thread, raced against the
    /// wall-clock timeout; epoch interruption stops the guest even inside a
    /// tight loop.
    pub async fn execute(&self, source: &str) -> Result<ExecutionResult> {
        let code = normalize_source(source)?;

        let config = self.config.clone();
        let engine = self.engine.clone();

        let ticker_engine = engine.clone();
        let tick = config.epoch_tick_interval;
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                ticker_engine.engine().increment_epoch();
            }
        });

        let timeout = config.timeout;
        let exec_engine = engine.clone();
        let exec = tokio::task::spawn_blocking(move || execute_sync(&exec_engine, &config, &code));

        let result = tokio::select! {
            joined = exec => {
                ticker.abort();
                match joined {
                    Ok(inner) => inner,
                    Err(e) => Err(SandboxError::ExecutionFailed(format!("task panicked: {e}"))),
                }
            }
            _ = tokio::time::sleep(timeout) => {
                ticker.abort();
                // The ticker has already advanced the epoch close to the
                // deadline; a few extra bumps cover scheduler jitter so the
                // blocked guest traps and frees its thread.
                for _ in 0..8 {
                    engine.engine().increment_epoch();
                }
                Err(SandboxError::Timeout(timeout))
            }
        };

        result
    }
}

/// Synchronous execution body (runs on a blocking thread).
fn execute_sync(
    engine: &SharedEngine,
    config: &SandboxConfig,
    code: &str,
) -> Result<ExecutionResult> {
    let module: std::sync::Arc<Module> =
        global_cache().get_or_compile(engine.engine(), &config.interpreter_path)?;

    let io = SandboxIo::with_capacity(config.max_output);

    // No preopened directories and no sockets: the guest sees only its
    // argv and the capture pipes.
    let wasi_ctx = WasiCtxBuilder::new()
        .args(&["python", "-c", code])
        .stdout(io.stdout.clone())
        .stderr(io.stderr.clone())
        .build_p1();

    let mut store = Store::new(engine.engine(), StoreData::new(config.max_memory, wasi_ctx));
    store.limiter(|data| &mut data.limiter);

    // Trap once the ticker has advanced the epoch past the whole timeout
    // window; the async timeout race is the backstop.
    let deadline_ticks = (config.timeout.as_millis()
        / config.epoch_tick_interval.as_millis().max(1)) as u64
        + 1;
    store.epoch_deadline_trap();
    store.set_epoch_deadline(deadline_ticks.max(2));

    if let Some(fuel) = config.max_fuel {
        store
            .set_fuel(fuel)
            .map_err(|e| SandboxError::RuntimeInit(anyhow::anyhow!("failed to set fuel: {e}")))?;
    }

    let mut linker = Linker::new(engine.engine());
    preview1::add_to_linker_sync(&mut linker, |data: &mut StoreData| &mut data.wasi)
        .map_err(|e| SandboxError::RuntimeInit(anyhow::anyhow!("failed to link WASI: {e}")))?;

    let instance = linker.instantiate(&mut store, &module).map_err(|e| {
        if store.data().limiter.limit_exceeded() {
            SandboxError::MemoryLimitExceeded("memory limit exceeded during instantiation".into())
        } else {
            SandboxError::ModuleLoad(anyhow::anyhow!("failed to instantiate: {e}"))
        }
    })?;

    let start = instance
        .get_typed_func::<(), ()>(&mut store, "_start")
        .map_err(|e| SandboxError::ModuleLoad(anyhow::anyhow!("missing _start export: {e}")))?;

    let exit_code = match start.call(&mut store, ()) {
        Ok(()) => 0,
        Err(e) => {
            if store.data().limiter.limit_exceeded() {
                return Err(SandboxError::MemoryLimitExceeded(
                    "memory limit exceeded during execution".into(),
                ));
            }
            if io.overflowed() {
                return Err(SandboxError::OutputLimitExceeded(io.capacity()));
            }
            if let Some(trap) = e.downcast_ref::<Trap>() {
                return match trap {
                    Trap::Interrupt => Err(SandboxError::Timeout(config.timeout)),
                    Trap::OutOfFuel => Err(SandboxError::OutOfFuel),
                    _ => Err(SandboxError::ExecutionFailed(trap.to_string())),
                };
            }
            match e.downcast_ref::<I32Exit>() {
                Some(exit) => exit.0,
                None => return Err(SandboxError::ExecutionFailed(e.to_string())),
            }
        }
    };

    tracing::debug!(
        exit_code,
        peak_memory = store.data().limiter.peak_memory(),
        stdout_bytes = io.stdout_str().len(),
        "snippet execution finished"
    );

    Ok(ExecutionResult {
        stdout: io.stdout_str(),
        stderr: io.stderr_str(),
        exit_code,
    })
}
