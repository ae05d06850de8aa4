//! Compiled-module caching and engine sharing.
//!
//! Compiling the interpreter wasm takes far longer than running a typical
//! snippet, so the compiled module is cached by canonical path and shared
//! across executions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use wasmtime::{Engine, Module};

use crate::error::{Result, SandboxError};

/// Thread-safe cache of compiled wasm modules, keyed by canonical path.
#[derive(Debug, Default)]
pub struct ModuleCache {
    cache: RwLock<HashMap<PathBuf, Arc<Module>>>,
}

impl ModuleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached module for `path`, compiling it on first use.
    ///
    /// The path is canonicalized so relative and absolute spellings share an
    /// entry. Compilation happens outside the lock; a double-check on insert
    /// handles the race where two callers compile concurrently.
    pub fn get_or_compile(&self, engine: &Engine, path: impl AsRef<Path>) -> Result<Arc<Module>> {
        let path = path.as_ref();
        let canonical = std::fs::canonicalize(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SandboxError::InterpreterNotFound(path.display().to_string())
            } else {
                SandboxError::Io(e)
            }
        })?;

        {
            let cache = self.cache.read().unwrap();
            if let Some(module) = cache.get(&canonical) {
                return Ok(Arc::clone(module));
            }
        }

        let wasm_bytes = std::fs::read(&canonical).map_err(SandboxError::Io)?;
        let module = Module::new(engine, &wasm_bytes).map_err(|e| {
            SandboxError::ModuleLoad(anyhow::anyhow!("failed to compile module: {e}"))
        })?;
        let module = Arc::new(module);

        let mut cache = self.cache.write().unwrap();
        if let Some(existing) = cache.get(&canonical) {
            return Ok(Arc::clone(existing));
        }
        cache.insert(canonical, Arc::clone(&module));
        Ok(module)
    }

    /// Number of cached modules.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached modules.
    pub fn clear(&self) {
        self.cache.write().unwrap().clear();
    }
}

/// Process-wide module cache shared by all sandboxes.
static GLOBAL_CACHE: std::sync::LazyLock<ModuleCache> = std::sync::LazyLock::new(ModuleCache::new);

/// Get the global module cache.
pub fn global_cache() -> &'static ModuleCache {
    &GLOBAL_CACHE
}

/// A wasmtime engine shared across executions.
///
/// All executions run against one engine so that the epoch ticker and the
/// module cache apply uniformly.
#[derive(Clone)]
pub struct SharedEngine {
    engine: Arc<Engine>,
}

impl SharedEngine {
    /// Create an engine with epoch interruption enabled.
    pub fn new() -> Result<Self> {
        Self::build(false)
    }

    /// Create an engine with epoch interruption and fuel metering enabled.
    pub fn with_fuel() -> Result<Self> {
        Self::build(true)
    }

    fn build(enable_fuel: bool) -> Result<Self> {
        let mut config = wasmtime::Config::new();
        config.epoch_interruption(true);
        config.consume_fuel(enable_fuel);
        let engine = Engine::new(&config)
            .map_err(|e| SandboxError::RuntimeInit(anyhow::anyhow!("{e}")))?;
        Ok(Self {
            engine: Arc::new(engine),
        })
    }

    /// Reference to the underlying engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl std::fmt::Debug for SharedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine")
            .field("engine", &"<wasmtime::Engine>")
            .finish()
    }
}
