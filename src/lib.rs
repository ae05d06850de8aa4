//! # Web Playground Backend
//!
//! The server-side core of an interactive browser playground: visitors
//! start sessions, transform a demo dataset, and run Python snippets, all
//! over a small HTTP surface.
//!
//! Three engines do the work, composed only by the HTTP layer:
//!
//! - [`session::SessionStore`] — per-client key/value state with an
//!   explicit start/get/add/remove/destroy lifecycle, keyed by a cookie.
//! - [`sandbox`] — untrusted snippets run in RustPython compiled to
//!   WebAssembly under Wasmtime, with memory, wall-clock, fuel, and
//!   output-size ceilings. No filesystem, no network, no subprocesses.
//! - [`dataset`] — pure, baseline-derived transforms over a fixed record
//!   set; nothing is ever mutated in place.
//!
//! ## Example
//!
//! ```rust,ignore
//! use web_playground_rs::prelude::*;
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SandboxConfig::builder()
//!         .timeout(Duration::from_secs(5))
//!         .max_memory(32 * 1024 * 1024)
//!         .build();
//!
//!     let state = AppState::new(
//!         Arc::new(SessionStore::new()),
//!         Arc::new(SnippetSandbox::new(config)?),
//!     );
//!     let app = router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Security Model
//!
//! Submitted code never reaches a host interpreter. Each execution gets a
//! fresh Wasm store, bounded capture pipes, a `ResourceLimiter` memory cap,
//! and epoch-based interruption, so a hostile snippet can be slow or loud
//! only up to its ceilings and can observe nothing outside its own call.

pub mod api;
pub mod dataset;
pub mod error;
pub mod prelude;
pub mod sandbox;
pub mod session;

// Re-export main types at crate root for convenience
pub use api::{router, AppState};
pub use dataset::{apply, baseline, Category, Product, Transform, TransformOutcome};
pub use error::{Result, SandboxError};
pub use sandbox::cache::{global_cache, ModuleCache, SharedEngine};
pub use sandbox::config::{SandboxConfig, SandboxConfigBuilder};
pub use sandbox::executor::{normalize_source, ExecutionResult, SnippetSandbox};
pub use session::{SessionStore, SessionView, SESSION_COOKIE};
