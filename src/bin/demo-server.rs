//! Playground HTTP server.
//!
//! The interpreter module loads lazily through the shared cache, so the
//! server starts even without the wasm asset on disk; `/execute` then
//! reports a sandbox error while every other endpoint keeps working.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use web_playground_rs::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "demo-server", about = "Interactive web playground backend")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "DEMO_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Path to the RustPython wasm interpreter.
    #[arg(long, env = "DEMO_INTERPRETER", default_value = "assets/rustpython.wasm")]
    interpreter: PathBuf,

    /// Wall-clock ceiling per snippet execution, in seconds.
    #[arg(long, env = "DEMO_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Memory ceiling per snippet execution, in megabytes.
    #[arg(long, env = "DEMO_MAX_MEMORY_MB", default_value_t = 64)]
    max_memory_mb: u64,

    /// Captured-output ceiling per stream, in kilobytes.
    #[arg(long, env = "DEMO_MAX_OUTPUT_KB", default_value_t = 256)]
    max_output_kb: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = SandboxConfig::builder()
        .interpreter_path(&args.interpreter)
        .timeout(Duration::from_secs(args.timeout_secs))
        .max_memory(args.max_memory_mb * 1024 * 1024)
        .max_output(args.max_output_kb * 1024)
        .build();

    let state = AppState::new(
        Arc::new(SessionStore::new()),
        Arc::new(SnippetSandbox::new(config)?),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(
        address = %args.bind,
        interpreter = %args.interpreter.display(),
        "demo server listening"
    );
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
