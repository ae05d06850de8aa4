//! Prelude module for convenient imports.

pub use crate::api::{router, AppState};
pub use crate::dataset::{apply, Transform};
pub use crate::error::{Result, SandboxError};
pub use crate::sandbox::{
    config::SandboxConfig,
    executor::{ExecutionResult, SnippetSandbox},
};
pub use crate::session::{SessionStore, SessionView};
