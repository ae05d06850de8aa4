//! Snippet execution endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::error::SandboxError;
use crate::sandbox::executor::ExecutionResult;

use super::AppState;

/// Marker prefixing every failure in the plain-text response, so a client
/// parsing the body can tell success from failure.
pub const ERROR_MARKER: &str = "ERROR:";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExecuteForm {
    #[serde(default)]
    code: Option<String>,
}

/// `POST /execute` — run the submitted snippet, reply with captured output.
///
/// The response is plain text: stdout verbatim on success, or an
/// `ERROR:`-marked detail on any input error or fault. Failures always
/// produce a body; the sandbox bounds guarantee this returns.
pub(crate) async fn execute(
    State(state): State<AppState>,
    form: Option<Form<ExecuteForm>>,
) -> Response {
    let code = form.and_then(|Form(f)| f.code).unwrap_or_default();

    let body = match state.sandbox.execute(&code).await {
        Ok(result) => render(result),
        Err(SandboxError::EmptySource) => format!("{ERROR_MARKER} No code provided.\n"),
        Err(err) => {
            warn!(error = %err, "snippet execution failed");
            format!("{ERROR_MARKER}\n{err}\n")
        }
    };

    body.into_response()
}

/// Render an execution result into the text body.
///
/// A nonzero exit means the snippet raised; stdout produced before the
/// fault is kept and the stderr detail follows the marker.
fn render(result: ExecutionResult) -> String {
    if result.is_success() {
        return result.stdout;
    }

    if let Some(exc) = SandboxError::from_python_stderr(&result.stderr) {
        warn!(error = %exc, exit_code = result.exit_code, "snippet raised");
    }
    format!("{}{ERROR_MARKER}\n{}", result.stdout, result.stderr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_stdout_verbatim() {
        let result = ExecutionResult {
            stdout: "hello\n  spaced\n".into(),
            stderr: String::new(),
            exit_code: 0,
        };
        assert_eq!(render(result), "hello\n  spaced\n");
    }

    #[test]
    fn failure_keeps_partial_output_and_marks_the_error() {
        let result = ExecutionResult {
            stdout: "before the crash\n".into(),
            stderr: "Traceback (most recent call last):\nValueError: boom".into(),
            exit_code: 1,
        };
        let body = render(result);
        assert!(body.starts_with("before the crash\n"));
        assert!(body.contains(ERROR_MARKER));
        assert!(body.contains("ValueError: boom"));
    }
}
