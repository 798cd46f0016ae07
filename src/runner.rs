//! Execution of compiled scripts in an external JavaScript runtime.
//!
//! The script is passed as `<node> -e <script>`; whatever the script prints
//! through the captured print primitive is returned as text.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{OutputEncoding, RunnerConfig};
use crate::model::CompiledScript;
use crate::processor;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("JavaScript runtime not found at {}", .path.display())]
    RuntimeNotFound { path: PathBuf },

    #[error("JavaScript execution timeout after {}s", .timeout.as_secs_f32())]
    ExecutionTimeout { timeout: Duration },

    #[error("JavaScript execution error ({status}): {stderr}")]
    ExecutionFailed { status: ExitStatus, stderr: String },

    #[error("script output is not valid UTF-8")]
    InvalidOutput(#[from] std::string::FromUtf8Error),

    #[error("running {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Run `script` and return its captured stdout.
///
/// The child is killed if the timeout expires before it exits.
pub async fn execute(script: &str, config: &RunnerConfig) -> Result<String, ExecError> {
    let path = config.node_path.clone();
    debug!(runtime = %path.display(), bytes = script.len(), "spawning runtime");

    let child = Command::new(&path)
        .arg("-e")
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ExecError::RuntimeNotFound { path: path.clone() },
            _ => ExecError::Io {
                path: path.clone(),
                source,
            },
        })?;

    let timeout = config.timeout();
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Err(_) => return Err(ExecError::ExecutionTimeout { timeout }),
        Ok(result) => result.map_err(|source| ExecError::Io { path, source })?,
    };

    info!(status = %output.status, stdout = output.stdout.len(), "runtime exited");

    if !output.status.success() {
        return Err(ExecError::ExecutionFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let mut text = match config.output_encoding {
        OutputEncoding::Utf8 => String::from_utf8(output.stdout)?,
        OutputEncoding::Utf8Lossy => String::from_utf8_lossy(&output.stdout).into_owned(),
    };
    if config.strip_trailing_newline {
        strip_print_newline(&mut text);
    }
    Ok(text)
}

/// Remove the one line break `console.log` adds after its argument.
fn strip_print_newline(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

/// A template document bundled with the settings used to run it.
#[derive(Debug, Clone)]
pub struct MacroScript {
    text: String,
    config: RunnerConfig,
}

impl MacroScript {
    pub fn new(text: impl Into<String>, config: RunnerConfig) -> Self {
        Self {
            text: text.into(),
            config,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn compile(&self) -> CompiledScript {
        processor::compile(&self.text)
    }

    /// Compile, then run in the configured runtime.
    pub async fn execute(&self) -> Result<String, ExecError> {
        execute(self.compile().as_str(), &self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_print_newline() {
        let test_cases = vec![
            ("", ""),
            ("\n", ""),
            ("text\n", "text"),
            ("text\r\n", "text"),
            ("two\n\n", "two\n"),
            ("none", "none"),
        ];

        for (input, expected) in test_cases {
            let mut s = input.to_string();
            strip_print_newline(&mut s);
            assert_eq!(s, expected, "input {input:?}");
        }
    }

    #[tokio::test]
    async fn test_missing_runtime() {
        let config = RunnerConfig {
            node_path: "/nonexistent/macroscript-node".into(),
            ..RunnerConfig::default()
        };
        let err = execute("1;", &config).await.unwrap_err();
        assert!(
            matches!(err, ExecError::RuntimeNotFound { .. }),
            "got: {err}"
        );
    }

    #[test]
    fn test_macro_script_compiles_its_text() {
        let ms = MacroScript::new("hello\n", RunnerConfig::default());
        assert!(ms.compile().as_str().contains("__code__ += `hello`;\n"));
        assert_eq!(ms.text(), "hello\n");
    }
}
