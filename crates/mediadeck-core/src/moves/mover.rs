//! The physical move primitive.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Result of one move attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Combined stdout and stderr of the operation.
    pub output: String,
    /// `None` on success.
    pub error: Option<String>,
}

impl MoveOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// An opaque, possibly slow, rename or copy of `source` to `destination`.
///
/// Implementations must not panic; every failure is reported through the
/// returned outcome so the calling worker keeps running.
#[async_trait]
pub trait Mover: Send + Sync {
    async fn move_path(&self, source: &Path, destination: &Path) -> MoveOutcome;
}

/// Moves with the system `mv` command.
#[derive(Debug, Clone, Default)]
pub struct ShellMover;

impl ShellMover {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mover for ShellMover {
    async fn move_path(&self, source: &Path, destination: &Path) -> MoveOutcome {
        debug!("mv {} {}", source.display(), destination.display());
        let result = Command::new("mv")
            .arg(source)
            .arg(destination)
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                if output.status.success() {
                    MoveOutcome::success(combined)
                } else {
                    MoveOutcome::failure(format!("mv exited with {}", output.status), combined)
                }
            }
            Err(e) => MoveOutcome::failure(format!("failed to run mv: {e}"), String::new()),
        }
    }
}
