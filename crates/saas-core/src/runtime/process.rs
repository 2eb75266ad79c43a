//! Best-effort subprocess execution
//!
//! Failures here are never fatal to a scaffold. They come back as
//! [`ProcessOutcome::Failed`] with a reason suitable for the operator.

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// How a subprocess ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success,
    Failed(String),
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Success)
    }
}

/// A command line to run in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Shell-ready command for manual retry from `cwd`
    pub fn remedy(&self, cwd: &Path) -> String {
        format!("cd {} && {}", cwd.display(), self)
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Last non-empty line of captured output, for short diagnostics
fn summarize(output: &[u8]) -> Option<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_string)
}

/// Run `spec` in `cwd` and wait for it to exit
pub async fn run(spec: &ProcessSpec, cwd: &Path) -> ProcessOutcome {
    tracing::info!(command = %spec, cwd = %cwd.display(), "running");

    let mut command = TokioCommand::new(&spec.program);
    command
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = command.output();

    let output = match spec.timeout {
        Some(limit) => match timeout(limit, child).await {
            Ok(result) => result,
            Err(_) => {
                return ProcessOutcome::Failed(format!(
                    "`{}` timed out after {} seconds",
                    spec,
                    limit.as_secs()
                ))
            }
        },
        None => child.await,
    };

    let outcome = match output {
        Ok(out) if out.status.success() => ProcessOutcome::Success,
        Ok(out) => {
            let code = out
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let detail = summarize(&out.stderr).or_else(|| summarize(&out.stdout));
            ProcessOutcome::Failed(match detail {
                Some(detail) => format!("`{}` exited with {}: {}", spec, code, detail),
                None => format!("`{}` exited with {}", spec, code),
            })
        }
        Err(e) => ProcessOutcome::Failed(format!("Failed to start `{}`: {}", spec.program, e)),
    };

    if let ProcessOutcome::Failed(reason) = &outcome {
        tracing::info!(command = %spec, %reason, "subprocess failed");
    }
    outcome
}

/// Check whether `program --version` runs successfully
pub fn is_available(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}
