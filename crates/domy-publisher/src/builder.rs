use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};

/// Produces the build output that publishing reads.
pub trait ProjectBuilder {
    fn build(&self, project_root: &Path) -> Result<()>;
}

/// Runs an external build command in the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new("npx", ["stencil", "build", "--docs"])
    }
}

impl ProjectBuilder for CommandBuilder {
    fn build(&self, project_root: &Path) -> Result<()> {
        log::info!(
            "running '{}' in {}",
            self.command_line(),
            project_root.display()
        );
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(project_root);
        run_command(&mut command, &format!("build '{}' failed", self.command_line()))
    }
}

fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}
