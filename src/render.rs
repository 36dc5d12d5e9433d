//! External template renderer
//!
//! Runs `<command> <args...> <staging file>` with the generated environment
//! added on top of the inherited one, writing the renderer's stdout to the
//! output file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::common::config::RendererConfig;
use crate::common::{Error, Result};
use crate::uservars::Environment;

/// A renderer resolved on PATH
#[derive(Debug, Clone)]
pub struct Renderer {
    command: String,
    program: PathBuf,
    args: Vec<String>,
}

impl Renderer {
    /// Resolve the configured renderer program
    pub fn from_config(config: &RendererConfig) -> Result<Self> {
        let program = which::which(&config.command)
            .map_err(|_| Error::RendererNotFound(config.command.clone()))?;
        debug!(program = %program.display(), "Resolved template renderer");
        Ok(Self {
            command: config.command.clone(),
            program,
            args: config.args.clone(),
        })
    }

    /// Render `staging` into `output`, running in `workdir`
    ///
    /// The output file is created before the renderer starts, so a failed
    /// render leaves a truncated or partial output behind.
    pub fn render(
        &self,
        workdir: &Path,
        staging: &Path,
        output: &Path,
        env: &Environment,
    ) -> Result<()> {
        let out = File::create(output).map_err(|e| Error::file_write(output, e))?;

        info!(
            "Rendering {} > {} with {}",
            staging.display(),
            output.display(),
            self.command
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(staging)
            .current_dir(workdir)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::from(out))
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::RendererFailed {
                command: self.command.clone(),
                status: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::RendererFailed {
                command: self.command.clone(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
