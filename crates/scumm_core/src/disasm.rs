use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::core_api::DescummConfig;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{program} not found; install descumm or pass --descumm <PATH>")]
    NotFound { program: PathBuf },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to stage script for disassembly: {0}")]
    Staging(#[source] io::Error),

    #[error("descumm returned non-zero result: {code}; stderr: {}", .stderr.trim())]
    Failed { code: i32, stderr: String },

    #[error("descumm was terminated without an exit code; stderr: {}", .stderr.trim())]
    Terminated { stderr: String },
}

/// Turns one complete script block (header included) into a text listing.
pub trait Disassembler {
    fn disassemble(&self, block: &[u8]) -> Result<String, ToolError>;
}

impl<D: Disassembler + ?Sized> Disassembler for &D {
    fn disassemble(&self, block: &[u8]) -> Result<String, ToolError> {
        (**self).disassemble(block)
    }
}

impl<D: Disassembler + ?Sized> Disassembler for Box<D> {
    fn disassemble(&self, block: &[u8]) -> Result<String, ToolError> {
        (**self).disassemble(block)
    }
}

/// Runs the external `descumm` program on a temporary copy of the block.
#[derive(Debug, Clone)]
pub struct Descumm {
    config: DescummConfig,
}

impl Descumm {
    pub fn new(config: DescummConfig) -> Self {
        Self { config }
    }

    fn stage(block: &[u8]) -> io::Result<tempfile::TempPath> {
        let mut file = NamedTempFile::with_prefix("scumm-block-")?;
        file.write_all(block)?;
        file.flush()?;
        // Close our handle so the child can open the file on every platform;
        // the path is still removed when it drops.
        Ok(file.into_temp_path())
    }
}

impl Disassembler for Descumm {
    fn disassemble(&self, block: &[u8]) -> Result<String, ToolError> {
        let staged = Self::stage(block).map_err(ToolError::Staging)?;
        let program = &self.config.program;
        debug!(
            "running {} {} {} ({} bytes)",
            program.display(),
            self.config.version_flag,
            staged.display(),
            block.len()
        );

        let output = Command::new(program)
            .arg(&self.config.version_flag)
            .arg(staged.as_os_str())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ToolError::NotFound {
                    program: program.clone(),
                },
                _ => ToolError::Spawn {
                    program: program.clone(),
                    source: e,
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(match output.status.code() {
                Some(code) => ToolError::Failed { code, stderr },
                None => ToolError::Terminated { stderr },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
