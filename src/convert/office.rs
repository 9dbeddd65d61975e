//! Conversion through an installed LibreOffice

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use log::debug;
use crate::error::{Error, Result};
use super::{ensure_source, DocumentConverter};

/// Program looked up on `PATH` when no explicit binary is given
pub const DEFAULT_SOFFICE: &str = "soffice";

/// Converter that shells out to `soffice --headless --convert-to pdf`
///
/// Each call blocks until the office process exits.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: PathBuf,
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_SOFFICE)
    }
}

impl OfficeConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the office invocation converting `source` into `out_dir`
    pub fn command(&self, source: &Path, out_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(source);
        command
    }

    fn failure(&self, source: &Path, reason: impl Into<String>) -> Error {
        Error::Conversion {
            path: source.to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl DocumentConverter for OfficeConverter {
    fn name(&self) -> &str {
        "office"
    }

    fn convert(&mut self, source: &Path, destination: &Path) -> Result<()> {
        ensure_source(source)?;

        let source = fs::canonicalize(source)?;
        let out_dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent)?,
            _ => std::env::current_dir()?,
        };

        debug!("Running {} on {}", self.program.display(), source.display());
        let output = self.command(&source, &out_dir).output().map_err(|e| {
            self.failure(&source, format!("could not start {}: {}", self.program.display(), e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("office exited with {}", output.status),
                message => message.to_string(),
            };
            return Err(self.failure(&source, reason));
        }

        // The office names its output after the source document
        let stem = source.file_stem().unwrap_or_default();
        let produced = out_dir.join(Path::new(stem).with_extension("pdf"));
        if !produced.is_file() {
            return Err(self.failure(&source, "office produced no PDF"));
        }

        let destination = out_dir.join(destination.file_name().unwrap_or(stem));
        if produced != destination {
            fs::rename(&produced, &destination)?;
        }

        Ok(())
    }
}
