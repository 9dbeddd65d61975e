//! In-process DOCX rendering

use std::path::Path;
use crate::error::{Error, Result};
use super::{ensure_source, DocumentConverter};

/// Converter backed by the `docxside-pdf` renderer
///
/// Needs no external application, but only understands DOCX packages.
#[derive(Debug, Default)]
pub struct NativeConverter;

impl DocumentConverter for NativeConverter {
    fn name(&self) -> &str {
        "native"
    }

    fn convert(&mut self, source: &Path, destination: &Path) -> Result<()> {
        ensure_source(source)?;

        docxside_pdf::convert_docx_to_pdf(source, destination).map_err(|e| Error::Conversion {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
