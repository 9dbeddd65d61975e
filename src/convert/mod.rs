//! Document to PDF conversion engines
//!
//! The pipeline only sees the [`DocumentConverter`] trait. Engines are
//! treated as stateful single instances, so conversion takes `&mut self`
//! and documents are converted one at a time.

#[cfg(feature = "native")]
mod native;
mod office;

#[cfg(feature = "native")]
pub use native::NativeConverter;
pub use office::{OfficeConverter, DEFAULT_SOFFICE};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};

/// A capability that renders one document as a PDF
pub trait DocumentConverter {
    /// Short engine name for log lines
    fn name(&self) -> &str;

    /// Write a PDF rendering of `source` to `destination`
    ///
    /// The parent directory of `destination` must already exist.
    fn convert(&mut self, source: &Path, destination: &Path) -> Result<()>;
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn convert(&mut self, source: &Path, destination: &Path) -> Result<()> {
        (**self).convert(source, destination)
    }
}

/// Destination of a converted document: same file name, `.pdf` extension
pub fn pdf_destination(output_dir: &Path, file_name: &OsStr) -> PathBuf {
    output_dir.join(Path::new(file_name).with_extension("pdf"))
}

/// Fail with `MissingSource` when the document is gone
pub(crate) fn ensure_source(source: &Path) -> Result<()> {
    if source.is_file() {
        Ok(())
    } else {
        Err(Error::MissingSource(source.to_path_buf()))
    }
}
