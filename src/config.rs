//! Run configuration and document matching

use std::path::{Path, PathBuf};
use glob::Pattern;
use log::warn;
use crate::error::{Error, Result};

/// Pattern used when no document patterns are given
pub const DEFAULT_DOCUMENT_PATTERN: &str = "*.docx";

/// Pattern describing the files that make up a folder's PDF set
pub const PDF_PATTERN: &str = "*.pdf";

/// Prefix Word uses for owner/lock files next to open documents
const OWNER_FILE_PREFIX: &str = "~$";

/// Options for one batch run
///
/// Built once from flags and prompts, then only read by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Folder whose tree is converted
    pub input_root: PathBuf,
    /// Folder that receives the mirrored tree
    pub output_root: PathBuf,
    /// Remove each source document after it converts
    pub delete_sources: bool,
    /// Combine the PDFs of every folder that produced at least one PDF
    pub combine_outputs: bool,
    /// Glob patterns (file name only) selecting the documents to convert
    pub document_patterns: Vec<String>,
}

impl RunConfig {
    /// Create a configuration with both options enabled and the default pattern
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            delete_sources: true,
            combine_outputs: true,
            document_patterns: vec![DEFAULT_DOCUMENT_PATTERN.to_string()],
        }
    }

    pub fn with_delete_sources(mut self, delete_sources: bool) -> Self {
        self.delete_sources = delete_sources;
        self
    }

    pub fn with_combine_outputs(mut self, combine_outputs: bool) -> Self {
        self.combine_outputs = combine_outputs;
        self
    }

    /// Replace the document patterns; an empty list keeps the default
    pub fn with_document_patterns(mut self, patterns: Vec<String>) -> Self {
        if !patterns.is_empty() {
            self.document_patterns = patterns;
        }
        self
    }

    /// Check the parts of the configuration that must hold before any I/O
    pub fn validate(&self) -> Result<()> {
        if !self.input_root.is_dir() {
            return Err(Error::InvalidInputRoot(self.input_root.clone()));
        }
        self.document_matcher()?;
        Ok(())
    }

    /// Compile the document patterns
    pub fn document_matcher(&self) -> Result<DocumentMatcher> {
        DocumentMatcher::new(&self.document_patterns)
    }
}

/// Compiled file-name patterns
///
/// Matching is case-sensitive and looks at the file name only, never at
/// the directory part of a path.
#[derive(Debug, Clone)]
pub struct DocumentMatcher {
    patterns: Vec<Pattern>,
}

impl DocumentMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref())
                    .map_err(|e| Error::InvalidPattern(format!("{}: {}", p.as_ref(), e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Whether a file name selects a document
    pub fn matches(&self, file_name: &str) -> bool {
        if file_name.starts_with(OWNER_FILE_PREFIX) {
            return false;
        }
        self.patterns.iter().any(|p| p.matches(file_name))
    }

    /// Convenience for paths
    ///
    /// Names that are not valid UTF-8 are matched on their lossy form and
    /// reported, since they may not survive every conversion engine.
    pub fn matches_path(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };

        match name.to_str() {
            Some(name) => self.matches(name),
            None => {
                let lossy = name.to_string_lossy();
                let matched = self.matches(&lossy);
                warn!("File name is not valid UTF-8: {}", path.display());
                matched
            }
        }
    }
}

/// Matcher for the PDFs that make up a folder's combined output
pub fn pdf_matcher() -> DocumentMatcher {
    DocumentMatcher {
        patterns: vec![Pattern::new(PDF_PATTERN).expect("static pattern is valid")],
    }
}
