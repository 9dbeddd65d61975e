//! The directory-mirroring conversion and merge pipeline
//!
//! A run walks the input tree depth-first, mirrors every directory under
//! the output root, converts each matching document into the mirrored
//! directory and, when enabled, combines the PDFs of every directory that
//! produced at least one PDF. Only configuration problems end a run early;
//! every per-document and per-folder failure is logged and counted.

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};
use crate::config::{DocumentMatcher, RunConfig};
use crate::convert::{pdf_destination, DocumentConverter};
use crate::error::{Error, Result};
use crate::naming::combined_file_name;
use crate::pdf::{pdf_set, PdfMerger};

/// What happened during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Directories visited (and mirrored)
    pub directories: usize,
    /// Documents converted successfully
    pub converted: usize,
    pub conversion_failures: usize,
    /// Source documents removed after conversion
    pub deleted: usize,
    pub deletion_failures: usize,
    /// Combined PDFs written, in visiting order
    pub combined: Vec<PathBuf>,
    pub merge_failures: usize,
}

impl RunReport {
    /// Total number of per-unit failures
    pub fn failures(&self) -> usize {
        self.conversion_failures + self.deletion_failures + self.merge_failures
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} folder(s), {} converted, {} failed, {} deleted, {} combined PDF(s), {} other failure(s)",
            self.directories,
            self.converted,
            self.conversion_failures,
            self.deleted,
            self.combined.len(),
            self.deletion_failures + self.merge_failures,
        )
    }
}

/// Orchestrates conversion and merging over a directory tree
pub struct Pipeline<C, M> {
    converter: C,
    merger: M,
}

impl<C: DocumentConverter, M: PdfMerger> Pipeline<C, M> {
    pub fn new(converter: C, merger: M) -> Self {
        Self { converter, merger }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Run the pipeline once
    ///
    /// Fails only when the configuration is unusable or the output root
    /// cannot be created; everything after that is best effort.
    pub fn run(&mut self, config: &RunConfig) -> Result<RunReport> {
        config.validate()?;
        let matcher = config.document_matcher()?;

        fs::create_dir_all(&config.output_root)?;
        let nested_output = nested_output_root(&config.input_root, &config.output_root)?;

        info!(
            "Converting {} -> {} with the {} engine (delete sources: {}, combine: {})",
            config.input_root.display(),
            config.output_root.display(),
            self.converter.name(),
            config.delete_sources,
            config.combine_outputs,
        );

        let mut report = RunReport::default();

        let walker = WalkDir::new(&config.input_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry, nested_output.as_deref()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            self.process_directory(config, &matcher, entry.path(), &mut report);
        }

        info!("Done: {}", report.summary());
        Ok(report)
    }

    /// Mirror, convert and combine one directory of the input tree
    fn process_directory(
        &mut self,
        config: &RunConfig,
        matcher: &DocumentMatcher,
        dir: &Path,
        report: &mut RunReport,
    ) {
        let relative = dir.strip_prefix(&config.input_root).unwrap_or(Path::new(""));
        let output_dir = config.output_root.join(relative);

        if let Err(e) = fs::create_dir_all(&output_dir) {
            error!("Failed to create {}: {}", output_dir.display(), e);
            return;
        }
        report.directories += 1;

        let documents = match list_documents(dir, matcher) {
            Ok(documents) => documents,
            Err(e) => {
                error!("Failed to list {}: {}", dir.display(), e);
                return;
            }
        };

        let mut produced: Vec<PathBuf> = Vec::new();
        for source in documents {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let destination = pdf_destination(&output_dir, file_name);

            match self.converter.convert(&source, &destination) {
                Ok(()) => {
                    info!("Converted: {} -> {}", source.display(), destination.display());
                    report.converted += 1;
                    produced.push(destination);
                }
                Err(e) => {
                    error!("{}", conversion_message(&source, &e));
                    report.conversion_failures += 1;
                    continue;
                }
            }

            if config.delete_sources {
                match remove_source(&source) {
                    Ok(()) => {
                        info!("Deleted: {}", source.display());
                        report.deleted += 1;
                    }
                    Err(e) => {
                        error!("{}", e);
                        report.deletion_failures += 1;
                    }
                }
            }
        }

        if produced.is_empty() || !config.combine_outputs {
            return;
        }

        match self.combine_folder(&output_dir, &produced) {
            Ok(Some(combined)) => report.combined.push(combined),
            Ok(None) => {}
            Err(e) => {
                error!("Failed to merge PDFs in {}: {}", output_dir.display(), e);
                report.merge_failures += 1;
            }
        }
    }

    /// Merge every PDF of a mirrored folder into its combined file
    ///
    /// The name comes from the first PDF produced in this run, so a
    /// combined file left by an earlier run never decides the name.
    fn combine_folder(&self, output_dir: &Path, produced: &[PathBuf]) -> Result<Option<PathBuf>> {
        let Some(first_name) = produced.iter().filter_map(|p| p.file_name()).min() else {
            return Ok(None);
        };
        let combined = output_dir.join(combined_file_name(&first_name.to_string_lossy()));
        let combined_name = combined.file_name();

        // A stale combined file is overwritten, not merged in; a document
        // converted this run under the same name is still merged first
        let overwrites_produced = produced.iter().any(|p| p.file_name() == combined_name);
        let inputs: Vec<PathBuf> = pdf_set(output_dir)?
            .into_iter()
            .filter(|p| overwrites_produced || p.file_name() != combined_name)
            .collect();
        if inputs.is_empty() {
            info!("No PDF files to merge in {}", output_dir.display());
            return Ok(None);
        }

        let pages = self.merger.merge(&inputs, &combined)?;
        info!(
            "Created combined PDF: {} ({} file(s), {} page(s))",
            combined.display(),
            inputs.len(),
            pages
        );

        Ok(Some(combined))
    }
}

/// Documents directly inside `dir`, sorted by file name
fn list_documents(dir: &Path, matcher: &DocumentMatcher) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if matcher.matches_path(entry.path()) {
            documents.push(entry.into_path());
        } else {
            debug!("Skipping {}", entry.path().display());
        }
    }

    Ok(documents)
}

fn remove_source(source: &Path) -> Result<()> {
    fs::remove_file(source).map_err(|e| Error::Deletion {
        path: source.to_path_buf(),
        source: e,
    })
}

/// Conversion errors already name the document; others get it prepended
fn conversion_message(source: &Path, error: &Error) -> String {
    match error {
        Error::Conversion { .. } | Error::MissingSource(_) => error.to_string(),
        other => format!("Failed to convert {}: {}", source.display(), other),
    }
}

/// The output root when it lives strictly inside the input root
fn nested_output_root(input_root: &Path, output_root: &Path) -> Result<Option<PathBuf>> {
    let input = fs::canonicalize(input_root)?;
    let output = fs::canonicalize(output_root)?;

    if output != input && output.starts_with(&input) {
        Ok(Some(output))
    } else {
        Ok(None)
    }
}

fn is_excluded(entry: &DirEntry, nested_output: Option<&Path>) -> bool {
    let Some(nested_output) = nested_output else {
        return false;
    };
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    match fs::canonicalize(entry.path()) {
        Ok(path) if path == nested_output => {
            debug!("Not descending into output folder {}", entry.path().display());
            true
        }
        _ => false,
    }
}
