//! Batch PDF Library
//!
//! Converts a tree of Word documents to PDF under an output folder that
//! mirrors the input tree, and optionally combines the PDFs of each folder
//! into one file. This library provides:
//! - A directory-mirroring conversion pipeline
//! - Pluggable document converters (in-process and LibreOffice)
//! - PDF merging and page counting
//! - Combined-file naming from bracketed names
//! - Terminal prompts for options and folders
//!
//! # Example
//!
//! ```no_run
//! use batch_pdf::{Pipeline, RunConfig};
//! use batch_pdf::convert::OfficeConverter;
//! use batch_pdf::pdf::LopdfMerger;
//!
//! let config = RunConfig::new("handouts", "handouts-pdf").with_delete_sources(false);
//! let mut pipeline = Pipeline::new(OfficeConverter::default(), LopdfMerger);
//!
//! let report = pipeline.run(&config).expect("Failed to start run");
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod naming;
pub mod pdf;
pub mod pipeline;
pub mod prompt;

// Re-export commonly used items
pub use config::RunConfig;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunReport};
