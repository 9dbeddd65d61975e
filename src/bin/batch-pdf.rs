//! Batch PDF CLI tool
//!
//! Converts a folder tree of Word documents to PDF, mirroring the tree
//! under an output folder and optionally combining the PDFs of each folder.
//! Anything not given on the command line is asked for interactively.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use batch_pdf::convert::{DocumentConverter, OfficeConverter, DEFAULT_SOFFICE};
use batch_pdf::pdf::LopdfMerger;
use batch_pdf::prompt::{
    prompt_confirm, select_folders, prompt_folder, COMBINE_LABEL, DELETE_LABEL, INPUT_TITLE,
    OUTPUT_TITLE,
};
use batch_pdf::{Error, Pipeline, RunConfig};

/// Batch PDF - Convert Word documents to PDF and combine them per folder
#[derive(Parser)]
#[command(name = "batch-pdf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Ask for everything interactively
    batch-pdf

    # Convert without deleting the sources, combining each folder
    batch-pdf --input handouts --output handouts-pdf --delete-sources false --combine true

    # Use an installed LibreOffice and also convert legacy .doc files
    batch-pdf --converter office --pattern \"*.docx\" --pattern \"*.doc\"")]
struct Cli {
    /// Folder containing the documents (asked for when missing)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Folder receiving the mirrored PDFs (asked for when missing)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Delete each document after it converts (asked for when missing)
    #[arg(long, value_name = "BOOL")]
    delete_sources: Option<bool>,

    /// Combine the PDFs of every folder (asked for when missing)
    #[arg(long, value_name = "BOOL")]
    combine: Option<bool>,

    /// Document file name pattern; repeat for several (default "*.docx")
    #[arg(long = "pattern", value_name = "GLOB")]
    patterns: Vec<String>,

    /// Conversion engine
    #[arg(long, value_enum, default_value_t = ConverterKind::default())]
    converter: ConverterKind,

    /// LibreOffice binary used by the office engine
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SOFFICE)]
    soffice: PathBuf,

    /// Open the output folder when the run finishes
    #[arg(long)]
    open: bool,
}

/// Available conversion engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ConverterKind {
    /// Render DOCX in-process
    #[cfg_attr(feature = "native", default)]
    Native,
    /// Drive an installed LibreOffice
    #[cfg_attr(not(feature = "native"), default)]
    Office,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    // Options are asked before the folders
    let delete_sources = match cli.delete_sources {
        Some(value) => value,
        None => prompt_confirm(&mut input, &mut output, DELETE_LABEL, true)?,
    };
    let combine_outputs = match cli.combine {
        Some(value) => value,
        None => prompt_confirm(&mut input, &mut output, COMBINE_LABEL, true)?,
    };

    let (input_root, output_root) = match (cli.input, cli.output) {
        (Some(i), Some(o)) => (i, o),
        (None, None) => select_folders(&mut input, &mut output)?,
        (Some(i), None) => (i, ask_folder(&mut input, &mut output, OUTPUT_TITLE, Error::NoOutputSelected)?),
        (None, Some(o)) => (ask_folder(&mut input, &mut output, INPUT_TITLE, Error::NoInputSelected)?, o),
    };
    output.flush()?;

    let config = RunConfig::new(input_root, output_root)
        .with_delete_sources(delete_sources)
        .with_combine_outputs(combine_outputs)
        .with_document_patterns(cli.patterns);

    let converter = build_converter(cli.converter, &cli.soffice)?;
    let mut pipeline = Pipeline::new(converter, LopdfMerger);
    let report = pipeline.run(&config)?;

    if report.failures() > 0 {
        info!("{} item(s) failed; see the messages above", report.failures());
    }

    if cli.open {
        open_folder(&config.output_root)
            .with_context(|| format!("could not open {}", config.output_root.display()))?;
    }

    Ok(())
}

fn ask_folder(
    input: &mut impl io::BufRead,
    output: &mut impl Write,
    title: &str,
    cancelled: Error,
) -> Result<PathBuf> {
    match prompt_folder(input, output, title)? {
        Some(folder) => Ok(folder),
        None => Err(cancelled.into()),
    }
}

fn build_converter(kind: ConverterKind, soffice: &Path) -> Result<Box<dyn DocumentConverter>> {
    match kind {
        ConverterKind::Native => native_converter(),
        ConverterKind::Office => Ok(Box::new(OfficeConverter::new(soffice))),
    }
}

#[cfg(feature = "native")]
fn native_converter() -> Result<Box<dyn DocumentConverter>> {
    Ok(Box::new(batch_pdf::convert::NativeConverter))
}

#[cfg(not(feature = "native"))]
fn native_converter() -> Result<Box<dyn DocumentConverter>> {
    anyhow::bail!("this build has no native converter; use --converter office")
}

/// Open a folder with the system file manager
fn open_folder(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("explorer").arg(path).spawn()?;
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        anyhow::bail!("opening {} is not supported on this platform", path.display());
    }
    Ok(())
}
