//! Interactive option and folder prompts
//!
//! These stand in for the options window and the two folder dialogs. Each
//! prompt is a plain function over a reader and a writer and returns the
//! operator's answer, with cancellation reported as a value rather than
//! by exiting.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use crate::error::{Error, Result};

pub const DELETE_LABEL: &str = "Delete Word Documents after conversion";
pub const COMBINE_LABEL: &str = "Combine PDFs after conversion";
pub const INPUT_TITLE: &str = "Select the folder containing DOCX files";
pub const OUTPUT_TITLE: &str = "Select the output folder for merged PDF";

/// The two switches of the options prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub delete_sources: bool,
    pub combine_outputs: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            delete_sources: true,
            combine_outputs: true,
        }
    }
}

/// Ask a yes/no question until it gets an answer
///
/// An empty answer picks `default`; end of input also picks `default`.
pub fn prompt_confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> io::Result<bool> {
    let mut line = String::new();

    loop {
        line.clear();

        if default {
            write!(output, "{} (Y/n): ", question)?;
        } else {
            write!(output, "{} (y/N): ", question)?;
        }
        output.flush()?;

        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(default);
        }

        match line.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => return Ok(default),
            _ => continue,
        }
    }
}

/// Ask for a folder path; `None` means the operator cancelled
pub fn prompt_folder<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    title: &str,
) -> io::Result<Option<PathBuf>> {
    write!(output, "{} (leave empty to cancel): ", title)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }

    // Paths pasted from a file manager often arrive quoted
    let answer = line.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(answer)))
    }
}

/// Collect both switches, each defaulting to enabled
pub fn collect_options<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<RunOptions> {
    let defaults = RunOptions::default();

    Ok(RunOptions {
        delete_sources: prompt_confirm(input, output, DELETE_LABEL, defaults.delete_sources)?,
        combine_outputs: prompt_confirm(input, output, COMBINE_LABEL, defaults.combine_outputs)?,
    })
}

/// Ask for the input folder, then the output folder
///
/// Cancelling either prompt yields `NoInputSelected`/`NoOutputSelected`
/// before the second question is asked or anything touches the disk.
pub fn select_folders<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<(PathBuf, PathBuf)> {
    let input_root = prompt_folder(input, output, INPUT_TITLE)?.ok_or(Error::NoInputSelected)?;
    let output_root = prompt_folder(input, output, OUTPUT_TITLE)?.ok_or(Error::NoOutputSelected)?;
    Ok((input_root, output_root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answers(text: &str) -> Cursor<Vec<u8>> {
        Cursor::new(text.as_bytes().to_vec())
    }

    #[test]
    fn test_confirm_default_on_empty() {
        let mut out = Vec::new();
        assert!(prompt_confirm(&mut answers("\n"), &mut out, "Delete?", true).unwrap());
        assert!(!prompt_confirm(&mut answers("\n"), &mut out, "Delete?", false).unwrap());
    }

    #[test]
    fn test_confirm_reasks_on_junk() {
        let mut out = Vec::new();
        let result = prompt_confirm(&mut answers("maybe\nn\n"), &mut out, "Delete?", true).unwrap();
        assert!(!result);
        assert_eq!(String::from_utf8(out).unwrap().matches("Delete? (Y/n): ").count(), 2);
    }

    #[test]
    fn test_confirm_eof_uses_default() {
        let mut out = Vec::new();
        assert!(prompt_confirm(&mut answers(""), &mut out, "Combine?", true).unwrap());
    }

    #[test]
    fn test_collect_options_defaults_true() {
        let mut out = Vec::new();
        let options = collect_options(&mut answers("\n\n"), &mut out).unwrap();
        assert_eq!(options, RunOptions::default());

        let options = collect_options(&mut answers("n\ny\n"), &mut out).unwrap();
        assert!(!options.delete_sources);
        assert!(options.combine_outputs);
    }

    #[test]
    fn test_folder_prompt_trims_quotes() {
        let mut out = Vec::new();
        let folder = prompt_folder(&mut answers("  \"/data/My Docs\"  \n"), &mut out, INPUT_TITLE).unwrap();
        assert_eq!(folder, Some(PathBuf::from("/data/My Docs")));
    }

    #[test]
    fn test_cancelled_input_folder() {
        let mut out = Vec::new();
        let result = select_folders(&mut answers("\n/out\n"), &mut out);
        assert!(matches!(result, Err(Error::NoInputSelected)));
        // The output question is never asked
        assert!(!String::from_utf8(out).unwrap().contains(OUTPUT_TITLE));
    }

    #[test]
    fn test_cancelled_output_folder() {
        let mut out = Vec::new();
        let result = select_folders(&mut answers("/in\n"), &mut out);
        assert!(matches!(result, Err(Error::NoOutputSelected)));
    }

    #[test]
    fn test_select_both_folders() {
        let mut out = Vec::new();
        let (input, output) = select_folders(&mut answers("/in\n/out\n"), &mut out).unwrap();
        assert_eq!(input, PathBuf::from("/in"));
        assert_eq!(output, PathBuf::from("/out"));
    }
}
