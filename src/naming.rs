//! Combined-file naming
//!
//! The combined PDF of a folder takes its name from the first parenthesized
//! group in the alphabetically-first PDF of that folder, e.g.
//! `Report (Q3).pdf` gives `Q3.pdf`.

use lazy_static::lazy_static;
use regex::Regex;

/// Base name used when the first PDF carries no bracketed name
pub const FALLBACK_STEM: &str = "Merged_File";

lazy_static! {
    // Non-greedy: `a (b) c (d)` captures `b`
    static ref RE_BRACKETED: Regex = Regex::new(r"\((.*?)\)").unwrap();
}

/// Extract the text of the first `(...)` group, if any
pub fn bracketed_name(file_name: &str) -> Option<&str> {
    RE_BRACKETED
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

/// Resolve the combined PDF's file name from the first PDF of a folder
pub fn combined_file_name(first_pdf: &str) -> String {
    let stem = bracketed_name(first_pdf).unwrap_or(FALLBACK_STEM);
    format!("{}.pdf", stem)
}
