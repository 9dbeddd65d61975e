//! PDF merging and inspection

pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use merge::{merge_pdfs, pdf_set, LopdfMerger, MergeOptions, PdfMerger};
pub use metadata::count_pages;
