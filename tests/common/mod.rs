//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use batch_pdf::convert::DocumentConverter;
use batch_pdf::{Error, Result};
use lopdf::{dictionary, Document, Object, Stream};

/// Write a small valid PDF with `pages` pages
///
/// The MediaBox lives on the Pages node only, so merged output has to
/// carry it onto the pages itself.
pub fn write_pdf(path: &Path, pages: usize) {
    write_pdf_with_width(path, pages, 595);
}

/// Like [`write_pdf`], with a page width that identifies the file
pub fn write_pdf_with_width(path: &Path, pages: usize, width: i64) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let content = Stream::new(dictionary! {}, format!("% page {}", i + 1).into_bytes());
        let content_id = doc.add_object(content);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("Failed to write test PDF");
}

/// Write placeholder documents relative to `root`
pub fn write_documents(root: &Path, relative_paths: &[&str]) {
    for relative in relative_paths {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("document {}", relative)).unwrap();
    }
}

/// Converter stand-in: writes a one-page PDF, fails for names containing "broken"
///
/// Names containing "vanishing" convert but take their source with them,
/// so a later delete of that source fails.
#[derive(Debug, Default)]
pub struct FakeConverter {
    pub calls: Vec<PathBuf>,
}

impl DocumentConverter for FakeConverter {
    fn name(&self) -> &str {
        "fake"
    }

    fn convert(&mut self, source: &Path, destination: &Path) -> Result<()> {
        self.calls.push(source.to_path_buf());

        if !source.is_file() {
            return Err(Error::MissingSource(source.to_path_buf()));
        }
        if source.to_string_lossy().contains("broken") {
            return Err(Error::Conversion {
                path: source.to_path_buf(),
                reason: "engine crashed".to_string(),
            });
        }

        write_pdf(destination, 1);
        if source.to_string_lossy().contains("vanishing") {
            fs::remove_file(source).expect("Failed to remove test source");
        }
        Ok(())
    }
}

/// Every directory below `root` (root excluded), as sorted relative paths
pub fn relative_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    dirs.sort();
    dirs
}

/// File names directly inside `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
