//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::config::pdf_matcher;
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic Parent chains in damaged files
const MAX_TREE_DEPTH: usize = 64;

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Something that can concatenate PDFs
///
/// Implementations return the number of pages written.
pub trait PdfMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<usize>;
}

/// The lopdf-backed merger used by the pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfMerger;

impl PdfMerger for LopdfMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<usize> {
        let options = MergeOptions {
            input_paths: inputs.to_vec(),
            output_path: output.to_path_buf(),
        };

        merge_pdfs(&options).map_err(|e| Error::Merge {
            output: output.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Merge multiple PDF files into a single PDF, returning the page count
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// Every input is loaded before the output is written, so `output_path`
/// may name one of the inputs.
///
/// # Example
///
/// ```no_run
/// use batch_pdf::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("Intro (Week 1).pdf"),
///         PathBuf::from("Exercises.pdf"),
///     ],
///     output_path: PathBuf::from("Week 1.pdf"),
/// };
///
/// merge_pdfs(&options).expect("Failed to merge");
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<usize> {
    if options.input_paths.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    for path in &options.input_paths {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    let mut documents: Vec<Document> = Vec::new();
    for path in &options.input_paths {
        let mut doc = Document::load(path)?;

        if doc.get_pages().is_empty() {
            return Err(Error::EmptyPdf(path.clone()));
        }

        // The old page trees are dropped below, so pages must carry
        // their inherited geometry and resources themselves
        flatten_inherited_attributes(&mut doc);
        documents.push(doc);
    }

    // Define a starting max_id for the merged document
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        page_ids.extend(doc.get_pages().into_values());

        // Old Pages nodes and catalogs are replaced by the ones built below
        objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !is_tree_node(object)),
        );
    }

    // Add all collected objects first
    let mut merged_doc = Document::with_version("1.5");
    merged_doc.objects.extend(objects);

    // new_object_id() must hand out ids above everything just inserted
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();
    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    // Point every page at the new Pages node
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(page)) = merged_doc.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    // Compress and save; inputs are all in memory, so output may be one of them
    merged_doc.compress();
    merged_doc.save(&options.output_path)?;

    Ok(page_ids.len())
}

/// List the PDFs of one folder, sorted by file name
///
/// Only regular files directly inside `folder` count; the order is the
/// byte order of the names, so it is stable for a given set of files.
pub fn pdf_set(folder: &Path) -> Result<Vec<PathBuf>> {
    let matcher = pdf_matcher();
    let mut pdfs: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if matcher.matches_path(&path) {
            pdfs.push(path);
        }
    }

    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// Copy inheritable attributes from the page tree onto every page
fn flatten_inherited_attributes(doc: &mut Document) {
    for page_id in doc.get_pages().into_values() {
        let inherited: Vec<(&[u8], Object)> = INHERITABLE_KEYS
            .iter()
            .filter_map(|key| inherited_attribute(doc, page_id, key).map(|value| (*key, value)))
            .collect();

        if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
            for (key, value) in inherited {
                page.set(key.to_vec(), value);
            }
        }
    }
}

/// Look up `key` on the ancestors of a page that does not set it itself
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let page = doc.get_dictionary(page_id).ok()?;
    if page.has(key) {
        return None;
    }

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Page tree roots and catalogs of the inputs are rebuilt, not copied
fn is_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type"),
            Ok(Object::Name(name)) if name == b"Pages" || name == b"Catalog"
        ),
        _ => false,
    }
}
