//! PDF page counting

use std::path::Path;
use lopdf::{Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Follow a reference held under `key` in a dictionary
fn referenced_id(dict: &lopdf::Dictionary, key: &[u8], what: &str) -> Result<ObjectId> {
    match dict.get(key) {
        Ok(Object::Reference(id)) => Ok(*id),
        Ok(_) => Err(Error::General(format!("{} is not a reference", what))),
        Err(_) => Err(Error::General(format!("No {} entry", what))),
    }
}

/// Count pages by reading the Count field from the Pages dictionary
///
/// More reliable than `get_pages()` on files whose page tree is nested.
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog_id = referenced_id(&doc.trailer, b"Root", "Root")?;
    let catalog = doc.get_dictionary(catalog_id)?;

    let pages_id = referenced_id(catalog, b"Pages", "Pages")?;
    let pages = doc.get_dictionary(pages_id)?;

    match pages.get(b"Count") {
        Ok(Object::Integer(n)) if *n >= 0 => Ok(*n as usize),
        Ok(_) => Err(Error::General("Count is not a page count".to_string())),
        Err(_) => Err(Error::General("No Count in Pages".to_string())),
    }
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_referenced_id_rejects_non_reference() {
        let mut dict = lopdf::Dictionary::new();
        dict.set("Root", Object::Integer(4));
        assert!(referenced_id(&dict, b"Root", "Root").is_err());
        assert!(referenced_id(&dict, b"Pages", "Pages").is_err());
    }
}
