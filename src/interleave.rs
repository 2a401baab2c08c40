//! Page interleaver
//!
//! The core transform: parse a PDF from memory, insert one blank page after
//! every original page, and serialize the result back to bytes. Pure with
//! respect to the caller: no I/O beyond the byte buffers, no user-facing
//! reporting. Errors come back typed and the orchestrator decides how to
//! present them.

use std::io::Cursor;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

use crate::error::InterleaveError;

/// Blank page dimensions in PDF points (US Letter).
///
/// Inserted pages never inherit size from their neighbors; every blank page
/// gets this fixed media box.
pub const BLANK_PAGE_WIDTH: f32 = 612.0;
pub const BLANK_PAGE_HEIGHT: f32 = 792.0;

/// Page attributes the PDF spec allows to be inherited from ancestor nodes
/// in the page tree.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Insert one blank page after every page of `input`.
///
/// An input with N pages yields an output with exactly 2N pages: page 2i is
/// the original page i with its content untouched, page 2i+1 is blank.
/// A zero-page document is legal and round-trips to a zero-page document.
pub fn interleave_blank_pages(input: &[u8]) -> Result<Vec<u8>, InterleaveError> {
    let mut doc = Document::load_mem(input).map_err(InterleaveError::Parse)?;

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    let pages_root = pages_root_id(&doc)?;

    materialize_inherited_attributes(&mut doc, &page_ids)?;

    // Rebuild the page tree as a flat list under the root node, with one
    // blank page after every original page.
    let mut kids: Vec<Object> = Vec::with_capacity(page_ids.len() * 2);
    for &page_id in &page_ids {
        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(InterleaveError::Parse)?;
        page.set(b"Parent".to_vec(), Object::Reference(pages_root));
        kids.push(Object::Reference(page_id));

        let blank_id = doc.add_object(blank_page(pages_root));
        kids.push(Object::Reference(blank_id));
    }

    let count = kids.len() as i64;
    let pages = doc
        .get_object_mut(pages_root)
        .and_then(Object::as_dict_mut)
        .map_err(InterleaveError::Parse)?;
    pages.set(b"Kids".to_vec(), Object::Array(kids));
    pages.set(b"Count".to_vec(), Object::Integer(count));
    // Strip inheritable attributes from the root so blank pages cannot pick
    // them up. Originals that relied on them were patched above.
    for key in INHERITABLE_PAGE_KEYS {
        pages.remove(key);
    }

    doc.compress();

    let mut output = Cursor::new(Vec::new());
    doc.save_to(&mut output).map_err(InterleaveError::Serialize)?;
    Ok(output.into_inner())
}

/// Number of pages in a PDF byte buffer.
pub fn page_count(input: &[u8]) -> Result<usize, InterleaveError> {
    let doc = Document::load_mem(input).map_err(InterleaveError::Parse)?;
    Ok(doc.get_pages().len())
}

fn pages_root_id(doc: &Document) -> Result<ObjectId, InterleaveError> {
    let catalog = doc.catalog().map_err(InterleaveError::Parse)?;
    catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(InterleaveError::Parse)
}

/// Copy inherited page attributes down onto the pages themselves.
///
/// Reparenting every page to the tree root would otherwise lose attributes
/// like `MediaBox` that the original document kept on intermediate nodes.
fn materialize_inherited_attributes(
    doc: &mut Document,
    page_ids: &[ObjectId],
) -> Result<(), InterleaveError> {
    let mut patches: Vec<(ObjectId, Vec<(&[u8], Object)>)> = Vec::new();

    for &page_id in page_ids {
        let page = doc.get_dictionary(page_id).map_err(InterleaveError::Parse)?;
        let mut missing = Vec::new();
        for key in INHERITABLE_PAGE_KEYS {
            if !page.has(key) {
                if let Some(value) = inherited_attribute(doc, page_id, key) {
                    missing.push((key, value));
                }
            }
        }
        if !missing.is_empty() {
            patches.push((page_id, missing));
        }
    }

    for (page_id, attrs) in patches {
        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(InterleaveError::Parse)?;
        for (key, value) in attrs {
            page.set(key.to_vec(), value);
        }
    }

    Ok(())
}

/// Walk the Parent chain looking for `key`. Depth-capped so a cyclic tree
/// in a malformed document cannot hang the transform.
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = page_id;
    for _ in 0..64 {
        let dict = doc.get_dictionary(node).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        node = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

fn blank_page(parent: ObjectId) -> Dictionary {
    dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            BLANK_PAGE_WIDTH.into(),
            BLANK_PAGE_HEIGHT.into(),
        ],
        "Resources" => Dictionary::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    /// Build an n-page PDF in memory. Each page carries a content stream
    /// with a translation matrix whose x offset is the page index, so tests
    /// can tell pages apart after the transform.
    fn sample_pdf(n: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for i in 0..n {
            let content = Content {
                operations: vec![Operation::new(
                    "cm",
                    vec![
                        1.into(),
                        0.into(),
                        0.into(),
                        1.into(),
                        (i as i64).into(),
                        0.into(),
                    ],
                )],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => n as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Cursor::new(Vec::new());
        doc.save_to(&mut buffer).unwrap();
        buffer.into_inner()
    }

    fn page_x_offset(doc: &Document, page_id: ObjectId) -> i64 {
        let raw = doc.get_page_content(page_id).unwrap();
        let content = Content::decode(&raw).unwrap();
        assert_eq!(content.operations[0].operator, "cm");
        content.operations[0].operands[4].as_i64().unwrap()
    }

    #[test]
    fn test_page_count_doubles() {
        for n in [1usize, 3, 5] {
            let output = interleave_blank_pages(&sample_pdf(n)).unwrap();
            assert!(output.starts_with(b"%PDF"));
            assert_eq!(page_count(&output).unwrap(), 2 * n);
        }
    }

    #[test]
    fn test_zero_page_document() {
        let output = interleave_blank_pages(&sample_pdf(0)).unwrap();
        assert_eq!(page_count(&output).unwrap(), 0);
    }

    #[test]
    fn test_original_content_at_even_positions() {
        let output = interleave_blank_pages(&sample_pdf(3)).unwrap();
        let doc = Document::load_mem(&output).unwrap();
        let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
        assert_eq!(pages.len(), 6);

        for i in 0..3 {
            assert_eq!(page_x_offset(&doc, pages[2 * i]), i as i64);
        }
    }

    #[test]
    fn test_blank_pages_have_no_content() {
        let output = interleave_blank_pages(&sample_pdf(2)).unwrap();
        let doc = Document::load_mem(&output).unwrap();
        let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();

        for &blank_id in &[pages[1], pages[3]] {
            let dict = doc.get_dictionary(blank_id).unwrap();
            assert!(!dict.has(b"Contents"));

            let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
            assert_eq!(media_box[2].as_float().unwrap(), BLANK_PAGE_WIDTH);
            assert_eq!(media_box[3].as_float().unwrap(), BLANK_PAGE_HEIGHT);
        }
    }

    #[test]
    fn test_original_media_box_preserved() {
        let output = interleave_blank_pages(&sample_pdf(1)).unwrap();
        let doc = Document::load_mem(&output).unwrap();
        let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();

        let dict = doc.get_dictionary(pages[0]).unwrap();
        let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_i64().unwrap(), 595);
        assert_eq!(media_box[3].as_i64().unwrap(), 842);
    }

    #[test]
    fn test_malformed_input_is_a_parse_error() {
        let err = interleave_blank_pages(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, InterleaveError::Parse(_)));
    }

    #[test]
    fn test_serialize_error_wraps_io() {
        let err = InterleaveError::Serialize(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        ));
        assert!(err.to_string().starts_with("Failed to serialize PDF"));
    }

    #[test]
    fn test_repeat_invocations_agree() {
        let input = sample_pdf(2);
        let first = interleave_blank_pages(&input).unwrap();
        let second = interleave_blank_pages(&input).unwrap();

        let doc_a = Document::load_mem(&first).unwrap();
        let doc_b = Document::load_mem(&second).unwrap();
        let pages_a: Vec<ObjectId> = doc_a.get_pages().values().copied().collect();
        let pages_b: Vec<ObjectId> = doc_b.get_pages().values().copied().collect();
        assert_eq!(pages_a.len(), pages_b.len());

        for i in 0..2 {
            assert_eq!(
                page_x_offset(&doc_a, pages_a[2 * i]),
                page_x_offset(&doc_b, pages_b[2 * i])
            );
        }
    }
}
