//! crates/quizsmith_core/src/normalizer.rs
//!
//! Turns an uploaded document into content a provider can consume: inline base64
//! for backends that ingest binary documents, or extracted text for those that
//! cannot read PDFs.
//!
//! Type and size validation happen before a document reaches this module.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::fmt::Display;
use tracing::{debug, warn};

use crate::domain::{MediaType, UploadedDocument};
use crate::ports::{PortError, PortResult};

/// Provider-ready document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedContent {
    /// The original bytes, base64-encoded.
    Inline { media_type: MediaType, data: String },
    /// Decoded or extracted text.
    Text(String),
}

impl NormalizedContent {
    /// `data:<mime>;base64,<data>` for inline content.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            NormalizedContent::Inline { media_type, data } => {
                Some(format!("data:{};base64,{}", media_type.mime(), data))
            }
            NormalizedContent::Text(_) => None,
        }
    }
}

/// Normalizes a document for a provider.
///
/// With `native_documents` every type passes through inline. Without it, PDFs go
/// through text extraction, plain text is decoded, and images still pass through.
pub fn normalize(document: &UploadedDocument, native_documents: bool) -> PortResult<NormalizedContent> {
    debug!(
        file_name = %document.file_name,
        media_type = %document.media_type,
        size = document.size(),
        native_documents,
        "Normalizing document"
    );

    match document.media_type {
        MediaType::PlainText => {
            let text = decode_plain_text(&document.bytes)?;
            if native_documents {
                Ok(inline(document))
            } else {
                Ok(NormalizedContent::Text(text))
            }
        }
        MediaType::Pdf if !native_documents => Ok(NormalizedContent::Text(extract_pdf_text(&document.bytes)?)),
        _ => Ok(inline(document)),
    }
}

fn inline(document: &UploadedDocument) -> NormalizedContent {
    NormalizedContent::Inline {
        media_type: document.media_type,
        data: STANDARD.encode(&document.bytes),
    }
}

/// Decodes a plain-text upload. Whitespace-only text is an `EmptyDocument`.
pub fn decode_plain_text(bytes: &[u8]) -> PortResult<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| PortError::DocumentLoad(format!("text is not valid UTF-8: {}", e)))?;
    if text.trim().is_empty() {
        return Err(PortError::EmptyDocument);
    }
    Ok(text.to_string())
}

/// Extracts the text layer of a PDF page by page.
///
/// A page that fails to extract is replaced by a failure marker; a document that
/// cannot be parsed at all is a `DocumentLoad` error.
pub fn extract_pdf_text(bytes: &[u8]) -> PortResult<String> {
    let document = Document::load_mem(bytes).map_err(|e| PortError::DocumentLoad(e.to_string()))?;
    let pages = document.get_pages();
    debug!(pages = pages.len(), "Extracting PDF text layer");

    join_pages(
        pages
            .into_iter()
            .map(|(number, page_id)| (number, extract_page(&document, number, page_id))),
    )
}

/// Extracts one page. `Document::extract_text` quietly yields nothing for content it
/// cannot read, so the page's streams and fonts are checked first.
fn extract_page(document: &Document, number: u32, page_id: ObjectId) -> Result<String, String> {
    let mut data = Vec::new();
    for stream_id in document.get_page_contents(page_id) {
        let stream = document
            .get_object(stream_id)
            .and_then(Object::as_stream)
            .map_err(|e| format!("content stream {:?} is unreadable: {}", stream_id, e))?;
        let plain = stream.get_plain_content().map_err(|e| e.to_string())?;
        if plain.is_empty() && !stream.content.is_empty() {
            return Err(format!("content stream {:?} could not be decompressed", stream_id));
        }
        data.extend_from_slice(&plain);
    }

    let content = Content::decode(&data).map_err(|e| e.to_string())?;
    let fonts = document.get_page_fonts(page_id).map_err(|e| e.to_string())?;
    for operation in content.operations.iter().filter(|op| op.operator == "Tf") {
        let font = operation
            .operands
            .first()
            .and_then(|operand| operand.as_name().ok())
            .ok_or_else(|| "text font operator without a font name".to_string())?;
        if !fonts.contains_key(font) {
            return Err(format!("undefined font /{}", String::from_utf8_lossy(font)));
        }
    }

    document.extract_text(&[number]).map_err(|e| e.to_string())
}

/// Assembles per-page extraction results into one text with `--- PAGE n ---` markers.
/// Fails with `EmptyDocument` when no page yielded any text.
pub fn join_pages<I, E>(pages: I) -> PortResult<String>
where
    I: IntoIterator<Item = (u32, Result<String, E>)>,
    E: Display,
{
    let mut sections = Vec::new();
    let mut has_text = false;

    for (number, extracted) in pages {
        match extracted {
            Ok(text) => {
                let text = text.trim();
                has_text |= !text.is_empty();
                sections.push(format!("--- PAGE {} ---\n{}", number, text));
            }
            Err(e) => {
                warn!(page = number, error = %e, "PDF page extraction failed, continuing");
                sections.push(format!("--- PAGE {} (Extraction Failed) ---", number));
            }
        }
    }

    if !has_text {
        return Err(PortError::EmptyDocument);
    }
    Ok(sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// How a test page's content stream is laid out.
    enum TestPage<'a> {
        Text(&'a str),
        /// `Contents` points at an object that does not exist.
        DanglingContents,
        /// A `FlateDecode` stream whose bytes are not zlib data.
        CorruptStream,
        /// Shows text in a font the page resources do not define.
        UndefinedFont(&'a str),
    }

    fn show_text(font: &str, text: &str) -> Vec<u8> {
        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ];
        Content { operations }.encode().unwrap()
    }

    fn build_pdf(pages: &[TestPage]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for page in pages {
            let contents: Object = match page {
                TestPage::Text(text) if text.is_empty() => doc.add_object(Stream::new(dictionary! {}, Vec::new())).into(),
                TestPage::Text(text) => doc.add_object(Stream::new(dictionary! {}, show_text("F1", text))).into(),
                TestPage::DanglingContents => Object::Reference((999, 0)),
                TestPage::CorruptStream => doc
                    .add_object(Stream::new(
                        dictionary! { "Filter" => "FlateDecode" },
                        b"these bytes are not zlib".to_vec(),
                    ))
                    .into(),
                TestPage::UndefinedFont(text) => {
                    doc.add_object(Stream::new(dictionary! {}, show_text("F9", text))).into()
                }
            };
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => contents,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// Builds an in-memory PDF with one page per entry, each showing that text.
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let pages: Vec<TestPage> = pages.iter().map(|text| TestPage::Text(text)).collect();
        build_pdf(&pages)
    }

    #[test]
    fn extracts_text_with_page_markers() {
        let bytes = pdf_with_pages(&["Mitochondria", "Ribosomes"]);
        let text = extract_pdf_text(&bytes).unwrap();

        assert!(text.contains("--- PAGE 1 ---"));
        assert!(text.contains("--- PAGE 2 ---"));
        assert!(text.contains("Mitochondria"));
        assert!(text.contains("Ribosomes"));
        assert!(text.find("Mitochondria") < text.find("--- PAGE 2 ---"));
    }

    #[test]
    fn pdf_without_text_layer_is_empty() {
        let bytes = pdf_with_pages(&["", ""]);
        assert!(matches!(extract_pdf_text(&bytes), Err(PortError::EmptyDocument)));
    }

    #[test]
    fn unparseable_pdf_is_a_load_error() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PortError::DocumentLoad(_)));
    }

    #[test]
    fn failed_page_is_marked_and_skipped() {
        let pages: Vec<(u32, Result<String, String>)> = vec![
            (1, Ok("Photosynthesis converts light into chemical energy.".to_string())),
            (2, Err("broken content stream".to_string())),
        ];
        let text = join_pages(pages).unwrap();

        assert!(text.contains("--- PAGE 1 ---\nPhotosynthesis converts light into chemical energy."));
        assert!(text.contains("--- PAGE 2 (Extraction Failed) ---"));
    }

    #[test]
    fn all_pages_failing_is_empty() {
        let pages: Vec<(u32, Result<String, String>)> =
            vec![(1, Err("bad".to_string())), (2, Ok("   ".to_string()))];
        assert!(matches!(join_pages(pages), Err(PortError::EmptyDocument)));
    }

    #[test]
    fn pdf_passes_through_for_native_providers() {
        let document = UploadedDocument::new("notes.pdf", MediaType::Pdf, b"%PDF-1.5 fake".to_vec());
        let content = normalize(&document, true).unwrap();
        assert_eq!(
            content,
            NormalizedContent::Inline { media_type: MediaType::Pdf, data: STANDARD.encode(b"%PDF-1.5 fake") }
        );
    }

    #[test]
    fn text_is_decoded_for_text_only_providers() {
        let document = UploadedDocument::new("notes.txt", MediaType::PlainText, "The cell is the unit of life.");
        let content = normalize(&document, false).unwrap();
        assert_eq!(content, NormalizedContent::Text("The cell is the unit of life.".to_string()));
    }

    #[test]
    fn images_always_pass_through_as_data_uris() {
        let document = UploadedDocument::new("diagram.png", MediaType::Png, vec![0x89, b'P', b'N', b'G']);
        let content = normalize(&document, false).unwrap();
        assert_eq!(content.data_uri().unwrap(), format!("data:image/png;base64,{}", STANDARD.encode([0x89, b'P', b'N', b'G'])));
    }

    #[test]
    fn invalid_text_is_rejected() {
        assert!(matches!(decode_plain_text(&[0xff, 0xfe, 0x00]), Err(PortError::DocumentLoad(_))));
        assert!(matches!(decode_plain_text(b" \n\t"), Err(PortError::EmptyDocument)));
    }

    #[test]
    fn broken_pages_in_a_real_pdf_are_marked() {
        for broken in [TestPage::DanglingContents, TestPage::CorruptStream, TestPage::UndefinedFont("Hidden")] {
            let bytes = build_pdf(&[TestPage::Text("PageOneText"), broken]);
            let text = extract_pdf_text(&bytes).unwrap();

            assert_eq!(text, "--- PAGE 1 ---\nPageOneText\n\n--- PAGE 2 (Extraction Failed) ---");
        }
    }

    #[test]
    fn only_broken_pages_is_empty() {
        let bytes = build_pdf(&[TestPage::CorruptStream, TestPage::DanglingContents]);
        assert!(matches!(extract_pdf_text(&bytes), Err(PortError::EmptyDocument)));
    }
}
