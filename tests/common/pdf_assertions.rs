use lopdf::Document as LopdfDocument;
use lopdf::Object;

/// Text shown by `Tj` operations on each page, in page order.
pub fn page_texts(doc: &LopdfDocument) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = match doc.get_and_decode_page_content(*page_id) {
                Ok(content) => content,
                Err(_) => return String::new(),
            };
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(decode_win_ansi(bytes)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

/// Font sizes selected by `Tf` operations, across all pages in order.
pub fn font_sizes(doc: &LopdfDocument) -> Vec<f32> {
    doc.get_pages()
        .values()
        .filter_map(|page_id| doc.get_and_decode_page_content(*page_id).ok())
        .flat_map(|content| content.operations)
        .filter(|op| op.operator == "Tf")
        .filter_map(|op| op.operands.get(1).and_then(|size| size.as_float().ok()))
        .collect()
}

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    page_texts(doc).join("\n")
}

/// Value of an Info dictionary entry, if present.
pub fn info_entry(doc: &LopdfDocument, name: &str) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_dictionary(info_id).ok()?;
    let bytes = info.get(name.as_bytes()).ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert the text of every page, in order
#[macro_export]
macro_rules! assert_pdf_page_texts {
    ($pdf:expr, [$($text:expr),* $(,)?]) => {
        let expected: Vec<String> = vec![$($text.to_string()),*];
        assert_eq!($pdf.page_texts(), expected, "unexpected page texts");
    };
}
