use lopdf::Document as LopdfDocument;

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// Positions (PDF user space) of every `Td` on a page (1-based).
pub fn text_positions(doc: &LopdfDocument, page: u32) -> Vec<(f32, f32)> {
    let Some(page_id) = doc.get_pages().get(&page).copied() else {
        return Vec::new();
    };
    let Ok(content) = doc.get_and_decode_page_content(page_id) else {
        return Vec::new();
    };
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Td")
        .filter_map(|op| {
            let x = op.operands.first()?.as_float().ok()?;
            let y = op.operands.get(1)?.as_float().ok()?;
            Some((x, y))
        })
        .collect()
}

/// Number of `Do` (image) operations on a page (1-based).
pub fn image_draws(doc: &LopdfDocument, page: u32) -> usize {
    doc.get_pages()
        .get(&page)
        .and_then(|id| doc.get_and_decode_page_content(*id).ok())
        .map(|content| content.operations.iter().filter(|op| op.operator == "Do").count())
        .unwrap_or(0)
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

/// Assert that a page does NOT contain specific text
#[macro_export]
macro_rules! assert_page_not_contains_text {
    ($pdf:expr, $page:expr, $text:expr) => {
        let extracted = $pdf.page_text($page);
        assert!(
            !extracted.contains($text),
            "Page {} should NOT contain '{}', but it was found in:\n{}",
            $page,
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
