//! PDF text extraction

use crate::error::{Error, Result};
use crate::types::Document;

/// Ligatures and glyphs that PDF fonts commonly emit in place of plain text
const GLYPH_REPLACEMENTS: &[(char, &str)] = &[
    ('\0', ""),
    ('\u{00A0}', " "), // Non-breaking space
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{2010}', "-"), // Hyphen
    ('\u{2011}', "-"), // Non-breaking hyphen
    ('\u{00AD}', ""),  // Soft hyphen
];

/// Clean up extracted PDF text
fn cleanup_pdf_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match GLYPH_REPLACEMENTS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, replacement)) => result.push_str(replacement),
            None => result.push(c),
        }
    }
    result
}

/// PDF parser: pdf-extract first, lopdf as a fallback
pub struct PdfParser;

impl PdfParser {
    /// Whether the bytes carry the PDF header
    pub fn is_pdf(data: &[u8]) -> bool {
        data.starts_with(b"%PDF-")
    }

    /// Extract the text of an uploaded PDF.
    ///
    /// CPU-bound; call from a blocking context.
    pub fn parse(filename: &str, data: &[u8]) -> Result<Document> {
        if !Self::is_pdf(data) {
            return Err(Error::file_parse(filename, "File is not a PDF"));
        }

        let text = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("pdf-extract found no text in '{}', trying fallback", filename);
                Self::extract_fallback(filename, data)?
            }
            Err(e) => {
                tracing::warn!("pdf-extract failed for '{}': {}, trying fallback", filename, e);
                Self::extract_fallback(filename, data)?
            }
        };

        let text = cleanup_pdf_text(&text);
        if text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF (it may be image-based)",
            ));
        }

        let total_pages = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        Ok(Document {
            filename: filename.to_string(),
            text,
            total_pages,
        })
    }

    /// Fallback PDF text extraction using lopdf directly
    fn extract_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        doc.extract_text(&pages)
            .map_err(|e| Error::file_parse(filename, format!("Failed to extract text: {}", e)))
    }
}
