//! Pseudo-PDF emitter
//!
//! Wraps formatted lines in a minimal single-page PDF skeleton: catalog, page
//! tree, one page, one content stream, one base-14 font. Each line becomes a
//! literal string shown with `Tj`. Offsets in the xref table are measured from
//! the bytes actually written.
//!
//! Text is written as UTF-8 inside literal strings, so characters outside
//! WinAnsi show up garbled in strict readers. Only parentheses and backslashes
//! are escaped.

use std::io::Write;

use crate::error::{AppResult, ExportError};

use super::formatter::FormattedDocument;

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const FONT_SIZE: u32 = 12;
const LEADING: u32 = 15;
const LEFT_MARGIN: u32 = 72;
const TOP_BASELINE: u32 = 720;

/// Escape a line for use inside a PDF literal string
pub fn escape_literal(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for c in line.chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone)]
pub struct PseudoPdfEmitter {
    version: &'static str,
}

impl Default for PseudoPdfEmitter {
    fn default() -> Self {
        Self { version: "1.4" }
    }
}

impl PseudoPdfEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn content_stream(lines: &[String]) -> Vec<u8> {
        let mut stream = Vec::new();
        stream.extend_from_slice(b"BT\n");
        stream.extend_from_slice(format!("/F1 {} Tf\n", FONT_SIZE).as_bytes());
        stream.extend_from_slice(format!("{} {} Td\n", LEFT_MARGIN, TOP_BASELINE).as_bytes());
        for line in lines {
            stream.extend_from_slice(format!("({}) Tj\n", escape_literal(line)).as_bytes());
            stream.extend_from_slice(format!("0 -{} Td\n", LEADING).as_bytes());
        }
        stream.extend_from_slice(b"ET");
        stream
    }

    /// Emit the document bytes
    pub fn emit(&self, document: &FormattedDocument) -> AppResult<Vec<u8>> {
        self.write_pdf(document)
            .map_err(|source| ExportError::EmitFailed { source }.into())
    }

    fn write_pdf(&self, document: &FormattedDocument) -> std::io::Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut xref_offsets: Vec<(u32, usize)> = Vec::new();

        writeln!(output, "%PDF-{}", self.version)?;
        // binary marker
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n\n");

        xref_offsets.push((1, output.len()));
        write!(output, "1 0 obj\n<<\n/Type /Catalog\n/Pages 2 0 R\n>>\nendobj\n\n")?;

        xref_offsets.push((2, output.len()));
        write!(output, "2 0 obj\n<<\n/Type /Pages\n/Kids [3 0 R]\n/Count 1\n>>\nendobj\n\n")?;

        xref_offsets.push((3, output.len()));
        write!(
            output,
            "3 0 obj\n<<\n/Type /Page\n/Parent 2 0 R\n/MediaBox [0 0 {} {}]\n\
             /Resources << /Font << /F1 5 0 R >> >>\n/Contents 4 0 R\n>>\nendobj\n\n",
            PAGE_WIDTH, PAGE_HEIGHT
        )?;

        let stream = Self::content_stream(&document.lines);
        xref_offsets.push((4, output.len()));
        write!(output, "4 0 obj\n<<\n/Length {}\n>>\nstream\n", stream.len())?;
        output.extend_from_slice(&stream);
        write!(output, "\nendstream\nendobj\n\n")?;

        xref_offsets.push((5, output.len()));
        write!(
            output,
            "5 0 obj\n<<\n/Type /Font\n/Subtype /Type1\n/BaseFont /Helvetica\n>>\nendobj\n\n"
        )?;

        let object_count = xref_offsets.len() + 1;
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", object_count)?;
        writeln!(output, "0000000000 65535 f ")?;
        xref_offsets.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        write!(output, "trailer\n<<\n/Size {}\n/Root 1 0 R\n>>\n", object_count)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }
}
