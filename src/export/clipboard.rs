//! Clipboard export of the rendered document
//!
//! Uses arboard, which offers an HTML flavor on every desktop platform.
//! Applications that cannot paste HTML receive the plain-text fallback.

use crate::error::{Error, Result};
use crate::preview::{spans_text, ListMarker, PreviewBlock, RenderedDocument};
use arboard::Clipboard;
use log::info;

// ─────────────────────────────────────────────────────────────────────────────
// Plain Text Fallback
// ─────────────────────────────────────────────────────────────────────────────

/// Flatten a rendered document into readable plain text.
pub fn plain_text(document: &RenderedDocument) -> String {
    let mut lines = Vec::with_capacity(document.blocks.len());
    for block in &document.blocks {
        let line = match block {
            PreviewBlock::Heading { spans, .. } | PreviewBlock::Paragraph(spans) => {
                spans_text(spans)
            }
            PreviewBlock::CodeBlock { code, .. } => code.trim_end_matches('\n').to_string(),
            PreviewBlock::ListItem {
                depth,
                marker,
                spans,
            } => {
                let marker = match marker {
                    ListMarker::Bullet => "-".to_string(),
                    ListMarker::Ordered(n) => format!("{}.", n),
                    ListMarker::Task { checked: true } => "[x]".to_string(),
                    ListMarker::Task { checked: false } => "[ ]".to_string(),
                };
                format!("{}{} {}", "  ".repeat(*depth), marker, spans_text(spans))
            }
            PreviewBlock::Quote { spans, .. } => format!("> {}", spans_text(spans)),
            PreviewBlock::Table { header, rows } => {
                let row_text = |cells: &[Vec<crate::preview::InlineSpan>]| {
                    cells
                        .iter()
                        .map(|cell| spans_text(cell))
                        .collect::<Vec<_>>()
                        .join("\t")
                };
                std::iter::once(row_text(header))
                    .chain(rows.iter().map(|row| row_text(row)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            PreviewBlock::Rule => "---".to_string(),
        };
        lines.push(line);
    }
    lines.join("\n\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy `document` to the clipboard as HTML with a plain-text fallback.
pub fn copy_document_html(document: &RenderedDocument) -> Result<()> {
    if document.html.is_empty() {
        return Err(Error::Clipboard("nothing to copy".to_string()));
    }
    let fallback = plain_text(document);
    let mut clipboard = Clipboard::new()?;
    clipboard.set_html(document.html.as_str(), Some(fallback.as_str()))?;
    info!("Copied {} bytes of HTML to clipboard", document.html.len());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
