//! Export module for Markpane
//!
//! The only export target is the system clipboard: the rendered document is
//! copied as sanitized HTML with a plain-text fallback.

pub mod clipboard;

pub use clipboard::copy_document_html;
