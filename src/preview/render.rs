//! Markdown rendering for the preview pane
//!
//! Raw document text goes in, two sanitized representations come out:
//! an HTML string (used by "copy as HTML") and a flat list of
//! [`PreviewBlock`]s that the preview pane draws with egui widgets.
//!
//! Sanitization happens on both paths. Raw HTML is never passed through,
//! and links with script-capable schemes are replaced by `#`.

use crate::error::{Error, Result};
use comrak::{
    format_html,
    nodes::{AstNode, ListType, NodeValue},
    parse_document, Arena, Options,
};
use log::{debug, warn};
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Rendered Document Model
// ─────────────────────────────────────────────────────────────────────────────

/// Inline formatting applied to a run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    /// Sanitized link target
    pub link: Option<String>,
}

/// A run of text sharing one [`SpanStyle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub style: SpanStyle,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::default(),
        }
    }
}

/// Marker drawn in front of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered(usize),
    Task { checked: bool },
}

/// One top-level visual block of the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBlock {
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Paragraph(Vec<InlineSpan>),
    CodeBlock {
        language: String,
        code: String,
    },
    ListItem {
        /// Nesting depth, 0 for a top-level list
        depth: usize,
        marker: ListMarker,
        spans: Vec<InlineSpan>,
    },
    Quote {
        depth: usize,
        spans: Vec<InlineSpan>,
    },
    Table {
        header: Vec<Vec<InlineSpan>>,
        rows: Vec<Vec<Vec<InlineSpan>>>,
    },
    Rule,
}

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html: String,
    pub blocks: Vec<PreviewBlock>,
}

/// Text shown in place of a document that could not be rendered.
pub const PLACEHOLDER_TEXT: &str = "Preview unavailable";

impl RenderedDocument {
    /// Fixed markup shown when rendering fails.
    pub fn placeholder() -> Self {
        let mut span = InlineSpan::plain(PLACEHOLDER_TEXT);
        span.style.emphasis = true;
        Self {
            html: format!("<p><em>{}</em></p>\n", PLACEHOLDER_TEXT),
            blocks: vec![PreviewBlock::Paragraph(vec![span])],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Converts document text into displayable markup.
pub trait MarkdownRenderer {
    fn render(&self, source: &str) -> Result<RenderedDocument>;
}

/// Render `source`, substituting the placeholder document on failure.
pub fn render_or_placeholder(renderer: &dyn MarkdownRenderer, source: &str) -> RenderedDocument {
    match renderer.render(source) {
        Ok(document) => document,
        Err(e) => {
            warn!("{}; showing placeholder", e);
            RenderedDocument::placeholder()
        }
    }
}

/// GitHub-flavored markdown renderer backed by comrak.
pub struct ComrakRenderer {
    options: Options,
}

impl Default for ComrakRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ComrakRenderer {
    pub fn new() -> Self {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;

        // Raw HTML is replaced by a comment, dangerous URLs are dropped
        options.render.unsafe_ = false;

        Self { options }
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, source: &str) -> Result<RenderedDocument> {
        let arena = Arena::new();
        let root = parse_document(&arena, source, &self.options);

        let mut buffer = Vec::new();
        format_html(root, &self.options, &mut buffer)
            .map_err(|e| Error::Render(e.to_string()))?;
        let html = String::from_utf8(buffer).map_err(|e| Error::Render(e.to_string()))?;

        let mut blocks = Vec::new();
        collect_blocks(root, &BlockContext::default(), &mut blocks);

        debug!("Rendered {} preview blocks", blocks.len());
        Ok(RenderedDocument { html, blocks })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Link Sanitizing
// ─────────────────────────────────────────────────────────────────────────────

static UNSAFE_SCHEME: OnceLock<Option<Regex>> = OnceLock::new();

/// Replace URLs that could execute script with `#`.
pub fn sanitize_url(url: &str) -> String {
    let pattern = UNSAFE_SCHEME
        .get_or_init(|| Regex::new(r"(?i)^\s*(javascript|vbscript|file|data):").ok());

    match pattern {
        Some(re) if !re.is_match(url) => url.to_string(),
        _ => "#".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Collection
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct BlockContext {
    list_depth: usize,
    quote_depth: usize,
}

fn collect_blocks<'a>(node: &'a AstNode<'a>, ctx: &BlockContext, out: &mut Vec<PreviewBlock>) {
    let ast = node.data.borrow();
    match &ast.value {
        NodeValue::Heading(heading) => out.push(PreviewBlock::Heading {
            level: heading.level,
            spans: inline_spans(node),
        }),
        NodeValue::Paragraph => {
            let spans = inline_spans(node);
            if ctx.quote_depth > 0 {
                out.push(PreviewBlock::Quote {
                    depth: ctx.quote_depth,
                    spans,
                });
            } else if !spans.is_empty() {
                out.push(PreviewBlock::Paragraph(spans));
            }
        }
        NodeValue::CodeBlock(code) => out.push(PreviewBlock::CodeBlock {
            language: code.info.split_whitespace().next().unwrap_or("").to_string(),
            code: code.literal.trim_end_matches('\n').to_string(),
        }),
        NodeValue::ThematicBreak => out.push(PreviewBlock::Rule),
        NodeValue::BlockQuote => {
            let inner = BlockContext {
                quote_depth: ctx.quote_depth + 1,
                ..*ctx
            };
            for child in node.children() {
                collect_blocks(child, &inner, out);
            }
        }
        NodeValue::List(list) => {
            let ordered = list.list_type == ListType::Ordered;
            for (index, item) in node.children().enumerate() {
                let marker = if ordered {
                    ListMarker::Ordered(list.start + index)
                } else {
                    ListMarker::Bullet
                };
                collect_list_item(item, marker, ctx, out);
            }
        }
        NodeValue::Table(_) => out.push(collect_table(node)),
        NodeValue::HtmlBlock(_) => debug!("Dropped raw HTML block from preview"),
        _ => {
            for child in node.children() {
                collect_blocks(child, ctx, out);
            }
        }
    }
}

fn collect_list_item<'a>(
    item: &'a AstNode<'a>,
    marker: ListMarker,
    ctx: &BlockContext,
    out: &mut Vec<PreviewBlock>,
) {
    let marker = match &item.data.borrow().value {
        NodeValue::TaskItem(symbol) => ListMarker::Task {
            checked: matches!(symbol, Some('x' | 'X')),
        },
        _ => marker,
    };

    let nested = BlockContext {
        list_depth: ctx.list_depth + 1,
        ..*ctx
    };

    let start = out.len();
    let mut emitted = false;
    for child in item.children() {
        let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
        if is_paragraph && !emitted {
            out.push(PreviewBlock::ListItem {
                depth: ctx.list_depth,
                marker,
                spans: inline_spans(child),
            });
            emitted = true;
        } else {
            collect_blocks(child, &nested, out);
        }
    }

    if !emitted {
        // Empty item, or one that starts with a nested block
        out.insert(
            start,
            PreviewBlock::ListItem {
                depth: ctx.list_depth,
                marker,
                spans: Vec::new(),
            },
        );
    }
}

fn collect_table<'a>(table: &'a AstNode<'a>) -> PreviewBlock {
    let mut header = Vec::new();
    let mut rows = Vec::new();

    for row in table.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cells: Vec<Vec<InlineSpan>> = row.children().map(inline_spans).collect();
        if is_header {
            header = cells;
        } else {
            rows.push(cells);
        }
    }

    PreviewBlock::Table { header, rows }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Collection
// ─────────────────────────────────────────────────────────────────────────────

fn inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline(child, &SpanStyle::default(), &mut spans);
    }
    spans
}

fn collect_inline<'a>(node: &'a AstNode<'a>, style: &SpanStyle, out: &mut Vec<InlineSpan>) {
    let ast = node.data.borrow();
    let mut nested = style.clone();

    match &ast.value {
        NodeValue::Text(text) => push_text(out, text, style),
        NodeValue::Code(code) => {
            nested.code = true;
            push_text(out, &code.literal, &nested);
            return;
        }
        NodeValue::SoftBreak => push_text(out, " ", style),
        NodeValue::LineBreak => push_text(out, "\n", style),
        NodeValue::HtmlInline(_) => return,
        NodeValue::Emph => nested.emphasis = true,
        NodeValue::Strong => nested.strong = true,
        NodeValue::Strikethrough => nested.strikethrough = true,
        NodeValue::Link(link) | NodeValue::Image(link) => {
            nested.link = Some(sanitize_url(&link.url));
        }
        _ => {}
    }

    for child in node.children() {
        collect_inline(child, &nested, out);
    }
}

fn push_text(out: &mut Vec<InlineSpan>, text: &str, style: &SpanStyle) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(last) if last.style == *style => last.text.push_str(text),
        _ => out.push(InlineSpan {
            text: text.to_string(),
            style: style.clone(),
        }),
    }
}

/// Concatenated text of a span list.
pub fn spans_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
