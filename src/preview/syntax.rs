//! Code block highlighting for the preview pane
//!
//! Wraps syntect's bundled syntaxes and themes. Loading the sets is slow, so a
//! single highlighter is created lazily and shared by every preview render.

use crate::config::Theme;
use eframe::egui::{text::LayoutJob, Color32, FontId, TextFormat};
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// syntect theme used while the application theme is dark
pub const DARK_CODE_THEME: &str = "base16-ocean.dark";

/// syntect theme used while the application theme is light
pub const LIGHT_CODE_THEME: &str = "InspiredGitHub";

// ─────────────────────────────────────────────────────────────────────────────
// Code Span
// ─────────────────────────────────────────────────────────────────────────────

/// A run of code text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSpan {
    pub text: String,
    pub color: Color32,
    pub bold: bool,
    pub italic: bool,
}

impl CodeSpan {
    fn plain(text: &str, color: Color32) -> Self {
        Self {
            text: text.to_string(),
            color,
            bold: false,
            italic: false,
        }
    }

    fn from_style(style: Style, text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: to_color32(style.foreground),
            bold: style.font_style.contains(FontStyle::BOLD),
            italic: style.font_style.contains(FontStyle::ITALIC),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Cached syntect syntax and theme sets.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn code_theme(&self, theme: Theme) -> Option<&SyntectTheme> {
        let name = if theme.is_dark() {
            DARK_CODE_THEME
        } else {
            LIGHT_CODE_THEME
        };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Background color of the code theme for `theme`, if it defines one.
    pub fn background(&self, theme: Theme) -> Option<Color32> {
        self.code_theme(theme)
            .and_then(|t| t.settings.background)
            .map(to_color32)
    }

    /// Highlight `code` as `language`, one `Vec<CodeSpan>` per line.
    ///
    /// Unknown languages and highlighting failures degrade to plain text in
    /// the theme's foreground color.
    pub fn highlight(&self, code: &str, language: &str, theme: Theme) -> Vec<Vec<CodeSpan>> {
        let fallback = if theme.is_dark() {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(40, 40, 40)
        };

        let (Some(syntax), Some(code_theme)) =
            (self.find_syntax(language), self.code_theme(theme))
        else {
            return code
                .lines()
                .map(|line| vec![CodeSpan::plain(line, fallback)])
                .collect();
        };

        let mut highlighter = HighlightLines::new(syntax, code_theme);
        LinesWithEndings::from(code)
            .map(|line| match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => ranges
                    .into_iter()
                    .map(|(style, text)| CodeSpan::from_style(style, text.trim_end_matches('\n')))
                    .filter(|span| !span.text.is_empty())
                    .collect(),
                Err(e) => {
                    warn!("Failed to highlight line: {}", e);
                    vec![CodeSpan::plain(line.trim_end_matches('\n'), fallback)]
                }
            })
            .collect()
    }

    /// Resolve a fence info string such as `rust` or `py` to a syntax.
    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let language = language.trim();
        if language.is_empty() {
            return None;
        }

        let lower = language.to_lowercase();
        let extension = match lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" => "js",
            "typescript" => "ts",
            "c++" | "cxx" => "cpp",
            "csharp" | "c#" => "cs",
            "golang" => "go",
            "ruby" => "rb",
            "shell" | "bash" | "zsh" => "sh",
            "yml" => "yaml",
            "markdown" => "md",
            other => other,
        };

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.to_lowercase() == lower)
            })
    }
}

fn to_color32(color: syntect::highlighting::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the shared highlighter.
pub fn highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

/// Lay out highlighted lines as a single egui text job.
pub fn layout_code(lines: &[Vec<CodeSpan>], font_size: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            job.append("\n", 0.0, TextFormat::default());
        }
        for span in line {
            let format = TextFormat {
                font_id: FontId::monospace(font_size),
                color: span.color,
                italics: span.italic,
                ..Default::default()
            };
            job.append(&span.text, 0.0, format);
        }
    }
    job
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(lines: &[Vec<CodeSpan>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.iter().map(|s| s.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_highlight_preserves_text() {
        let code = "fn main() {\n    println!(\"hi\");\n}";
        let lines = highlighter().highlight(code, "rust", Theme::Dark);
        assert_eq!(
            joined(&lines),
            vec!["fn main() {", "    println!(\"hi\");", "}"]
        );
    }

    #[test]
    fn test_highlight_rust_has_multiple_colors() {
        let lines = highlighter().highlight("let x = 42;", "rs", Theme::Light);
        let colors: std::collections::HashSet<_> =
            lines[0].iter().map(|s| s.color).collect();
        assert!(colors.len() > 1);
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let lines = highlighter().highlight("a\nb", "no-such-language", Theme::Dark);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 1);
        assert_eq!(lines[0][0].text, "a");
    }

    #[test]
    fn test_find_syntax_aliases() {
        let h = highlighter();
        assert!(h.find_syntax("python").is_some());
        assert!(h.find_syntax("JavaScript").is_some());
        assert!(h.find_syntax("").is_none());
    }

    #[test]
    fn test_layout_code_joins_lines() {
        let lines = highlighter().highlight("x\ny", "", Theme::Dark);
        let job = layout_code(&lines, 13.0);
        assert_eq!(job.text, "x\ny");
    }
}
