//! Document statistics for the status bar

use super::count_lines;

// ─────────────────────────────────────────────────────────────────────────────
// Word Count
// ─────────────────────────────────────────────────────────────────────────────

/// Number of whitespace-separated words in `text`.
///
/// Markdown punctuation is not special: `# Title` is two words. Empty and
/// whitespace-only text has zero words.
pub fn word_count(text: &str) -> usize {
    text.trim().split_whitespace().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Counts shown in the status bar.
///
/// # Example
///
/// ```ignore
/// let stats = TextStats::from_text("# Title\n\nHello world");
/// assert_eq!(stats.words, 4);
/// assert_eq!(stats.lines, 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Whitespace-separated words
    pub words: usize,
    /// Characters including whitespace
    pub characters: usize,
    /// Lines, at least 1
    pub lines: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            words: word_count(text),
            characters: text.chars().count(),
            lines: count_lines(text),
        }
    }

    /// Status bar label, pluralized: "1 word" / "12 words".
    pub fn words_label(&self) -> String {
        match self.words {
            1 => "1 word".to_string(),
            n => format!("{} words", n),
        }
    }

    /// Returns a compact string like "150 words | 892 chars | 25 lines"
    pub fn format_compact(&self) -> String {
        format!(
            "{} | {} chars | {} lines",
            self.words_label(),
            self.characters,
            self.lines
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
