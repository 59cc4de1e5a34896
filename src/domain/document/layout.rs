//! Page layout for text documents measured in millimetres.

use serde::{Deserialize, Serialize};

/// Average glyph advance per point of font size, in millimetres.
const MM_PER_POINT_GLYPH: f64 = 0.18;

/// Page geometry. Defaults mirror an A4 portrait page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub margin: f64,
    pub column_width: f64,
    pub page_limit: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            margin: 20.0,
            column_width: 170.0,
            page_limit: 275.0,
        }
    }
}

impl PageLayout {
    /// Characters that fit on one line at the given font size.
    pub fn chars_per_line(&self, font_size: f64) -> usize {
        let width = (self.column_width / (font_size * MM_PER_POINT_GLYPH)).floor();
        (width as usize).max(1)
    }

    /// Vertical space a block would need when checking for overflow.
    pub fn required_height(lines: usize, font_size: f64) -> f64 {
        lines as f64 * font_size * 0.5
    }

    /// Vertical advance after placing a block.
    pub fn advance(lines: usize, font_size: f64) -> f64 {
        lines as f64 * font_size * 0.45 + 4.0
    }
}

/// Greedy word wrap. Words longer than `width` are split.
///
/// Leading indentation on the first line is preserved; an empty input
/// yields one empty line so the block still occupies space.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut current: String = text
        .chars()
        .take_while(|c| *c == ' ')
        .take(width - 1)
        .collect();
    let mut has_words = false;
    let mut lines = Vec::new();

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while !chars.is_empty() {
            let used = current.chars().count();
            let needed = used + usize::from(has_words) + chars.len();
            if needed <= width {
                if has_words {
                    current.push(' ');
                }
                current.extend(chars.drain(..));
                has_words = true;
            } else if has_words {
                lines.push(std::mem::take(&mut current));
                has_words = false;
            } else {
                let room = width - used;
                current.extend(chars.drain(..room));
                lines.push(std::mem::take(&mut current));
            }
        }
    }

    if has_words || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn larger_fonts_fit_fewer_characters() {
        let layout = PageLayout::default();
        assert!(layout.chars_per_line(18.0) < layout.chars_per_line(11.0));
        assert!(layout.chars_per_line(9.0) > layout.chars_per_line(11.0));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn splits_overlong_words() {
        let lines = wrap("abcdefghijkl", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn keeps_leading_indent() {
        let lines = wrap("  Target: 50% faster", 80);
        assert_eq!(lines, vec!["  Target: 50% faster"]);
    }

    #[test]
    fn empty_text_is_one_blank_line() {
        assert_eq!(wrap("", 20), vec![String::new()]);
    }

    #[test]
    fn overflow_and_advance_formulas() {
        assert_eq!(PageLayout::required_height(2, 11.0), 11.0);
        assert!((PageLayout::advance(2, 10.0) - 13.0).abs() < f64::EPSILON);
    }
}
