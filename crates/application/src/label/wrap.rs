/// Maximum number of lines a wrapped field may occupy.
pub const MAX_LINES: usize = 2;

const ELLIPSIS: &str = "...";

/// Scalable font size in print dots, as passed to the `^A0` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    pub height: u32,
    pub width: u32,
}

impl Font {
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Characters that fit in `max_width` dots.
    ///
    /// Average glyph width is taken as half the nominal font width. Layout
    /// geometry depends on this exact estimate.
    pub fn chars_per_line(&self, max_width: u32) -> usize {
        let glyph = (self.width / 2).max(1);
        (max_width / glyph) as usize
    }
}

/// Wrap `text` into at most [`MAX_LINES`] lines that fit `max_width` dots.
///
/// Words are packed greedily. A word longer than a whole line is cut and
/// marked with `...`. Words that do not fit on the second line are dropped
/// without any marker. Empty text produces no lines.
pub fn wrap(text: &str, max_width: u32, font: Font) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let budget = font.chars_per_line(max_width);
    if text.chars().count() <= budget {
        return vec![text.to_string()];
    }

    let mut lines = Vec::with_capacity(MAX_LINES);
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word = fit_word(word, budget);

        if current.is_empty() {
            current = word;
            continue;
        }

        if current.chars().count() + 1 + word.chars().count() <= budget {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
            if lines.len() == MAX_LINES {
                return lines;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn fit_word(word: &str, budget: usize) -> String {
    if word.chars().count() <= budget {
        return word.to_string();
    }
    let keep = budget.saturating_sub(ELLIPSIS.len());
    let mut cut: String = word.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME_FONT: Font = Font::new(60, 45);

    #[test]
    fn test_chars_per_line_uses_half_width() {
        // 362 / (45 / 2) = 362 / 22
        assert_eq!(NAME_FONT.chars_per_line(362), 16);
        assert_eq!(Font::new(45, 35).chars_per_line(362), 21);
        assert_eq!(Font::new(40, 30).chars_per_line(362), 24);
    }

    #[test]
    fn test_short_text_is_single_line() {
        assert_eq!(wrap("Ana Lowe", 362, NAME_FONT), vec!["Ana Lowe"]);
    }

    #[test]
    fn test_text_exactly_at_budget_is_single_line() {
        let text = "abcdefgh ijklmno"; // 16 chars
        assert_eq!(wrap(text, 362, NAME_FONT), vec![text]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap("", 362, NAME_FONT).is_empty());
    }

    #[test]
    fn test_wraps_onto_second_line() {
        let lines = wrap("Maria del Pilar Rodriguez", 362, NAME_FONT);
        assert_eq!(lines, vec!["Maria del Pilar", "Rodriguez"]);
    }

    #[test]
    fn test_second_line_is_packed_greedily() {
        let lines = wrap("Gerente de Desarrollo y Operaciones", 362, Font::new(40, 30));
        assert_eq!(lines, vec!["Gerente de Desarrollo y", "Operaciones"]);

        let lines = wrap("aaaa bbbb cccc dddd eeee ffff", 100, Font::new(20, 20));
        // budget = 100 / 10 = 10
        assert_eq!(lines, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn test_overflow_beyond_two_lines_is_dropped() {
        let lines = wrap("one two three four five six seven", 60, Font::new(20, 20));
        // budget = 6
        assert_eq!(lines, vec!["one", "two"]);
        assert!(lines.len() <= MAX_LINES);
    }

    #[test]
    fn test_single_long_word_is_truncated_with_ellipsis() {
        let lines = wrap("Supercalifragilistic", 362, NAME_FONT);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "Supercalifrag...");
        assert_eq!(lines[0].chars().count(), (16 - 3) + 3);
        assert!(lines[0].ends_with("..."));
    }

    #[test]
    fn test_truncation_counts_code_points() {
        let lines = wrap("ÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅÅ", 362, NAME_FONT);
        assert_eq!(lines, vec!["ÅÅÅÅÅÅÅÅÅÅÅÅÅ..."]);
    }

    #[test]
    fn test_truncated_word_followed_by_more_words() {
        let lines = wrap("Extraordinarily long", 100, Font::new(20, 20));
        assert_eq!(lines, vec!["Extraor...", "long"]);
    }

    #[test]
    fn test_never_more_than_two_lines() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do";
        for width in [10, 50, 100, 200, 362] {
            assert!(wrap(text, width, Font::new(30, 30)).len() <= MAX_LINES);
        }
    }

    #[test]
    fn test_tiny_budget_does_not_panic() {
        let lines = wrap("abcdef ghijkl", 5, Font::new(10, 10));
        // budget = 1, every word collapses to the ellipsis marker
        assert_eq!(lines, vec!["...", "..."]);
    }

    #[test]
    fn test_degenerate_font_width() {
        let lines = wrap("ab", 1, Font::new(1, 1));
        assert_eq!(lines, vec!["..."]);
    }
}
