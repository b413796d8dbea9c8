//! Measurement helpers for page composition: line measuring, greedy word
//! wrap, and aspect-preserving image fitting. All units are points.

/// Average glyph width as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Approximate rendered width of a single line.
pub fn measure_line(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_FACTOR
}

/// Greedy word wrap against `max_width`. Words are never split; a word wider
/// than the line gets a line of its own.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measure_line(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Scales a `width x height` image to fit within the given bounds while
/// preserving its aspect ratio: scaled to the full available width first,
/// then capped by height.
pub fn fit_within(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let aspect = width / height;
    let mut w = max_width;
    let mut h = w / aspect;
    if h > max_height {
        h = max_height;
        w = h * aspect;
    }
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 12.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(measure_line(line, 12.0) <= 100.0, "line too wide: {line}");
        }
    }

    #[test]
    fn test_wrap_preserves_words_and_order() {
        let text = "one two three four five";
        let lines = wrap_text(text, 12.0, 60.0);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_short_text_is_single_line() {
        assert_eq!(wrap_text("hello", 12.0, 500.0), vec!["hello"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap_text("", 12.0, 100.0).is_empty());
        assert!(wrap_text("   ", 12.0, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_overlong_word_gets_own_line() {
        let lines = wrap_text("a extraordinarily-long-word b", 12.0, 40.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "extraordinarily-long-word");
    }

    #[test]
    fn test_fit_within_wide_image_capped_by_width() {
        let (w, h) = fit_within(2000.0, 1000.0, 500.0, 500.0);
        assert_eq!((w, h), (500.0, 250.0));
    }

    #[test]
    fn test_fit_within_tall_image_capped_by_height() {
        let (w, h) = fit_within(1000.0, 2000.0, 500.0, 500.0);
        assert_eq!((w, h), (250.0, 500.0));
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let (w, h) = fit_within(300.0, 200.0, 450.0, 10_000.0);
        assert!((w / h - 1.5).abs() < 1e-4);
        assert_eq!(w, 450.0);
    }

    #[test]
    fn test_fit_within_degenerate_dimensions() {
        assert_eq!(fit_within(0.0, 100.0, 500.0, 500.0), (0.0, 0.0));
        assert_eq!(fit_within(100.0, 0.0, 500.0, 500.0), (0.0, 0.0));
    }
}
