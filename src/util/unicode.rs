use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_cells` cells, ending in `…` when something was cut.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1; // room for '…'
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = display_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme after the one at `byte_offset`, or None at the end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let rest = s.get(byte_offset..)?;
    let g = rest.graphemes(true).next()?;
    Some(byte_offset + g.len())
}

/// Byte offset where the grapheme before `byte_offset` starts, or None at the start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let head = s.get(..byte_offset)?;
    head.grapheme_indices(true).next_back().map(|(i, _)| i)
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `byte_offset`, skipping whitespace first.
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let head = &s[..byte_offset.min(s.len())];
    let mut boundary = 0;
    let mut seen_word = false;
    for (i, g) in head.grapheme_indices(true).rev() {
        if is_space(g) {
            if seen_word {
                break;
            }
        } else {
            seen_word = true;
        }
        boundary = i;
    }
    boundary
}

/// Start of the next word right of `byte_offset`, or the end of `s`.
pub fn word_boundary_right(s: &str, byte_offset: usize) -> usize {
    let start = byte_offset.min(s.len());
    let mut in_gap = false;
    for (i, g) in s[start..].grapheme_indices(true) {
        if is_space(g) {
            in_gap = true;
        } else if in_gap {
            return start + i;
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_cells_not_bytes() {
        assert_eq!(display_width("milk"), 4);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_fits_or_ellipsizes() {
        assert_eq!(truncate_to_width("hello", 5), "hello");
        assert_eq!(truncate_to_width("hello world", 8), "hello w\u{2026}");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn truncate_respects_wide_chars() {
        // budget 4: "你好" fits, "世" does not
        assert_eq!(truncate_to_width("你好世界", 5), "你好\u{2026}");
        let cut = truncate_to_width("你好世界", 4);
        assert!(display_width(&cut) <= 4);
    }

    #[test]
    fn grapheme_steps_skip_combining_marks() {
        let s = "e\u{0301}x";
        assert_eq!(next_grapheme_boundary(s, 0), Some(3));
        assert_eq!(next_grapheme_boundary(s, 3), Some(4));
        assert_eq!(next_grapheme_boundary(s, 4), None);
        assert_eq!(prev_grapheme_boundary(s, 3), Some(0));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn word_boundaries() {
        let s = "buy  oat milk";
        assert_eq!(word_boundary_left(s, s.len()), 9);
        assert_eq!(word_boundary_left(s, 9), 5);
        assert_eq!(word_boundary_left(s, 5), 0);
        assert_eq!(word_boundary_left(s, 0), 0);
        assert_eq!(word_boundary_right(s, 0), 5);
        assert_eq!(word_boundary_right(s, 5), 9);
        assert_eq!(word_boundary_right(s, 9), s.len());
    }
}
