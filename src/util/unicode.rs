use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of `s` in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` down to `max_cells`, ending with `…` when something was dropped.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    match max_cells {
        0 => String::new(),
        1 => "\u{2026}".to_string(),
        _ => {
            let mut used = 0;
            let mut out: String = s
                .graphemes(true)
                .take_while(|g| {
                    used += display_width(g);
                    used < max_cells
                })
                .collect();
            out.push('\u{2026}');
            out
        }
    }
}

/// Byte offset of the grapheme after the one at `offset`
pub fn next_boundary(s: &str, offset: usize) -> usize {
    s.get(offset..)
        .and_then(|rest| rest.graphemes(true).next())
        .map_or(s.len(), |g| offset + g.len())
}

/// Byte offset of the grapheme before `offset`
pub fn prev_boundary(s: &str, offset: usize) -> usize {
    s.get(..offset)
        .and_then(|head| head.grapheme_indices(true).next_back())
        .map_or(0, |(i, _)| i)
}

/// Cells occupied by `s[..offset]`, for placing the edit cursor
pub fn cursor_col(s: &str, offset: usize) -> usize {
    s.get(..offset.min(s.len())).map_or(0, display_width)
}
