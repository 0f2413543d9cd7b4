use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

use crate::scroll::ScrollState;

const TAB_COLS: usize = 4;

/// Writes `spans` starting at `(x, y)`, stopping before `max_cols` display columns.
///
/// Tabs expand to four spaces. A wide character that would straddle the right edge is dropped
/// rather than split. Spans with a default style fall back to `fallback_style`. Returns the number
/// of columns written.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'_>],
    fallback_style: Style,
) -> u16 {
    let mut cursor = CellWriter {
        x,
        y,
        written: 0,
        max_cols: max_cols as usize,
    };
    for span in spans {
        let style = if span.style == Style::default() {
            fallback_style
        } else {
            span.style
        };
        if !cursor.write_str(buf, span.content.as_ref(), style) {
            break;
        }
    }
    cursor.written as u16
}

struct CellWriter {
    x: u16,
    y: u16,
    written: usize,
    max_cols: usize,
}

impl CellWriter {
    /// Returns `false` once the row is full.
    fn write_str(&mut self, buf: &mut Buffer, s: &str, style: Style) -> bool {
        let mut tmp = [0u8; 4];
        for ch in s.chars() {
            if ch == '\t' {
                for _ in 0..TAB_COLS {
                    if !self.put(buf, " ", 1, style) {
                        return false;
                    }
                }
                continue;
            }
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if !self.put(buf, ch.encode_utf8(&mut tmp), w, style) {
                return false;
            }
        }
        true
    }

    fn put(&mut self, buf: &mut Buffer, symbol: &str, width: usize, style: Style) -> bool {
        if self.written + width > self.max_cols {
            return false;
        }
        let col = self.x + self.written as u16;
        if let Some(cell) = buf.cell_mut((col, self.y)) {
            cell.set_style(style);
            cell.set_symbol(symbol);
        }
        // The trailing half of a wide glyph is an empty cell.
        for extra in 1..width {
            if let Some(cell) = buf.cell_mut((col + extra as u16, self.y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        self.written += width;
        true
    }
}

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ScrollState, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    let (thumb_top, thumb_h) = match state.thumb(area.height) {
        Some(thumb) => thumb,
        None => (0, 0),
    };
    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// The part of `input` between display columns `start_col` and `start_col + max_cols`.
///
/// A wide character cut by either edge is left out.
pub fn slice_by_cols(input: &str, start_col: usize, max_cols: usize) -> String {
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut out = String::new();
    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }
        out.push(ch);
        col += w;
        out_cols += w;
    }
    out
}

/// Display-width prefix of `input` that fits in `max_cols`.
pub fn truncate_to_cols(input: &str, max_cols: usize) -> &str {
    let mut cols = 0usize;
    for (i, ch) in input.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > max_cols {
            return &input[..i];
        }
        cols += w;
    }
    input
}

pub fn buffer_row_text(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    (area.x..area.x + area.width)
        .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_spans_stop_at_width() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let spans = vec![Span::raw("abc"), Span::raw("defgh")];
        let written = render_spans_clipped(0, 0, 4, &mut buf, &spans, Style::default());
        assert_eq!(written, 4);
        assert_eq!(buffer_row_text(&buf, 0), "abcd  ");
    }

    #[test]
    fn clipped_spans_expand_tabs() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        render_spans_clipped(0, 0, 6, &mut buf, &[Span::raw("\t1")], Style::default());
        assert!(buffer_row_text(&buf, 0).starts_with("    1"));
    }

    #[test]
    fn wide_char_is_not_split_at_edge() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        let written = render_spans_clipped(0, 0, 3, &mut buf, &[Span::raw("你好")], Style::default());
        assert_eq!(written, 2);
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_cols("abcdef", 3), "abc");
        assert_eq!(truncate_to_cols("你好", 3), "你");
        assert_eq!(truncate_to_cols("ab", 10), "ab");
    }

    #[test]
    fn slice_by_cols_skips_partial_wide_chars() {
        assert_eq!(slice_by_cols("abcdef", 2, 3), "cde");
        assert_eq!(slice_by_cols("你好", 1, 2), "好");
        assert_eq!(slice_by_cols("你好", 0, 3), "你");
    }

    #[test]
    fn render_scrollbar_does_not_panic() {
        let mut state = ScrollState::default();
        state.set_viewport(5);
        state.set_content(50);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 5));
        render_scrollbar(Rect::new(0, 0, 1, 5), &mut buf, &state, Style::default());
        assert_eq!(buffer_row_text(&buf, 0), "█");
    }
}
