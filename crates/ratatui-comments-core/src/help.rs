use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::keymap::Binding;
use crate::render;

#[derive(Clone, Debug)]
pub struct HelpLineOptions {
    pub style: Style,
    pub key_style: Style,
    pub separator: String,
}

impl Default for HelpLineOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            key_style: Style::default(),
            separator: " • ".to_string(),
        }
    }
}

/// A single row of `key description` hints.
///
/// Hints are laid out in order and the ones that no longer fit are left out whole, so a narrow
/// terminal shows fewer hints rather than a hint cut in half.
#[derive(Clone, Debug, Default)]
pub struct HelpLine {
    bindings: Vec<Binding>,
    options: HelpLineOptions,
}

impl HelpLine {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self::with_options(bindings, HelpLineOptions::default())
    }

    pub fn with_options(bindings: Vec<Binding>, options: HelpLineOptions) -> Self {
        Self { bindings, options }
    }

    pub fn set_bindings(&mut self, bindings: Vec<Binding>) {
        self.bindings = bindings;
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, self.options.style);
        let spans = self.spans_within(area.width as usize);
        render::render_spans_clipped(
            area.x,
            area.y,
            area.width,
            buf,
            &spans,
            self.options.style,
        );
    }

    /// Every hint, ignoring width.
    pub fn spans(&self) -> Vec<Span<'static>> {
        self.spans_within(usize::MAX)
    }

    /// The leading hints that fit in `max_cols` columns.
    pub fn spans_within(&self, max_cols: usize) -> Vec<Span<'static>> {
        let sep_cols = UnicodeWidthStr::width(self.options.separator.as_str());
        let mut used = 0usize;
        let mut out: Vec<Span<'static>> = Vec::new();
        for binding in &self.bindings {
            let desc = format!(" {}", binding.help_desc);
            let cols = UnicodeWidthStr::width(binding.help_key.as_str())
                + UnicodeWidthStr::width(desc.as_str());
            let lead = if out.is_empty() { 0 } else { sep_cols };
            if used.saturating_add(lead + cols) > max_cols {
                break;
            }
            if lead > 0 {
                out.push(Span::styled(self.options.separator.clone(), self.options.style));
            }
            out.push(Span::styled(binding.help_key.clone(), self.options.key_style));
            out.push(Span::styled(desc, self.options.style));
            used += lead + cols;
        }
        out
    }
}
