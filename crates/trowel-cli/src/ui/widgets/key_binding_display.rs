use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::widgets::style;

/// Keys and what they do, e.g. `(&["Enter"], "Start")`.
pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

/// One-line help bar.
///
/// Bindings that do not fit the width are dropped from the end.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self { bindings }
    }

    fn line(&self, max_width: usize) -> Line<'a> {
        let mut line = Line::default();
        for &(keys, action) in self.bindings {
            let mut entry = vec![];
            if !line.spans.is_empty() {
                entry.push(Span::styled("  ", style::DIMMED));
            }
            let keys = keys.join("/");
            entry.push(Span::styled(keys, style::HELP_KEY));
            entry.push(Span::styled(format!(" {action}"), style::DIMMED));

            let width: usize = entry.iter().map(Span::width).sum();
            if line.width() + width > max_width {
                break;
            }
            line.spans.extend(entry);
        }
        line.centered()
    }
}

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line(usize::from(area.width)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINDINGS: &[KeyBinding] = &[(&["y"], "Delete"), (&["n", "Esc"], "Keep")];

    #[test]
    fn test_keys_are_joined() {
        let line = KeyBindingDisplay::new(BINDINGS).line(80);
        assert_eq!(line.to_string(), "y Delete  n/Esc Keep");
    }

    #[test]
    fn test_overflowing_bindings_are_dropped() {
        let line = KeyBindingDisplay::new(BINDINGS).line(12);
        assert_eq!(line.to_string(), "y Delete");
        assert_eq!(KeyBindingDisplay::new(BINDINGS).line(3).width(), 0);
    }
}
