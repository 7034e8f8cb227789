use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::style;

/// Bordered popup centered in the area it is rendered into.
///
/// While its show/hide animation plays the panel is drawn dimmed.
#[derive(Debug)]
pub struct PanelDisplay<'a> {
    title: &'a str,
    text: Text<'a>,
    style: Style,
    fading: bool,
}

impl<'a> PanelDisplay<'a> {
    pub fn new<T>(title: &'a str, text: T) -> Self
    where
        T: Into<Text<'a>>,
    {
        Self {
            title,
            text: text.into(),
            style: style::DEFAULT,
            fading: false,
        }
    }

    pub fn style(self, style: Style) -> Self {
        Self { style, ..self }
    }

    pub fn fading(self, fading: bool) -> Self {
        Self { fading, ..self }
    }

    pub fn width(&self) -> u16 {
        let title = u16::try_from(self.title.len()).unwrap_or(u16::MAX);
        let text = u16::try_from(self.text.width()).unwrap_or(u16::MAX);
        title.max(text).saturating_add(4)
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    }
}

impl Widget for PanelDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.fading {
            self.style.add_modifier(Modifier::DIM)
        } else {
            self.style
        };
        let area = area.centered(
            Constraint::Length(self.width()),
            Constraint::Length(self.height()),
        );
        let block = Block::bordered()
            .title(Line::from(self.title).centered())
            .padding(Padding::horizontal(1))
            .style(style);
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        self.text.style(style).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_fits_text_and_border() {
        let text = Text::from(vec![Line::from("a long line of text"), Line::from("short")]);
        let panel = PanelDisplay::new("FINISH", text);
        assert_eq!(panel.width(), 19 + 4);
        assert_eq!(panel.height(), 2 + 2);
    }

    #[test]
    fn test_render_is_centered() {
        let area = Rect::new(0, 0, 21, 7);
        let mut buf = Buffer::empty(area);
        PanelDisplay::new("T", "hello").render(area, &mut buf);
        assert_eq!(buf[(6, 2)].symbol(), "┌");
        assert_eq!(buf[(8, 3)].symbol(), "h");
    }
}
