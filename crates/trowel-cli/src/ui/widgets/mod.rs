use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    garden_display::*, glyph::*, hud_display::*, key_binding_display::*, panel_display::*,
};

mod garden_display;
mod glyph;
mod hud_display;
mod key_binding_display;
mod panel_display;

mod color {
    use ratatui::style::Color;

    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);

    pub const DIRT: Color = Color::Rgb(101, 67, 33);
    pub const GRASS: Color = Color::Rgb(46, 139, 87);
    pub const PAVEMENT: Color = Color::Rgb(150, 150, 150);
    pub const GRAVEL: Color = Color::Rgb(190, 180, 160);
    pub const MOSS: Color = Color::Rgb(85, 107, 47);

    pub const FLOWERS: Color = Color::Rgb(255, 105, 180);
    pub const HEDGES: Color = Color::Rgb(0, 80, 0);
    pub const SHRUBS: Color = Color::Rgb(154, 205, 50);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn fg_only(color: Color) -> Style {
        Style::new().fg(color).add_modifier(Modifier::BOLD)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIMMED: Style = fg_bg(color::GRAY, color::BLACK);
    pub const WARNING: Style = fg_bg(color::YELLOW, color::BLACK);
    pub const SUCCESS: Style = fg_bg(color::GREEN, color::BLACK);
    pub const FAILURE: Style = fg_bg(color::RED, color::BLACK);
    pub const ANGRY_BORDER: Style = fg_bg(color::RED, color::BLACK);

    pub const HELP_KEY: Style = fg_bg(color::CYAN, color::BLACK);

    pub const HOVERED: Style = Style::new().add_modifier(Modifier::REVERSED);
    pub const FLASH: Style = fg_bg(color::BLACK, color::WHITE);

    pub const DIRT: Style = fg_bg(color::BLACK, color::DIRT);
    pub const GRASS: Style = fg_bg(color::BLACK, color::GRASS);
    pub const PAVEMENT: Style = fg_bg(color::BLACK, color::PAVEMENT);
    pub const GRAVEL: Style = fg_bg(color::BLACK, color::GRAVEL);
    pub const MOSS: Style = fg_bg(color::BLACK, color::MOSS);

    pub const FLOWERS: Style = fg_only(color::FLOWERS);
    pub const HEDGES: Style = fg_only(color::HEDGES);
    pub const SHRUBS: Style = fg_only(color::SHRUBS);
}

/// Columns and rows taken by a block's borders and padding.
fn block_margins(block: Option<&BlockWidget>) -> (u16, u16) {
    let Some(block) = block else {
        return (0, 0);
    };
    let outer = Rect::new(0, 0, u16::MAX / 2, u16::MAX / 2);
    let inner = block.inner(outer);
    (outer.width - inner.width, outer.height - inner.height)
}
