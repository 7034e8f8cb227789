use trowel_engine::{InputFrame, TilePos};

#[derive(Debug, Clone, Copy, Default)]
struct Button {
    held: bool,
    pulse: bool,
}

impl Button {
    fn is_down(self) -> bool {
        self.held || self.pulse
    }
}

/// Which pointer button an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Primary,
    Secondary,
}

/// Terminal input accumulated between two ticks.
///
/// Mouse buttons are held until released. Keys have no release event in a
/// plain terminal, so they register as one-tick pulses.
#[derive(Debug, Default)]
pub struct Controls {
    pointer: Option<TilePos>,
    cursor: Option<TilePos>,
    primary: Button,
    secondary: Button,
    horizontal: f32,
    vertical: f32,
    select: bool,
    cancel: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points at a tile with the mouse, or at nothing.
    pub fn hover(&mut self, pos: Option<TilePos>) {
        self.pointer = pos;
        if pos.is_some() {
            self.cursor = pos;
        }
    }

    /// Moves the keyboard cursor inside a `width` x `height` plot.
    ///
    /// The first move puts the cursor in the middle of the plot.
    pub fn move_cursor(&mut self, dx: isize, dy: isize, width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        let pos = match self.cursor {
            None => TilePos::new(width / 2, height / 2),
            Some(pos) => TilePos::new(
                pos.x.saturating_add_signed(dx).min(width - 1),
                pos.y.saturating_add_signed(dy).min(height - 1),
            ),
        };
        self.cursor = Some(pos);
        self.pointer = Some(pos);
    }

    pub fn press(&mut self, click: Click) {
        self.button(click).held = true;
    }

    pub fn release(&mut self, click: Click) {
        self.button(click).held = false;
    }

    /// Clicks for a single tick.
    pub fn tap(&mut self, click: Click) {
        self.button(click).pulse = true;
    }

    pub fn push_horizontal(&mut self, value: f32) {
        self.horizontal = value;
    }

    pub fn push_vertical(&mut self, value: f32) {
        self.vertical = value;
    }

    pub fn select(&mut self) {
        self.select = true;
    }

    pub fn cancel(&mut self) {
        self.cancel = true;
    }

    /// Forgets everything, e.g. when returning to the title.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Samples the current frame and clears one-tick inputs.
    pub fn take_frame(&mut self) -> InputFrame {
        let frame = InputFrame {
            pointer: self.pointer,
            primary: self.primary.is_down(),
            secondary: self.secondary.is_down(),
            horizontal: self.horizontal,
            vertical: self.vertical,
            select: self.select,
            cancel: self.cancel,
        };
        self.primary.pulse = false;
        self.secondary.pulse = false;
        self.horizontal = 0.0;
        self.vertical = 0.0;
        self.select = false;
        self.cancel = false;
        frame
    }

    fn button(&mut self, click: Click) -> &mut Button {
        match click {
            Click::Primary => &mut self.primary,
            Click::Secondary => &mut self.secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulses_last_one_frame() {
        let mut controls = Controls::new();
        controls.tap(Click::Primary);
        controls.push_horizontal(1.0);
        controls.select();

        let frame = controls.take_frame();
        assert!(frame.primary);
        assert!((frame.horizontal - 1.0).abs() < f32::EPSILON);
        assert!(frame.select);

        let frame = controls.take_frame();
        assert!(!frame.primary);
        assert!(frame.horizontal.abs() < f32::EPSILON);
        assert!(!frame.select);
    }

    #[test]
    fn test_held_button_persists_until_released() {
        let mut controls = Controls::new();
        controls.press(Click::Secondary);
        assert!(controls.take_frame().secondary);
        assert!(controls.take_frame().secondary);
        controls.release(Click::Secondary);
        assert!(!controls.take_frame().secondary);
    }

    #[test]
    fn test_cursor_starts_centered_and_clamps() {
        let mut controls = Controls::new();
        controls.move_cursor(1, 0, 10, 10);
        assert_eq!(controls.take_frame().pointer, Some(TilePos::new(5, 5)));

        controls.move_cursor(-9, 9, 10, 10);
        assert_eq!(controls.take_frame().pointer, Some(TilePos::new(0, 9)));
    }

    #[test]
    fn test_mouse_hover_moves_cursor() {
        let mut controls = Controls::new();
        controls.hover(Some(TilePos::new(2, 3)));
        controls.move_cursor(1, 0, 10, 10);
        assert_eq!(controls.take_frame().pointer, Some(TilePos::new(3, 3)));

        controls.hover(None);
        assert_eq!(controls.take_frame().pointer, None);
    }
}
