/// The eight Game Boy inputs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// Line in the lower nibble of P1 and whether it belongs to the
    /// action group (selected by bit 5) rather than the d-pad (bit 4).
    fn line(self) -> (bool, u8) {
        match self {
            Button::Right => (false, 0x01),
            Button::Left => (false, 0x02),
            Button::Up => (false, 0x04),
            Button::Down => (false, 0x08),
            Button::A => (true, 0x01),
            Button::B => (true, 0x02),
            Button::Select => (true, 0x04),
            Button::Start => (true, 0x08),
        }
    }
}

/// P1 (0xFF00). Pressed lines read as 0 while their group is selected.
#[derive(Clone, Debug)]
pub(crate) struct Joypad {
    select: u8,
    buttons: u8,
    dpad: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            buttons: 0,
            dpad: 0,
        }
    }
}

impl Joypad {
    pub(crate) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.dpad;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    /// Record a button change. Returns true on a fresh press, which is
    /// what requests the joypad interrupt.
    pub(crate) fn set(&mut self, button: Button, pressed: bool) -> bool {
        let (action, mask) = button.line();
        let lines = if action {
            &mut self.buttons
        } else {
            &mut self.dpad
        };
        let was_pressed = *lines & mask != 0;
        if pressed {
            *lines |= mask;
        } else {
            *lines &= !mask;
        }
        pressed && !was_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_groups_read_released() {
        let mut joypad = Joypad::default();
        joypad.set(Button::A, true);
        assert_eq!(joypad.read(), 0xFF);
    }

    #[test]
    fn selected_group_reports_pressed_lines_low() {
        let mut joypad = Joypad::default();
        joypad.set(Button::Start, true);
        joypad.set(Button::Left, true);

        joypad.write(0x10);
        assert_eq!(joypad.read(), 0xD7);

        joypad.write(0x20);
        assert_eq!(joypad.read(), 0xED);
    }

    #[test]
    fn only_fresh_presses_are_edges() {
        let mut joypad = Joypad::default();
        assert!(joypad.set(Button::B, true));
        assert!(!joypad.set(Button::B, true));
        assert!(!joypad.set(Button::B, false));
    }
}
