/// Key codes the engine understands while hints are on screen.
///
/// Hosts map their platform key events to these codes before calling
/// [`Engine::on_keystroke`](crate::Engine::on_keystroke).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key. Hint keys are matched case-sensitively, so hosts
    /// should pass the character exactly as typed.
    Char(char),
    /// The Escape key, cancels the displayed hints and any continuous loop.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key, removes the last character of the partial hint input.
    Backspace,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// A key pressed with CTRL, ALT or META never selects a hint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press event with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::empty(),
        }
    }

    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// Returns the character this event types into the hint prompt, if any.
    ///
    /// SHIFT is allowed since it only changes the case of the character.
    pub fn typed_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if (self.mods - Modifiers::SHIFT).is_empty() => Some(c),
            _ => None,
        }
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}
