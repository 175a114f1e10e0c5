/// What the player asks for on one frame.
///
/// The controller consumes intents, never raw key events, so a keyboard, a
/// gamepad and a replay script all drive the same movement code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    /// Jump was pressed on this frame (edge, not held).
    pub jump: bool,
}

impl Intent {
    pub const IDLE: Intent = Intent {
        left: false,
        right: false,
        jump: false,
    };

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::IDLE
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::IDLE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::IDLE
        }
    }

    /// -1, 0 or 1. Holding both directions cancels out.
    pub fn horizontal(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::IDLE {
            return f.write_str(".");
        }
        if self.left {
            f.write_str("L")?;
        }
        if self.right {
            f.write_str("R")?;
        }
        if self.jump {
            f.write_str("J")?;
        }
        Ok(())
    }
}
