use std::time::Duration;

pub const TYPEWRITER_TICK: Duration = Duration::from_millis(20);
pub const TYPEWRITER_STEP: usize = 3;

/// Gradual reveal of an AI reply, a few characters per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Typewriter {
    text: String,
    shown: usize,
    total: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let total = text.chars().count();
        Self {
            text,
            shown: 0,
            total,
        }
    }

    /// Already fully revealed, for user messages and history.
    pub fn finished(text: impl Into<String>) -> Self {
        let mut writer = Self::new(text);
        writer.shown = writer.total;
        writer
    }

    /// Reveal up to `step` more characters. Returns false once complete.
    pub fn advance(&mut self, step: usize) -> bool {
        if self.is_done() {
            return false;
        }
        self.shown = (self.shown + step).min(self.total);
        true
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.total
    }

    /// Revealed prefix, always cut on a char boundary.
    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }
}
