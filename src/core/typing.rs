//! # Typing Indicator
//!
//! The decorative dot animation shown in the placeholder bubble while the
//! backend works. Frames cycle 1..=7 dots then wrap. The indicator must stop
//! exactly once: at the first content delta of the run (so the placeholder
//! is cleared immediately before real text), or failing that at run
//! termination or transport failure. Stopping twice is a no-op.
//!
//! This type is pure; the TUI loop schedules ticks from elapsed wall time.

use std::time::Duration;

pub const MAX_DOTS: u8 = 7;

/// Default period between frames. Overridable via config.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(350);

#[derive(Debug)]
pub struct TypingIndicator {
    dots: u8,
    running: bool,
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::idle()
    }
}

impl TypingIndicator {
    pub fn idle() -> Self {
        Self {
            dots: 1,
            running: false,
        }
    }

    /// Begin animating for a new run. The placeholder already shows one dot.
    pub fn start(&mut self) {
        self.dots = 1;
        self.running = true;
    }

    /// Advance one frame and return it, or `None` when stopped.
    pub fn tick(&mut self) -> Option<String> {
        if !self.running {
            return None;
        }
        self.dots = if self.dots >= MAX_DOTS { 1 } else { self.dots + 1 };
        Some(self.frame())
    }

    pub fn frame(&self) -> String {
        "●".repeat(self.dots as usize)
    }

    /// Idempotent stop. Returns true only on the first call that actually
    /// stopped the animation — the caller clears the placeholder then.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
