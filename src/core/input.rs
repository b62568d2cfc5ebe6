//! Quit-key handling

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::core::events::{KeyBinding, KeyBindings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Running,
    Terminated,
}

/// Two-state machine: `Running` until a quit binding is pressed, then
/// `Terminated` for good. Every other key is ignored.
#[derive(Debug, Clone)]
pub struct InputHandler {
    state: RunState,
    quit: [KeyBinding; 2],
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            state: RunState::Running,
            quit: [KeyBindings::quit(), KeyBindings::interrupt()],
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> RunState {
        // Windows terminals also report releases and repeats
        if key.kind != KeyEventKind::Press {
            return self.state;
        }

        if self.state == RunState::Running && self.quit.iter().any(|b| b.matches(key)) {
            tracing::info!(key = ?key.code, "quit requested");
            self.state = RunState::Terminated;
        }
        self.state
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
