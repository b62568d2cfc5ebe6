//! UI module - Rendering for the TUI

pub mod renderer;
pub mod theme;
pub mod widgets;
