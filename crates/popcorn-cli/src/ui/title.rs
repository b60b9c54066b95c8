use crossterm::{execute, terminal::SetTitle};
use popcorn_core::WindowTitle;
use std::io;

/// Sets the hosting terminal emulator's window title
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalTitle;

impl WindowTitle for TerminalTitle {
    fn set_window_title(&self, title: &str) {
        if let Err(e) = execute!(io::stdout(), SetTitle(title)) {
            tracing::debug!(error = %e, title, "Failed to set terminal title");
        }
    }
}
