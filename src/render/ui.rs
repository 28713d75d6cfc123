//! Terminal rendering components.
//!
//! This module hosts the concrete terminal UI implementation along with the supporting view/state
//! structures and styling utilities.

pub mod renderer;
pub mod screens;
pub mod state;
pub mod terminal;
pub mod theme;

pub use renderer::UIRenderer;
pub use screens::{dialog_content, screen_content, ScreenContent};
pub use state::{format_usage_time, Dialog, Screen, StatusLine, ViewState};
pub use terminal::TerminalUI;
pub use theme::ColorTheme;

#[cfg(test)]
pub use renderer::tests::MockUIRenderer;

pub use ratatui::style::{Color, Style};
