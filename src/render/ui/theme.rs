//! Color theme and styling definitions using ratatui colors
//!
//! This module provides color themes for terminal rendering using ratatui's
//! color system directly to avoid unnecessary abstractions.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for terminal UI elements
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Normal text color (None uses terminal default)
    pub normal_text: Option<Color>,

    /// Screen titles
    pub title: Style,

    /// Progress text of the running phase
    pub progress: Style,

    /// Key hints below the screen body
    pub hint: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,

    /// Error dialog text and border
    pub error_text: Color,

    /// Border of informational dialogs
    pub dialog_border: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            normal_text: None, // Use terminal default
            title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            progress: Style::default().fg(Color::Yellow),
            hint: Style::default().fg(Color::DarkGray),
            status_bg: Color::Blue,
            status_fg: Color::White,
            error_text: Color::Red,
            dialog_border: Color::Cyan,
        }
    }
}

impl ColorTheme {
    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            normal_text: None,
            title: Style::default().add_modifier(Modifier::BOLD),
            progress: Style::default().add_modifier(Modifier::ITALIC),
            hint: Style::default(),
            status_bg: Color::Black,
            status_fg: Color::White,
            error_text: Color::White,
            dialog_border: Color::White,
        }
    }

    /// Create a high-contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            normal_text: Some(Color::White),
            title: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            progress: Style::default().fg(Color::LightGreen),
            hint: Style::default().fg(Color::White),
            status_bg: Color::White,
            status_fg: Color::Black,
            error_text: Color::LightRed,
            dialog_border: Color::LightYellow,
        }
    }

    /// Base style for body text
    pub fn text(&self) -> Style {
        match self.normal_text {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }
}
