//! Rendering subsystem: the render coordinator and the terminal UI it drives.

pub mod service;
pub mod ui;

pub use service::RenderLoopState;
