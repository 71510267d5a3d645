//! UI components.

/// Full-window live wallpaper.
pub mod wallpaper;
