//! Layered live wallpaper rendered on an HTML canvas.
//!
//! A [`Scene`] composes, back to front:
//! - a cover-fit sky image with slow horizontal parallax
//! - an optional pulsing hexagon grid
//! - drifting fog puffs that shy away from the pointer
//! - a pooled burst of sparks ignited by touches
//!
//! Drawing is driven by a ~16ms self-rescheduling timer that only runs while
//! the page is visible and a canvas is attached. The rendering core is
//! generic over [`surface::Surface`] and [`scheduler::TimerBackend`], the
//! browser bindings live in [`web`].
//!
//! # Example
//!
//! ```ignore
//! use ethereal_wallpaper::components::wallpaper::{Theme, WallpaperCanvas};
//!
//! view! { <WallpaperCanvas theme=Theme::igniter() pages=5 /> }
//! ```

pub mod background;
pub mod burst;
mod component;
pub mod error;
pub mod fog;
pub mod grid;
pub mod particle;
pub mod scene;
pub mod scheduler;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod theme;
pub mod types;
pub mod web;

pub use component::WallpaperCanvas;
pub use error::{AssetError, ConfigError, DrawError, SurfaceError};
pub use scene::Scene;
pub use theme::Theme;
pub use types::{Offsets, Pointer, TouchPhase, VirtualPager, WallpaperConfig};
