//! Host-facing input types: pointer and offset payloads, the wheel-driven
//! virtual pager and the page-supplied configuration block.

use serde::Deserialize;

use super::error::ConfigError;
use super::theme::{Color, Theme};

/// Phase of a touch/pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
	/// Finger down or button pressed.
	Down,
	/// Pressed pointer moved.
	Move,
	/// Released.
	Up,
	/// Gesture aborted by the host.
	Cancel,
}

impl TouchPhase {
	/// Whether the pointer is pressed after this event.
	pub fn is_pressed(self) -> bool {
		matches!(self, TouchPhase::Down | TouchPhase::Move)
	}
}

/// Last known pointer position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
	/// Horizontal position in viewport pixels.
	pub x: f64,
	/// Vertical position in viewport pixels.
	pub y: f64,
	/// Whether the pointer is pressed.
	pub active: bool,
}

/// Home-screen style scroll offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offsets {
	/// Normalized horizontal position, 0.0 (first page) to 1.0 (last page).
	pub x: f64,
	/// Vertical offset in `[0, 1]`.
	pub y: f64,
	/// Normalized distance between pages.
	pub x_step: f64,
	/// Vertical distance between pages.
	pub y_step: f64,
	/// Horizontal scroll in pixels.
	pub x_pixels: i32,
	/// Vertical scroll in pixels.
	pub y_pixels: i32,
}

/// Turns wheel deltas into launcher-like page offsets.
#[derive(Clone, Debug)]
pub struct VirtualPager {
	pages: u32,
	/// Scroll position in pages, within `[0, pages - 1]`.
	position: f64,
}

impl VirtualPager {
	/// Pager over `pages` screens, at the first one.
	pub fn new(pages: u32) -> Self {
		Self {
			pages: pages.max(1),
			position: 0.0,
		}
	}

	fn last_page(&self) -> f64 {
		(self.pages - 1) as f64
	}

	/// Scrolls by `delta_px` given the width of one page.
	pub fn scroll(&mut self, delta_px: f64, page_width: f64) -> Offsets {
		if page_width > 0.0 {
			self.position = (self.position + delta_px / page_width).clamp(0.0, self.last_page());
		}
		self.offsets(page_width)
	}

	/// Offsets for the current position.
	pub fn offsets(&self, page_width: f64) -> Offsets {
		let last = self.last_page();
		let (x, x_step) = if last > 0.0 {
			(self.position / last, 1.0 / last)
		} else {
			(0.0, 0.0)
		};
		Offsets {
			x,
			x_step,
			x_pixels: -(self.position * page_width).round() as i32,
			..Offsets::default()
		}
	}
}

/// Optional `<script id="wallpaper-config">` JSON block.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WallpaperConfig {
	/// Preset name (defaults to "ethereal").
	pub theme: Option<String>,
	/// Sky image URL overriding the preset's.
	pub image: Option<String>,
	/// CSS color overriding the preset's clear color.
	pub clear_color: Option<String>,
	/// Number of virtual pages for wheel parallax.
	pub pages: Option<u32>,
}

impl WallpaperConfig {
	/// Parses the config block.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Resolves the preset and applies overrides.
	pub fn theme(&self) -> Result<Theme, ConfigError> {
		let name = self.theme.as_deref().unwrap_or("ethereal");
		let mut theme =
			Theme::by_name(name).ok_or_else(|| ConfigError::UnknownTheme(name.to_string()))?;
		if let Some(image) = &self.image {
			theme.background.image = image.clone();
		}
		if let Some(css) = &self.clear_color {
			theme.clear_color =
				Color::parse(css).ok_or_else(|| ConfigError::InvalidColor(css.clone()))?;
		}
		Ok(theme)
	}

	/// Number of virtual pages, 5 unless set.
	pub fn pages(&self) -> u32 {
		self.pages.unwrap_or(5)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn phases_map_to_pressed() {
		assert!(TouchPhase::Down.is_pressed());
		assert!(TouchPhase::Move.is_pressed());
		assert!(!TouchPhase::Up.is_pressed());
		assert!(!TouchPhase::Cancel.is_pressed());
	}

	#[test]
	fn pager_normalizes_and_clamps() {
		let mut pager = VirtualPager::new(5);
		let o = pager.scroll(500.0, 1000.0);
		assert!((o.x - 0.125).abs() < 1e-12);
		assert_eq!(o.x_step, 0.25);
		assert_eq!(o.x_pixels, -500);
		assert_eq!(pager.scroll(1.0e6, 1000.0).x, 1.0);
		assert_eq!(pager.scroll(-1.0e6, 1000.0).x, 0.0);
	}

	#[test]
	fn single_page_pager_stays_put() {
		let mut pager = VirtualPager::new(1);
		let o = pager.scroll(300.0, 1000.0);
		assert_eq!((o.x, o.x_step), (0.0, 0.0));
	}

	#[test]
	fn config_defaults_to_ethereal() {
		let config = WallpaperConfig::from_json("{}").unwrap();
		assert_eq!(config.theme().unwrap().name, "ethereal");
		assert_eq!(config.pages(), 5);
	}

	#[test]
	fn config_applies_overrides() {
		let config = WallpaperConfig::from_json(
			r##"{"theme": "igniter", "image": "sky.png", "clear_color": "#102030", "pages": 3}"##,
		)
		.unwrap();
		let theme = config.theme().unwrap();
		assert_eq!(theme.name, "igniter");
		assert_eq!(theme.background.image, "sky.png");
		assert_eq!(theme.clear_color, Color::rgb(0x10, 0x20, 0x30));
		assert_eq!(config.pages(), 3);
	}

	#[test]
	fn config_rejects_unknown_theme_and_bad_json() {
		let config = WallpaperConfig::from_json(r#"{"theme": "nope"}"#).unwrap();
		assert!(matches!(config.theme(), Err(ConfigError::UnknownTheme(_))));
		assert!(matches!(
			WallpaperConfig::from_json("{"),
			Err(ConfigError::Parse(_))
		));
		let config = WallpaperConfig::from_json(r#"{"clear_color": "blue"}"#).unwrap();
		assert!(matches!(config.theme(), Err(ConfigError::InvalidColor(_))));
	}

	#[test]
	fn config_rejects_non_ascii_color() {
		let config = WallpaperConfig::from_json(r##"{"clear_color": "#aé123"}"##).unwrap();
		assert!(matches!(config.theme(), Err(ConfigError::InvalidColor(_))));
	}
}
