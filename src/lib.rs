//! ethereal-wallpaper: Layered live wallpaper for the browser.
//!
//! This crate provides a WASM-based full-window canvas component that renders
//! a parallax sky, drifting fog that reacts to the pointer and touch-ignited
//! particle bursts.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Only needed for its "js" feature, which lets rand seed from the browser.
use getrandom as _;

/// Leptos components.
pub mod components;

pub use components::wallpaper::{Theme, WallpaperCanvas, WallpaperConfig};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ethereal: logging initialized");
}

/// Load wallpaper settings from a script element with id="wallpaper-config".
/// Expected format: JSON with { theme, image, clear_color, pages }, all optional.
fn load_config() -> Option<WallpaperConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("wallpaper-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match WallpaperConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"ethereal: loaded config, theme {}",
				config.theme.as_deref().unwrap_or("ethereal")
			);
			Some(config)
		}
		Err(e) => {
			warn!("ethereal: failed to parse wallpaper config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Reads the optional config from the DOM and renders the wallpaper.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let theme = config.theme().unwrap_or_else(|e| {
		warn!("ethereal: {}, using default theme", e);
		Theme::default()
	});
	let pages = config.pages();
	let title = format!("{} wallpaper", theme.name);

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text=title />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<WallpaperCanvas theme=theme pages=pages />
	}
}
