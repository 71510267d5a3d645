//! Browser implementations of the drawing, asset and timer abstractions.
//!
//! The surface is double buffered: frames are drawn into an offscreen canvas
//! and blitted onto the visible one when posted.

use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use log::{error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Window};

use super::error::{AssetError, DrawError, SurfaceError};
use super::scene::Scene;
use super::scheduler::TimerBackend;
use super::surface::{AssetSource, Canvas, Image, Surface};
use super::theme::Color;

/// Scene wired to the browser.
pub type WebScene = Scene<WebSurface, WebAssets, WindowTimer>;

fn js_err(e: JsValue) -> DrawError {
	DrawError::Canvas(format!("{:?}", e))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
	canvas
		.get_context("2d")
		.map_err(|e| SurfaceError::Lost(format!("{:?}", e)))?
		.ok_or(SurfaceError::Unavailable)?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| SurfaceError::Lost("2d context has unexpected type".to_string()))
}

/// Image element loaded by URL. Decodes asynchronously; `size` stays `None`
/// until it has, and forever if loading failed.
pub struct WebImage {
	element: HtmlImageElement,
	failed: Rc<Cell<bool>>,
	_on_error: Closure<dyn FnMut()>,
}

impl Image for WebImage {
	fn size(&self) -> Option<(f64, f64)> {
		if self.failed.get() || !self.element.complete() || self.element.natural_width() == 0 {
			return None;
		}
		Some((
			f64::from(self.element.natural_width()),
			f64::from(self.element.natural_height()),
		))
	}
}

/// Loads images relative to the page.
#[derive(Clone, Default)]
pub struct WebAssets;

impl AssetSource for WebAssets {
	type Image = WebImage;

	fn load(&self, id: &str) -> Result<WebImage, AssetError> {
		if id.is_empty() {
			return Err(AssetError::NotFound(id.to_string()));
		}
		let element = HtmlImageElement::new().map_err(|e| AssetError::Decode {
			id: id.to_string(),
			reason: format!("{:?}", e),
		})?;

		let failed = Rc::new(Cell::new(false));
		let (failed_cb, id_cb) = (failed.clone(), id.to_string());
		let on_error: Closure<dyn FnMut()> = Closure::new(move || {
			warn!("ethereal: failed to decode background {}", id_cb);
			failed_cb.set(true);
		});
		element.set_onerror(Some(on_error.as_ref().unchecked_ref()));
		element.set_src(id);

		Ok(WebImage {
			element,
			failed,
			_on_error: on_error,
		})
	}
}

/// Visible canvas plus its offscreen back buffer.
#[derive(Clone)]
pub struct WebSurface {
	front: HtmlCanvasElement,
	front_ctx: CanvasRenderingContext2d,
	back: HtmlCanvasElement,
	back_ctx: CanvasRenderingContext2d,
}

impl WebSurface {
	/// Wraps the visible canvas and creates its back buffer.
	pub fn new(document: &Document, front: HtmlCanvasElement) -> Result<Self, SurfaceError> {
		let back: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(|e| SurfaceError::Lost(format!("{:?}", e)))?
			.dyn_into()
			.map_err(|_| SurfaceError::Lost("created element is not a canvas".to_string()))?;
		let front_ctx = context_2d(&front)?;
		let back_ctx = context_2d(&back)?;
		back_ctx.set_image_smoothing_enabled(true);
		Ok(Self {
			front,
			front_ctx,
			back,
			back_ctx,
		})
	}

	/// Resizes both buffers.
	pub fn resize(&self, width: u32, height: u32) {
		self.front.set_width(width);
		self.front.set_height(height);
		self.back.set_width(width);
		self.back.set_height(height);
	}

	/// The visible canvas.
	pub fn element(&self) -> &HtmlCanvasElement {
		&self.front
	}
}

impl Surface for WebSurface {
	type Canvas = WebCanvas;

	fn lock_canvas(&mut self) -> Result<WebCanvas, SurfaceError> {
		if !self.front.is_connected() {
			return Err(SurfaceError::Unavailable);
		}
		Ok(WebCanvas {
			ctx: self.back_ctx.clone(),
			width: f64::from(self.back.width()),
			height: f64::from(self.back.height()),
		})
	}

	fn unlock_and_post(&mut self, _canvas: WebCanvas) -> Result<(), SurfaceError> {
		self.front_ctx
			.draw_image_with_html_canvas_element(&self.back, 0.0, 0.0)
			.map_err(|e| SurfaceError::Lost(format!("{:?}", e)))
	}
}

/// 2D context of the back buffer for one frame.
pub struct WebCanvas {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl Canvas for WebCanvas {
	type Image = WebImage;

	fn save(&mut self) {
		self.ctx.save();
	}

	fn restore(&mut self) {
		self.ctx.restore();
	}

	fn translate(&mut self, dx: f64, dy: f64) -> Result<(), DrawError> {
		self.ctx.translate(dx, dy).map_err(js_err)
	}

	fn clear(&mut self, color: Color) -> Result<(), DrawError> {
		self.ctx.save();
		let reset = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
		self.ctx.restore();
		reset.map_err(js_err)
	}

	fn draw_image(
		&mut self,
		image: &WebImage,
		x: f64,
		y: f64,
		width: f64,
		height: f64,
	) -> Result<(), DrawError> {
		self.ctx
			.draw_image_with_html_image_element_and_dw_and_dh(&image.element, x, y, width, height)
			.map_err(js_err)
	}

	fn fill_circle(
		&mut self,
		x: f64,
		y: f64,
		radius: f64,
		color: Color,
	) -> Result<(), DrawError> {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.begin_path();
		self.ctx.arc(x, y, radius, 0.0, PI * 2.0).map_err(js_err)?;
		self.ctx.fill();
		Ok(())
	}

	fn draw_glow(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<(), DrawError> {
		if radius <= 0.0 || color.a < 0.001 {
			return Ok(());
		}
		let gradient = self
			.ctx
			.create_radial_gradient(x, y, 0.0, x, y, radius)
			.map_err(js_err)?;
		gradient
			.add_color_stop(0.0, &color.to_css())
			.map_err(js_err)?;
		gradient
			.add_color_stop(1.0, &color.with_alpha(0.0).to_css())
			.map_err(js_err)?;

		self.ctx.begin_path();
		self.ctx.arc(x, y, radius, 0.0, 2.0 * PI).map_err(js_err)?;
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
		Ok(())
	}

	fn stroke_polyline(
		&mut self,
		points: &[(f64, f64)],
		width: f64,
		color: Color,
		closed: bool,
	) -> Result<(), DrawError> {
		let Some((&(x0, y0), rest)) = points.split_first() else {
			return Ok(());
		};
		self.ctx.set_stroke_style_str(&color.to_css());
		self.ctx.set_line_width(width);
		self.ctx.begin_path();
		self.ctx.move_to(x0, y0);
		for &(x, y) in rest {
			self.ctx.line_to(x, y);
		}
		if closed {
			self.ctx.close_path();
		}
		self.ctx.stroke();
		Ok(())
	}
}

/// `setTimeout`-based frame timer.
pub struct WindowTimer {
	window: Window,
	callback: Closure<dyn FnMut()>,
}

impl WindowTimer {
	/// Timer that runs `on_tick` whenever a posted timeout fires.
	pub fn new(window: Window, on_tick: impl FnMut() + 'static) -> Self {
		Self {
			window,
			callback: Closure::new(on_tick),
		}
	}
}

impl TimerBackend for WindowTimer {
	type Handle = i32;

	fn post(&mut self, delay: Duration) -> Option<i32> {
		let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		match self
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				self.callback.as_ref().unchecked_ref(),
				millis,
			) {
			Ok(handle) => Some(handle),
			Err(e) => {
				error!("ethereal: setTimeout failed: {:?}", e);
				None
			}
		}
	}

	fn cancel(&mut self, handle: i32) {
		self.window.clear_timeout_with_handle(handle);
	}

	fn now_ms(&self) -> f64 {
		js_sys::Date::now()
	}
}
