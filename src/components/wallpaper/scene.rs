//! Scene compositor: lifecycle contract, per-frame draw order and frame loop.
//!
//! The host forwards surface, visibility, offset and touch events here. All of
//! them, and every timer tick, run on one thread, so pointer writes from input
//! events are simply read by the next frame.

use std::time::Duration;

use log::{debug, error, info, warn};

use super::background::BackgroundLayer;
use super::burst::BurstLayer;
use super::error::DrawError;
use super::fog::FogLayer;
use super::grid::HexGrid;
use super::scheduler::{FrameScheduler, TimerBackend};
use super::surface::{AssetSource, Canvas, Image, ImageOf, LockedCanvas, Surface};
use super::theme::{Color, Theme};
use super::types::{Offsets, Pointer, TouchPhase};

/// Per-frame inputs pushed into the layers.
#[derive(Clone, Copy, Debug)]
struct Frame {
	width: f64,
	height: f64,
	pointer: Pointer,
	time_ms: f64,
	clear_color: Color,
}

/// The layer stack, back to front.
struct Layers<I: Image> {
	/// Built on the first `surface_created`.
	background: Option<BackgroundLayer<I>>,
	grid: Option<HexGrid>,
	fog: FogLayer,
	burst: BurstLayer,
}

impl<I: Image> Layers<I> {
	fn compose<C: Canvas<Image = I>>(&mut self, canvas: &mut C, frame: Frame) -> Result<(), DrawError> {
		canvas.clear(frame.clear_color)?;

		if let Some(background) = self.background.as_mut() {
			background.draw(canvas)?;
		}

		if let Some(grid) = &self.grid {
			grid.draw(canvas, frame.time_ms)?;
		}

		self.fog.update(frame.width, frame.height, frame.pointer);
		self.fog.draw(canvas)?;

		self.burst.update(frame.width, frame.height);
		self.burst.draw(canvas)?;

		Ok(())
	}
}

/// Core scene state combining the layer stack with the host-facing lifecycle.
pub struct Scene<S, A, T>
where
	S: Surface,
	A: AssetSource<Image = ImageOf<S>>,
	T: TimerBackend,
{
	theme: Theme,
	assets: A,
	surface: Option<S>,
	scheduler: FrameScheduler<T>,
	layers: Layers<ImageOf<S>>,
	width: u32,
	height: u32,
	offset: f64,
	pointer: Pointer,
	visible: bool,
}

impl<S, A, T> Scene<S, A, T>
where
	S: Surface,
	A: AssetSource<Image = ImageOf<S>>,
	T: TimerBackend,
{
	/// Scene with randomly seeded layers.
	pub fn new(theme: Theme, assets: A, timer: T) -> Self {
		let fog = FogLayer::new(theme.fog.clone());
		let burst = BurstLayer::new(theme.burst.clone());
		Self::with_layers(theme, assets, timer, fog, burst)
	}

	/// Builds a scene around pre-seeded layers.
	pub fn with_layers(theme: Theme, assets: A, timer: T, fog: FogLayer, burst: BurstLayer) -> Self {
		let grid = theme.grid.enabled.then(|| HexGrid::new(theme.grid.clone()));
		let interval = Duration::from_millis(u64::from(theme.frame_interval_ms));
		Self {
			scheduler: FrameScheduler::new(timer, interval),
			layers: Layers {
				background: None,
				grid,
				fog,
				burst,
			},
			theme,
			assets,
			surface: None,
			width: 0,
			height: 0,
			offset: 0.0,
			pointer: Pointer::default(),
			visible: false,
		}
	}

	/// Attaches a surface. Loads the background image the first time.
	pub fn surface_created(&mut self, surface: S) {
		self.surface = Some(surface);
		if self.layers.background.is_none() {
			let id = &self.theme.background.image;
			let image = match self.assets.load(id) {
				Ok(image) => Some(image),
				Err(e) => {
					warn!("ethereal: background unavailable, drawing without it: {}", e);
					None
				}
			};
			self.layers.background = Some(BackgroundLayer::new(image, &self.theme.background));
		}
	}

	/// Resizes every layer to the new surface and draws one frame.
	pub fn surface_changed(&mut self, surface: S, width: u32, height: u32) {
		info!("ethereal: surface {}x{}", width, height);
		self.surface = Some(surface);
		self.width = width;
		self.height = height;

		let (w, h) = (f64::from(width), f64::from(height));
		if let Some(background) = self.layers.background.as_mut() {
			background.update_size(w, h);
		}
		if let Some(grid) = self.layers.grid.as_mut() {
			grid.update_size(w, h);
		}
		self.layers.fog.update_size(w, h);

		self.draw();
	}

	/// Stops the frame loop and drops the surface.
	pub fn surface_destroyed(&mut self) {
		self.scheduler.stop();
		self.surface = None;
	}

	/// Starts or stops the frame loop.
	pub fn visibility_changed(&mut self, visible: bool) {
		debug!("ethereal: visible={}", visible);
		self.visible = visible;
		if visible {
			self.scheduler.start();
		} else {
			self.scheduler.stop();
		}
	}

	/// Applies the home-screen scroll offset as parallax.
	pub fn offsets_changed(&mut self, offsets: Offsets) {
		let Some(background) = self.layers.background.as_mut() else {
			return;
		};
		let offset = offsets.x.clamp(0.0, 1.0);
		self.offset = offset;
		background.set_parallax(offset);
		self.layers.fog.set_parallax(offset);
		self.layers.burst.set_parallax(offset);
	}

	/// Tracks the pointer and ignites a burst while it is pressed.
	pub fn touch_event(&mut self, x: f64, y: f64, phase: TouchPhase) {
		self.pointer = Pointer {
			x,
			y,
			active: phase.is_pressed(),
		};

		if let Some(background) = self.layers.background.as_mut() {
			background.on_touch(x, y, phase);
		}

		if phase.is_pressed() {
			self.layers.burst.ignite(x, y);
		}
	}

	/// Timer callback: one frame, then the next tick while visible.
	pub fn tick(&mut self) {
		self.scheduler.fired();
		self.draw();
		if self.visible {
			self.scheduler.schedule_next();
		}
	}

	/// Draws one frame if a surface of known size is available.
	pub fn draw(&mut self) {
		if self.width == 0 || self.height == 0 {
			return;
		}
		let Some(surface) = self.surface.as_mut() else {
			return;
		};

		let frame = Frame {
			width: f64::from(self.width),
			height: f64::from(self.height),
			pointer: self.pointer,
			time_ms: self.scheduler.now_ms(),
			clear_color: self.theme.clear_color,
		};

		let mut canvas = match LockedCanvas::lock(surface) {
			Ok(canvas) => canvas,
			Err(e) => {
				debug!("ethereal: skipping frame: {}", e);
				return;
			}
		};

		if let Err(e) = self.layers.compose(&mut *canvas, frame) {
			error!("ethereal: frame failed: {}", e);
		}
	}

	/// Active theme.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Viewport size in pixels, `(0, 0)` until the surface is sized.
	pub fn viewport(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// Latest pointer state.
	pub fn pointer(&self) -> Pointer {
		self.pointer
	}

	/// Current normalized page offset.
	pub fn offset(&self) -> f64 {
		self.offset
	}

	/// Whether the host reported the scene visible.
	pub fn is_visible(&self) -> bool {
		self.visible
	}

	/// Whether a surface is attached.
	pub fn has_surface(&self) -> bool {
		self.surface.is_some()
	}

	/// Whether a frame tick is pending.
	pub fn is_ticking(&self) -> bool {
		self.scheduler.is_pending()
	}

	/// Background layer, once a surface was created.
	pub fn background(&self) -> Option<&BackgroundLayer<ImageOf<S>>> {
		self.layers.background.as_ref()
	}

	/// Hex grid, when the theme enables it.
	pub fn grid(&self) -> Option<&HexGrid> {
		self.layers.grid.as_ref()
	}

	/// Fog layer.
	pub fn fog(&self) -> &FogLayer {
		&self.layers.fog
	}

	/// Burst layer.
	pub fn burst(&self) -> &BurstLayer {
		&self.layers.burst
	}
}
