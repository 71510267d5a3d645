//! In-memory stand-ins for the browser: a recording canvas, a fake surface,
//! a manually driven timer and a static asset source.
//!
//! Used by the unit tests and the property tests under `tests/`. Outside
//! `cfg(test)` it is only built with the `testing` feature.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::error::{AssetError, DrawError, SurfaceError};
use super::scheduler::TimerBackend;
use super::surface::{AssetSource, Canvas, Image, Surface};
use super::theme::Color;

/// One recorded canvas call. Variants mirror the [`Canvas`] methods.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	Save,
	Restore,
	Translate(f64, f64),
	Clear(Color),
	Image { x: f64, y: f64, width: f64, height: f64 },
	Circle { x: f64, y: f64, radius: f64, color: Color },
	Glow { x: f64, y: f64, radius: f64, color: Color },
	Polyline { points: usize, width: f64, color: Color, closed: bool },
}

/// Everything a [`FakeSurface`] saw.
#[derive(Debug, Default)]
pub struct FrameLog {
	/// Number of `lock_canvas` calls.
	pub locks: usize,
	/// Number of `unlock_and_post` calls.
	pub posts: usize,
	/// Recorded drawing commands in call order.
	pub commands: Vec<DrawCommand>,
}

impl FrameLog {
	/// Number of filled circles.
	pub fn circles(&self) -> usize {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Circle { .. }))
			.count()
	}

	/// Offsets of every horizontal translation.
	pub fn translations(&self) -> Vec<f64> {
		self.commands
			.iter()
			.filter_map(|c| match c {
				DrawCommand::Translate(dx, _) => Some(*dx),
				_ => None,
			})
			.collect()
	}
}

/// Image with a fixed (or missing) size.
#[derive(Clone, Debug)]
pub struct FakeImage {
	/// Reported size, `None` while decoding.
	pub size: Option<(f64, f64)>,
}

impl Image for FakeImage {
	fn size(&self) -> Option<(f64, f64)> {
		self.size
	}
}

/// Canvas that appends every call to a shared [`FrameLog`].
pub struct RecordingCanvas {
	log: Rc<RefCell<FrameLog>>,
	fail_draws: bool,
}

impl RecordingCanvas {
	fn record(&self, command: DrawCommand) -> Result<(), DrawError> {
		if self.fail_draws {
			return Err(DrawError::Canvas("injected failure".to_string()));
		}
		self.log.borrow_mut().commands.push(command);
		Ok(())
	}
}

impl Canvas for RecordingCanvas {
	type Image = FakeImage;

	fn save(&mut self) {
		self.log.borrow_mut().commands.push(DrawCommand::Save);
	}

	fn restore(&mut self) {
		self.log.borrow_mut().commands.push(DrawCommand::Restore);
	}

	fn translate(&mut self, dx: f64, dy: f64) -> Result<(), DrawError> {
		self.log
			.borrow_mut()
			.commands
			.push(DrawCommand::Translate(dx, dy));
		Ok(())
	}

	fn clear(&mut self, color: Color) -> Result<(), DrawError> {
		self.record(DrawCommand::Clear(color))
	}

	fn draw_image(
		&mut self,
		_image: &FakeImage,
		x: f64,
		y: f64,
		width: f64,
		height: f64,
	) -> Result<(), DrawError> {
		self.record(DrawCommand::Image {
			x,
			y,
			width,
			height,
		})
	}

	fn fill_circle(
		&mut self,
		x: f64,
		y: f64,
		radius: f64,
		color: Color,
	) -> Result<(), DrawError> {
		self.record(DrawCommand::Circle {
			x,
			y,
			radius,
			color,
		})
	}

	fn draw_glow(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<(), DrawError> {
		self.record(DrawCommand::Glow {
			x,
			y,
			radius,
			color,
		})
	}

	fn stroke_polyline(
		&mut self,
		points: &[(f64, f64)],
		width: f64,
		color: Color,
		closed: bool,
	) -> Result<(), DrawError> {
		self.record(DrawCommand::Polyline {
			points: points.len(),
			width,
			color,
			closed,
		})
	}
}

/// Surface backed by a [`RecordingCanvas`]. Clones share one log.
#[derive(Clone, Default)]
pub struct FakeSurface {
	log: Rc<RefCell<FrameLog>>,
	fail_draws: bool,
	fail_lock: bool,
}

impl FakeSurface {
	/// Surface that records every frame.
	pub fn new() -> Self {
		Self::default()
	}

	/// Every drawing primitive on its canvases returns an error.
	pub fn failing_draws() -> Self {
		Self {
			fail_draws: true,
			..Self::default()
		}
	}

	/// `lock_canvas` always fails.
	pub fn unavailable() -> Self {
		Self {
			fail_lock: true,
			..Self::default()
		}
	}

	/// Shared frame log.
	pub fn log(&self) -> Ref<'_, FrameLog> {
		self.log.borrow()
	}

	/// Clears the frame log.
	pub fn reset_log(&self) {
		*self.log.borrow_mut() = FrameLog::default();
	}
}

impl Surface for FakeSurface {
	type Canvas = RecordingCanvas;

	fn lock_canvas(&mut self) -> Result<RecordingCanvas, SurfaceError> {
		if self.fail_lock {
			return Err(SurfaceError::Unavailable);
		}
		self.log.borrow_mut().locks += 1;
		Ok(RecordingCanvas {
			log: self.log.clone(),
			fail_draws: self.fail_draws,
		})
	}

	fn unlock_and_post(&mut self, _canvas: RecordingCanvas) -> Result<(), SurfaceError> {
		self.log.borrow_mut().posts += 1;
		Ok(())
	}
}

/// Asset source that either always returns an image of a fixed size or
/// always fails.
#[derive(Clone, Debug)]
pub struct StaticAssets {
	/// Size of every loaded image, `None` to fail every load.
	pub image_size: Option<(f64, f64)>,
}

impl StaticAssets {
	/// Source whose images are `width` x `height`.
	pub fn with_image(width: f64, height: f64) -> Self {
		Self {
			image_size: Some((width, height)),
		}
	}

	/// Source that fails every load.
	pub fn missing() -> Self {
		Self { image_size: None }
	}
}

impl AssetSource for StaticAssets {
	type Image = FakeImage;

	fn load(&self, id: &str) -> Result<FakeImage, AssetError> {
		match self.image_size {
			Some(size) => Ok(FakeImage { size: Some(size) }),
			None => Err(AssetError::NotFound(id.to_string())),
		}
	}
}

/// State of a [`ManualTimer`].
#[derive(Debug, Default)]
pub struct TimerLog {
	next_handle: u32,
	/// Posted, not yet fired or cancelled.
	pub pending: Vec<(u32, Duration)>,
	/// Handles passed to `cancel`.
	pub cancelled: Vec<u32>,
	/// Total number of posts.
	pub posted: usize,
	/// Current clock value.
	pub now_ms: f64,
}

/// Timer that never fires on its own; tests fire ticks by hand.
#[derive(Clone, Default)]
pub struct ManualTimer {
	log: Rc<RefCell<TimerLog>>,
}

impl ManualTimer {
	/// Timer at time zero with nothing pending.
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared timer state.
	pub fn log(&self) -> Ref<'_, TimerLog> {
		self.log.borrow()
	}

	/// Removes the oldest pending post, as if it had fired.
	/// Returns false when nothing was pending.
	pub fn fire(&self) -> bool {
		let mut log = self.log.borrow_mut();
		if log.pending.is_empty() {
			return false;
		}
		log.pending.remove(0);
		true
	}

	/// Moves the clock forward.
	pub fn advance(&self, ms: f64) {
		self.log.borrow_mut().now_ms += ms;
	}
}

impl TimerBackend for ManualTimer {
	type Handle = u32;

	fn post(&mut self, delay: Duration) -> Option<u32> {
		let mut log = self.log.borrow_mut();
		let handle = log.next_handle;
		log.next_handle += 1;
		log.posted += 1;
		log.pending.push((handle, delay));
		Some(handle)
	}

	fn cancel(&mut self, handle: u32) {
		let mut log = self.log.borrow_mut();
		log.pending.retain(|(h, _)| *h != handle);
		log.cancelled.push(handle);
	}

	fn now_ms(&self) -> f64 {
		self.log.borrow().now_ms
	}
}
