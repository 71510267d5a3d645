//! Drawing abstractions between the layers and whatever owns the pixels.
//!
//! A [`Surface`] hands out one exclusive [`Canvas`] per frame and takes it
//! back to present it. [`LockedCanvas`] ties the two together so a frame is
//! posted exactly once, whichever way the drawing code exits.

use std::ops::{Deref, DerefMut};

use log::error;

use super::error::{AssetError, DrawError, SurfaceError};
use super::theme::Color;

/// A decoded (or still decoding) image.
pub trait Image {
	/// Pixel dimensions, or `None` while the image is not usable yet.
	fn size(&self) -> Option<(f64, f64)>;
}

/// One locked drawing buffer.
///
/// Coordinates are in viewport units. Transform calls (`translate`) stack
/// between `save` and `restore` the way a 2D canvas context does.
pub trait Canvas {
	/// Image type this canvas can blit.
	type Image: Image;

	/// Pushes the current transform.
	fn save(&mut self);
	/// Pops the transform pushed by the matching `save`.
	fn restore(&mut self);
	/// Shifts subsequent drawing by `(dx, dy)`.
	fn translate(&mut self, dx: f64, dy: f64) -> Result<(), DrawError>;

	/// Fills the whole buffer, ignoring the current transform.
	fn clear(&mut self, color: Color) -> Result<(), DrawError>;

	/// Draws `image` stretched into the destination rectangle.
	fn draw_image(
		&mut self,
		image: &Self::Image,
		x: f64,
		y: f64,
		width: f64,
		height: f64,
	) -> Result<(), DrawError>;

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color)
	-> Result<(), DrawError>;

	/// Soft radial sprite: `color` at the center fading to transparent at `radius`.
	fn draw_glow(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<(), DrawError>;

	fn stroke_polyline(
		&mut self,
		points: &[(f64, f64)],
		width: f64,
		color: Color,
		closed: bool,
	) -> Result<(), DrawError>;

	/// Runs `draw` with the origin shifted by `(dx, dy)`, restoring the
	/// transform afterwards even if `draw` fails.
	fn with_translation<F>(&mut self, dx: f64, dy: f64, draw: F) -> Result<(), DrawError>
	where
		F: FnOnce(&mut Self) -> Result<(), DrawError>,
		Self: Sized,
	{
		self.save();
		let result = self.translate(dx, dy).and_then(|()| draw(self));
		self.restore();
		result
	}
}

/// Owner of the on-screen pixels.
pub trait Surface {
	/// Canvas handed out per frame.
	type Canvas: Canvas;

	/// Locks the back buffer for drawing.
	fn lock_canvas(&mut self) -> Result<Self::Canvas, SurfaceError>;
	/// Posts a finished buffer to the screen.
	fn unlock_and_post(&mut self, canvas: Self::Canvas) -> Result<(), SurfaceError>;
}

/// Image type drawn by a surface's canvases.
pub type ImageOf<S> = <<S as Surface>::Canvas as Canvas>::Image;

/// Loads images by identifier.
pub trait AssetSource {
	/// Image type produced by this source.
	type Image: Image;

	/// Loads the image named `id`.
	fn load(&self, id: &str) -> Result<Self::Image, AssetError>;
}

/// A canvas locked from a surface, posted back when dropped.
pub struct LockedCanvas<'a, S: Surface> {
	surface: &'a mut S,
	// Only `None` inside `drop`.
	canvas: Option<S::Canvas>,
}

impl<'a, S: Surface> LockedCanvas<'a, S> {
	/// Locks a canvas on `surface`; the canvas is posted when the guard drops.
	pub fn lock(surface: &'a mut S) -> Result<Self, SurfaceError> {
		let canvas = surface.lock_canvas()?;
		Ok(Self {
			surface,
			canvas: Some(canvas),
		})
	}
}

impl<S: Surface> Deref for LockedCanvas<'_, S> {
	type Target = S::Canvas;

	fn deref(&self) -> &Self::Target {
		match self.canvas.as_ref() {
			Some(canvas) => canvas,
			None => unreachable!("canvas is only taken on drop"),
		}
	}
}

impl<S: Surface> DerefMut for LockedCanvas<'_, S> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		match self.canvas.as_mut() {
			Some(canvas) => canvas,
			None => unreachable!("canvas is only taken on drop"),
		}
	}
}

impl<S: Surface> Drop for LockedCanvas<'_, S> {
	fn drop(&mut self) {
		if let Some(canvas) = self.canvas.take() {
			if let Err(e) = self.surface.unlock_and_post(canvas) {
				error!("ethereal: failed to post frame: {}", e);
			}
		}
	}
}
