//! Sky image scaled to cover the viewport, with slow parallax.

use super::error::DrawError;
use super::surface::{Canvas, Image};
use super::theme::BackgroundStyle;
use super::types::TouchPhase;

/// Uniform scale plus centering offset that fills a viewport with an image
/// while preserving its aspect ratio. The overflowing axis is cropped evenly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
	/// Uniform image scale.
	pub scale: f64,
	/// Horizontal placement of the scaled image.
	pub dx: f64,
	/// Vertical placement of the scaled image.
	pub dy: f64,
}

impl CoverFit {
	/// `None` unless every dimension is positive.
	pub fn compute(image_w: f64, image_h: f64, view_w: f64, view_h: f64) -> Option<Self> {
		if image_w <= 0.0 || image_h <= 0.0 || view_w <= 0.0 || view_h <= 0.0 {
			return None;
		}
		let scale = (view_w / image_w).max(view_h / image_h);
		Some(Self {
			scale,
			dx: (view_w - image_w * scale) * 0.5,
			dy: (view_h - image_h * scale) * 0.5,
		})
	}
}

/// Background layer. Holds `None` for the image after a failed load and then
/// never draws.
pub struct BackgroundLayer<I: Image> {
	image: Option<I>,
	fit: Option<CoverFit>,
	width: f64,
	height: f64,
	offset: f64,
	parallax: f64,
}

impl<I: Image> BackgroundLayer<I> {
	/// Layer around an already requested image, `None` when loading failed.
	pub fn new(image: Option<I>, style: &BackgroundStyle) -> Self {
		Self {
			image,
			fit: None,
			width: 0.0,
			height: 0.0,
			offset: 0.0,
			parallax: style.parallax,
		}
	}

	/// Whether the image failed to load.
	pub fn is_degraded(&self) -> bool {
		self.image.is_none()
	}

	/// Cached transform, `None` until both the image and viewport sizes are known.
	pub fn fit(&self) -> Option<CoverFit> {
		self.fit
	}

	/// Recomputes the cover-fit for a new viewport.
	pub fn update_size(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.fit = self.compute_fit();
	}

	fn compute_fit(&self) -> Option<CoverFit> {
		let (image_w, image_h) = self.image.as_ref()?.size()?;
		CoverFit::compute(image_w, image_h, self.width, self.height)
	}

	/// Stores the normalized page offset in `[0, 1]`.
	pub fn set_parallax(&mut self, offset: f64) {
		self.offset = offset;
	}

	/// Horizontal shift for the current offset: 0 at the first page,
	/// `-width * factor` at the last.
	pub fn parallax_translation(&self) -> f64 {
		-self.offset * self.width * self.parallax
	}

	/// Reserved for touch-reactive clouds.
	pub fn on_touch(&mut self, _x: f64, _y: f64, _phase: TouchPhase) {}

	/// Blits the image at the cached fit, shifted by the parallax translation.
	pub fn draw<C: Canvas<Image = I>>(&mut self, canvas: &mut C) -> Result<(), DrawError> {
		if self.fit.is_none() {
			// Images may finish decoding after the last resize.
			self.fit = self.compute_fit();
		}
		let (Some(image), Some(fit)) = (self.image.as_ref(), self.fit) else {
			return Ok(());
		};
		let Some((image_w, image_h)) = image.size() else {
			return Ok(());
		};

		canvas.with_translation(self.parallax_translation(), 0.0, |canvas| {
			canvas.draw_image(
				image,
				fit.dx,
				fit.dy,
				image_w * fit.scale,
				image_h * fit.scale,
			)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::wallpaper::surface::LockedCanvas;
	use crate::components::wallpaper::testing::{DrawCommand, FakeImage, FakeSurface};
	use crate::components::wallpaper::theme::Theme;

	fn layer(size: Option<(f64, f64)>, parallax: f64) -> BackgroundLayer<FakeImage> {
		let style = BackgroundStyle {
			parallax,
			..Theme::ethereal().background
		};
		BackgroundLayer::new(Some(FakeImage { size }), &style)
	}

	#[test]
	fn cover_fit_wide_image_crops_sides() {
		let fit = CoverFit::compute(2000.0, 1000.0, 1080.0, 1920.0).unwrap();
		assert_eq!(fit.scale, 1.92);
		assert_eq!(fit.dy, 0.0);
		assert!((fit.dx - (1080.0 - 3840.0) / 2.0).abs() < 1e-9);
	}

	#[test]
	fn cover_fit_tall_image_crops_top_and_bottom() {
		let fit = CoverFit::compute(1000.0, 4000.0, 1000.0, 2000.0).unwrap();
		assert_eq!(fit.scale, 1.0);
		assert_eq!(fit.dx, 0.0);
		assert_eq!(fit.dy, -1000.0);
	}

	#[test]
	fn cover_fit_rejects_empty_dims() {
		assert!(CoverFit::compute(0.0, 10.0, 10.0, 10.0).is_none());
		assert!(CoverFit::compute(10.0, 10.0, 10.0, 0.0).is_none());
	}

	#[test]
	fn parallax_sweeps_linearly() {
		let mut bg = layer(Some((100.0, 100.0)), 0.2);
		bg.update_size(1000.0, 500.0);
		for (offset, expected) in [(0.0, 0.0), (0.25, -50.0), (0.5, -100.0), (1.0, -200.0)] {
			bg.set_parallax(offset);
			assert!((bg.parallax_translation() - expected).abs() < 1e-9);
		}
	}

	#[test]
	fn draw_translates_then_blits() {
		let mut bg = layer(Some((500.0, 1000.0)), 0.1);
		bg.update_size(1000.0, 1000.0);
		bg.set_parallax(1.0);
		let mut surface = FakeSurface::new();
		{
			let mut canvas = LockedCanvas::lock(&mut surface).unwrap();
			bg.draw(&mut *canvas).unwrap();
		}
		assert_eq!(
			surface.log().commands,
			vec![
				DrawCommand::Save,
				DrawCommand::Translate(-100.0, 0.0),
				DrawCommand::Image {
					x: 0.0,
					y: -500.0,
					width: 1000.0,
					height: 2000.0,
				},
				DrawCommand::Restore,
			]
		);
	}

	#[test]
	fn degraded_layer_draws_nothing() {
		let mut bg: BackgroundLayer<FakeImage> =
			BackgroundLayer::new(None, &Theme::ethereal().background);
		bg.update_size(1000.0, 1000.0);
		assert!(bg.is_degraded());
		let mut surface = FakeSurface::new();
		{
			let mut canvas = LockedCanvas::lock(&mut surface).unwrap();
			bg.draw(&mut *canvas).unwrap();
		}
		assert!(surface.log().commands.is_empty());
	}

	#[test]
	fn undecoded_image_waits_for_size() {
		let mut bg = layer(None, 0.1);
		bg.update_size(1000.0, 1000.0);
		assert!(bg.fit().is_none());
		bg.image = Some(FakeImage {
			size: Some((10.0, 10.0)),
		});
		let mut surface = FakeSurface::new();
		{
			let mut canvas = LockedCanvas::lock(&mut surface).unwrap();
			bg.draw(&mut *canvas).unwrap();
		}
		assert_eq!(bg.fit().map(|f| f.scale), Some(100.0));
	}
}
