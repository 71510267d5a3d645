//! Pulsing hexagon lattice overlay.

use std::f64::consts::PI;

use super::error::DrawError;
use super::surface::Canvas;
use super::theme::GridStyle;

/// Precomputed hexagon outlines covering the viewport.
pub struct HexGrid {
	style: GridStyle,
	cells: Vec<[(f64, f64); 6]>,
	cols: usize,
	rows: usize,
}

impl HexGrid {
	/// Empty lattice; call `update_size` before drawing.
	pub fn new(style: GridStyle) -> Self {
		Self {
			style,
			cells: Vec::new(),
			cols: 0,
			rows: 0,
		}
	}

	/// Number of hexagons.
	pub fn cell_count(&self) -> usize {
		self.cells.len()
	}

	/// Lattice size as `(columns, rows)`.
	pub fn dimensions(&self) -> (usize, usize) {
		(self.cols, self.rows)
	}

	/// Rebuilds the lattice to cover a `width` x `height` viewport.
	pub fn update_size(&mut self, width: f64, height: f64) {
		self.cells.clear();
		let radius = self.style.radius;
		if radius <= 0.0 {
			self.cols = 0;
			self.rows = 0;
			return;
		}

		// Flat-top hexagons: columns 1.5r apart, rows sqrt(3)r apart.
		let horiz = 1.5 * radius;
		let vert = 3f64.sqrt() * radius;
		self.cols = (width.max(0.0) / horiz) as usize + 2;
		self.rows = (height.max(0.0) / vert) as usize + 2;

		for row in 0..self.rows {
			for col in 0..self.cols {
				let cx = col as f64 * horiz;
				let cy = row as f64 * vert + if col % 2 == 1 { vert / 2.0 } else { 0.0 };
				self.cells.push(hexagon(cx, cy, radius));
			}
		}
	}

	/// Opacity at `time_ms`, oscillating between the style's bounds.
	pub fn pulse_alpha(&self, time_ms: f64) -> f64 {
		let pulse = ((time_ms / self.style.pulse_period_ms).sin() + 1.0) / 2.0;
		self.style.alpha_min + pulse * (self.style.alpha_max - self.style.alpha_min)
	}

	/// Strokes every hexagon with the pulse opacity at `time_ms`.
	pub fn draw<C: Canvas>(&self, canvas: &mut C, time_ms: f64) -> Result<(), DrawError> {
		let color = self.style.color.with_alpha(self.pulse_alpha(time_ms));
		for cell in &self.cells {
			canvas.stroke_polyline(cell, self.style.line_width, color, true)?;
		}
		Ok(())
	}
}

fn hexagon(cx: f64, cy: f64, radius: f64) -> [(f64, f64); 6] {
	std::array::from_fn(|i| {
		let angle = (60.0 * i as f64) * PI / 180.0;
		(cx + radius * angle.cos(), cy + radius * angle.sin())
	})
}
