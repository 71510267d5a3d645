//! Reusable burst particle record.

use rand::Rng;

use super::theme::Color;

/// Number of past positions kept for trail rendering.
pub const TRAIL_LEN: usize = 12;

/// Fixed-size ring of recent positions.
#[derive(Clone, Debug)]
pub struct Trail {
	xs: [f64; TRAIL_LEN],
	ys: [f64; TRAIL_LEN],
	head: usize,
	len: usize,
}

impl Trail {
	fn new() -> Self {
		Self {
			xs: [0.0; TRAIL_LEN],
			ys: [0.0; TRAIL_LEN],
			head: 0,
			len: 0,
		}
	}

	fn clear(&mut self, x: f64, y: f64) {
		self.xs = [x; TRAIL_LEN];
		self.ys = [y; TRAIL_LEN];
		self.head = 0;
		self.len = 0;
	}

	fn push(&mut self, x: f64, y: f64) {
		self.xs[self.head] = x;
		self.ys[self.head] = y;
		self.head = (self.head + 1) % TRAIL_LEN;
		if self.len < TRAIL_LEN {
			self.len += 1;
		}
	}

	/// Number of valid samples.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Whether no sample has been recorded since the last reset.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Valid samples, oldest first.
	pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
		let start = (self.head + TRAIL_LEN - self.len) % TRAIL_LEN;
		(0..self.len).map(move |i| {
			let idx = (start + i) % TRAIL_LEN;
			(self.xs[idx], self.ys[idx])
		})
	}
}

/// A single pooled particle.
///
/// Slots are allocated once with the pool and recycled forever. While
/// inactive, every field except `active` is stale.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub dx: f64,
	/// Vertical velocity.
	pub dy: f64,
	/// Base color; drawn with its alpha replaced by the remaining life.
	pub color: Color,
	/// Remaining life, starts near 1.0.
	pub life: f64,
	/// Stroke size, the disc diameter at full life.
	pub size: f64,
	active: bool,
	trail: Trail,
}

impl Default for Particle {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			dx: 0.0,
			dy: 0.0,
			color: Color::rgb(255, 255, 255),
			life: 0.0,
			size: 1.0,
			active: false,
			trail: Trail::new(),
		}
	}
}

impl Particle {
	/// Reactivates this slot.
	#[allow(clippy::too_many_arguments)]
	pub fn reset(&mut self, x: f64, y: f64, dx: f64, dy: f64, color: Color, life: f64, size: f64) {
		self.x = x;
		self.y = y;
		self.dx = dx;
		self.dy = dy;
		self.color = color;
		self.life = life;
		self.size = size;
		self.active = true;
		self.trail.clear(x, y);
	}

	/// Whether the slot takes part in update and draw.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Frees the slot for reuse.
	pub fn deactivate(&mut self) {
		self.active = false;
	}

	/// Records the current position, then moves by the velocity.
	pub fn integrate(&mut self) {
		self.trail.push(self.x, self.y);
		self.x += self.dx;
		self.y += self.dy;
	}

	/// Loses `decay` life; deactivates once life reaches zero.
	pub fn age(&mut self, decay: f64) {
		self.life -= decay;
		if self.life <= 0.0 {
			self.active = false;
		}
	}

	/// Recent positions, for trail rendering.
	pub fn trail(&self) -> &Trail {
		&self.trail
	}
}

/// Uniform sample in `[min, max)`, or `min` for an empty range.
pub(crate) fn uniform<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
	if max > min {
		rng.gen_range(min..max)
	} else {
		min
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reset_activates_and_seeds_trail() {
		let mut p = Particle::default();
		assert!(!p.is_active());
		p.reset(10.0, 20.0, 1.0, -1.0, Color::rgb(1, 1, 1), 1.0, 4.0);
		assert!(p.is_active());
		assert!(p.trail().is_empty());
		assert_eq!((p.x, p.y), (10.0, 20.0));
	}

	#[test]
	fn age_deactivates_at_zero() {
		let mut p = Particle::default();
		p.reset(0.0, 0.0, 0.0, 0.0, Color::rgb(1, 1, 1), 0.03, 1.0);
		p.age(0.01);
		p.age(0.01);
		assert!(p.is_active());
		p.age(0.01);
		p.age(0.01);
		assert!(!p.is_active());
	}

	#[test]
	fn trail_keeps_last_positions_oldest_first() {
		let mut p = Particle::default();
		p.reset(0.0, 0.0, 1.0, 0.0, Color::rgb(1, 1, 1), 1.0, 1.0);
		for _ in 0..TRAIL_LEN + 3 {
			p.integrate();
		}
		let xs: Vec<f64> = p.trail().points().map(|(x, _)| x).collect();
		assert_eq!(xs.len(), TRAIL_LEN);
		assert_eq!(xs.first(), Some(&3.0));
		assert_eq!(xs.last(), Some(&(TRAIL_LEN as f64 + 2.0)));
		assert!(xs.windows(2).all(|w| w[1] > w[0]));
	}

	#[test]
	fn uniform_handles_degenerate_range() {
		let mut rng = rand::thread_rng();
		assert_eq!(uniform(&mut rng, 2.0, 2.0), 2.0);
		let v = uniform(&mut rng, 1.0, 2.0);
		assert!((1.0..2.0).contains(&v));
	}
}
