//! Pooled burst particles spawned under the pointer.
//!
//! The pool is allocated once. `ignite` recycles inactive slots first and,
//! when the pool runs dry, overwrites randomly chosen active ones so a burst
//! is never dropped.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use super::error::DrawError;
use super::particle::{Particle, uniform};
use super::surface::Canvas;
use super::theme::{BurstStyle, EdgePolicy};

/// Remaining-life fraction below which particles start to shrink.
const SHRINK_THRESHOLD: f64 = 0.3;

/// Trail opacity relative to the particle head.
const TRAIL_ALPHA: f64 = 0.4;

/// Fixed-capacity pool of burst particles.
pub struct BurstLayer {
	style: BurstStyle,
	particles: Vec<Particle>,
	offset: f64,
	width: f64,
	rng: SmallRng,
}

impl BurstLayer {
	/// Allocates the pool, seeding the rng from OS entropy.
	pub fn new(style: BurstStyle) -> Self {
		Self::with_rng(style, SmallRng::from_entropy())
	}

	/// Allocates the pool with a caller-provided rng.
	pub fn with_rng(style: BurstStyle, rng: SmallRng) -> Self {
		let particles = (0..style.pool_size).map(|_| Particle::default()).collect();
		Self {
			style,
			particles,
			offset: 0.0,
			width: 0.0,
			rng,
		}
	}

	/// All slots, active or not.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Number of slots in the pool.
	pub fn capacity(&self) -> usize {
		self.particles.len()
	}

	/// Number of slots currently alive.
	pub fn active_count(&self) -> usize {
		self.particles.iter().filter(|p| p.is_active()).count()
	}

	/// The style this layer was built from.
	pub fn style(&self) -> &BurstStyle {
		&self.style
	}

	/// Spawns one burst of `burst_count` particles at `(x, y)`.
	///
	/// Every spawn lands in a distinct slot as long as the burst fits in the
	/// pool. A burst larger than the pool overwrites its own particles.
	pub fn ignite(&mut self, x: f64, y: f64) {
		if self.particles.is_empty() {
			return;
		}

		let mut spawned = 0;
		let mut untouched = Vec::new();
		for idx in 0..self.particles.len() {
			if spawned < self.style.burst_count && !self.particles[idx].is_active() {
				self.spawn(idx, x, y);
				spawned += 1;
			} else {
				untouched.push(idx);
			}
		}
		if spawned == self.style.burst_count {
			return;
		}

		// Pool exhausted: steal live slots this burst has not claimed yet.
		let steal = (self.style.burst_count - spawned).min(untouched.len());
		for pick in index::sample(&mut self.rng, untouched.len(), steal) {
			self.spawn(untouched[pick], x, y);
			spawned += 1;
		}

		while spawned < self.style.burst_count {
			let idx = self.rng.gen_range(0..self.particles.len());
			self.spawn(idx, x, y);
			spawned += 1;
		}
	}

	fn spawn(&mut self, idx: usize, x: f64, y: f64) {
		let style = &self.style;
		let angle = self.rng.gen_range(0.0..TAU);
		let speed = uniform(&mut self.rng, style.speed_min, style.speed_max);
		let color = style.palette.pick(self.rng.r#gen::<f64>());
		let size = uniform(&mut self.rng, style.size_min, style.size_max);
		let life = uniform(&mut self.rng, style.life_min, style.life_max);

		self.particles[idx].reset(
			x,
			y,
			angle.cos() * speed,
			angle.sin() * speed,
			color,
			life,
			size,
		);
	}

	/// Advances every active particle by one tick.
	pub fn update(&mut self, width: f64, height: f64) {
		self.width = width;
		let style = &self.style;
		for p in self.particles.iter_mut().filter(|p| p.is_active()) {
			p.integrate();

			p.dx *= style.drag;
			p.dy *= style.drag;
			p.dy += style.gravity;

			match style.edge {
				EdgePolicy::Deactivate { margin } => {
					if p.x < -margin
						|| p.x > width + margin
						|| p.y < -margin
						|| p.y > height + margin
					{
						p.deactivate();
					}
				}
				EdgePolicy::Bounce => {
					let mut bounced = false;
					if p.x <= 0.0 || p.x >= width {
						p.dx = -p.dx;
						p.x = p.x.clamp(0.0, width);
						bounced = true;
					}
					if p.y <= 0.0 || p.y >= height {
						p.dy = -p.dy;
						p.y = p.y.clamp(0.0, height);
						bounced = true;
					}
					if bounced && !style.palette.is_glow(p.color) {
						let pick = self.rng.gen_range(0..style.palette.common.len().max(1));
						p.color = style.palette.common_color(pick);
					}
				}
			}

			if p.is_active() {
				p.age(style.decay);
			}
		}
	}

	/// Stores the normalized page offset in `[0, 1]`.
	pub fn set_parallax(&mut self, offset: f64) {
		self.offset = offset;
	}

	/// Horizontal shift applied when drawing.
	pub fn parallax_translation(&self) -> f64 {
		-self.offset * self.width * self.style.parallax
	}

	/// Draws every active particle and, when enabled, its trail.
	pub fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<(), DrawError> {
		canvas.with_translation(self.parallax_translation(), 0.0, |canvas| {
			for p in self.particles.iter().filter(|p| p.is_active()) {
				let alpha = p.life.clamp(0.0, 1.0);

				if self.style.trail && p.trail().len() > 1 {
					let mut points: Vec<(f64, f64)> = p.trail().points().collect();
					points.push((p.x, p.y));
					canvas.stroke_polyline(
						&points,
						p.size * 0.5,
						p.color.with_alpha(alpha * TRAIL_ALPHA),
						false,
					)?;
				}

				canvas.fill_circle(p.x, p.y, disc_radius(p.size, p.life), p.color.with_alpha(alpha))?;
			}
			Ok(())
		})
	}
}

/// Disc radius for a particle: half its stroke size (at least one unit),
/// shrinking linearly to zero over the last part of its life.
pub fn disc_radius(size: f64, life: f64) -> f64 {
	let base = (size * 0.5).max(1.0);
	if life < SHRINK_THRESHOLD {
		base * (life.max(0.0) / SHRINK_THRESHOLD)
	} else {
		base
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::wallpaper::testing::FakeSurface;
	use crate::components::wallpaper::surface::LockedCanvas;
	use crate::components::wallpaper::theme::Theme;

	fn layer(pool_size: usize, burst_count: usize) -> BurstLayer {
		let style = BurstStyle {
			pool_size,
			burst_count,
			..Theme::ethereal().burst
		};
		BurstLayer::with_rng(style, SmallRng::seed_from_u64(7))
	}

	#[test]
	fn ignite_on_idle_pool_spawns_exact_burst() {
		let mut burst = layer(50, 40);
		burst.ignite(100.0, 200.0);
		assert_eq!(burst.active_count(), 40);
		for p in burst.particles().iter().filter(|p| p.is_active()) {
			assert!(p.life > 0.0);
			assert_eq!((p.x, p.y), (100.0, 200.0));
		}
	}

	#[test]
	fn ignite_overwrites_when_saturated() {
		let mut burst = layer(50, 40);
		burst.ignite(0.0, 0.0);
		burst.ignite(10.0, 10.0);
		assert_eq!(burst.active_count(), 50);
		// 10 free slots plus 30 stolen ones got the new origin
		let at_new = burst
			.particles()
			.iter()
			.filter(|p| (p.x, p.y) == (10.0, 10.0))
			.count();
		assert_eq!(at_new, 40);
	}

	#[test]
	fn saturated_ignite_claims_distinct_slots() {
		for seed in 0..200 {
			let style = BurstStyle {
				pool_size: 500,
				burst_count: 15,
				..Theme::ethereal().burst
			};
			let mut burst = BurstLayer::with_rng(style, SmallRng::seed_from_u64(seed));
			for i in 0..40 {
				burst.ignite(i as f64, 0.0);
			}
			assert_eq!(burst.active_count(), 500);
			burst.ignite(-7.0, -7.0);
			let at_new = burst
				.particles()
				.iter()
				.filter(|p| (p.x, p.y) == (-7.0, -7.0))
				.count();
			assert_eq!(at_new, 15, "seed {seed}");
		}
	}

	#[test]
	fn burst_larger_than_pool_fills_it() {
		let mut burst = layer(10, 25);
		burst.ignite(3.0, 4.0);
		assert_eq!(burst.active_count(), 10);
		assert!(burst.particles().iter().all(|p| (p.x, p.y) == (3.0, 4.0)));
	}

	#[test]
	fn ignite_on_empty_pool_is_noop() {
		let mut burst = layer(0, 40);
		burst.ignite(1.0, 1.0);
		assert_eq!(burst.active_count(), 0);
	}

	#[test]
	fn spawned_velocities_respect_speed_range() {
		let mut burst = layer(100, 100);
		burst.ignite(0.0, 0.0);
		let style = burst.style().clone();
		for p in burst.particles() {
			let speed = (p.dx * p.dx + p.dy * p.dy).sqrt();
			assert!(speed >= style.speed_min - 1e-9 && speed < style.speed_max + 1e-9);
			assert!(p.size >= style.size_min && p.size < style.size_max);
			assert!(p.life >= style.life_min && p.life < style.life_max);
		}
	}

	#[test]
	fn update_applies_drag_and_buoyancy() {
		let mut burst = layer(1, 1);
		burst.ignite(500.0, 500.0);
		let before = burst.particles()[0].clone();
		burst.update(1000.0, 1000.0);
		let after = &burst.particles()[0];
		assert_eq!(after.x, before.x + before.dx);
		assert!((after.dx - before.dx * 0.95).abs() < 1e-12);
		assert!((after.dy - (before.dy * 0.95 - 0.05)).abs() < 1e-12);
		assert!((after.life - (before.life - 0.015)).abs() < 1e-12);
	}

	#[test]
	fn particles_leaving_margin_deactivate() {
		let mut burst = layer(1, 1);
		burst.ignite(-49.0, 10.0);
		burst.particles[0].dx = -5.0;
		burst.particles[0].dy = 0.0;
		burst.update(100.0, 100.0);
		assert!(!burst.particles()[0].is_active());
	}

	#[test]
	fn bounce_reflects_and_recolors() {
		let style = BurstStyle {
			pool_size: 1,
			burst_count: 1,
			..Theme::igniter().burst
		};
		let mut burst = BurstLayer::with_rng(style, SmallRng::seed_from_u64(3));
		burst.ignite(5.0, 50.0);
		let common = burst.style().palette.common[0].color;
		let p = &mut burst.particles[0];
		p.dx = -20.0;
		p.dy = 0.0;
		p.color = common;
		burst.update(100.0, 100.0);
		let p = &burst.particles()[0];
		assert!(p.dx > 0.0);
		assert_eq!(p.x, 0.0);
		assert!(!burst.style().palette.is_glow(p.color));
	}

	#[test]
	fn disc_shrinks_in_final_stretch() {
		assert_eq!(disc_radius(8.0, 1.0), 4.0);
		assert_eq!(disc_radius(8.0, 0.3), 4.0);
		assert!((disc_radius(8.0, 0.15) - 2.0).abs() < 1e-12);
		assert_eq!(disc_radius(8.0, 0.0), 0.0);
		assert_eq!(disc_radius(0.5, 1.0), 1.0);
	}

	#[test]
	fn draw_renders_only_active_particles() {
		let mut burst = layer(50, 5);
		burst.ignite(10.0, 10.0);
		let mut surface = FakeSurface::new();
		{
			let mut canvas = LockedCanvas::lock(&mut surface).unwrap();
			burst.draw(&mut *canvas).unwrap();
		}
		assert_eq!(surface.log().circles(), 5);
	}

	#[test]
	fn trail_drawn_when_enabled() {
		let style = BurstStyle {
			pool_size: 3,
			burst_count: 1,
			..Theme::igniter().burst
		};
		let mut burst = BurstLayer::with_rng(style, SmallRng::seed_from_u64(1));
		burst.ignite(50.0, 50.0);
		burst.update(1000.0, 1000.0);
		burst.update(1000.0, 1000.0);
		let mut surface = FakeSurface::new();
		{
			let mut canvas = LockedCanvas::lock(&mut surface).unwrap();
			burst.draw(&mut *canvas).unwrap();
		}
		let log = surface.log();
		assert!(log.commands.iter().any(|c| matches!(
			c,
			crate::components::wallpaper::testing::DrawCommand::Polyline { points: 3, .. }
		)));
	}
}
