//! Ambient fog puffs drifting across the sky.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::error::DrawError;
use super::particle::uniform;
use super::surface::Canvas;
use super::theme::FogStyle;
use super::types::Pointer;

/// A single fog puff.
#[derive(Clone, Debug, Default)]
pub struct FogParticle {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity from pointer pushes, decays every tick.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Constant rightward drift per tick
	pub speed: f64,
	/// Depth scale (larger = nearer, faster)
	pub scale: f64,
	/// Sprite opacity.
	pub alpha: f64,
}

/// Manages the fog puffs.
pub struct FogLayer {
	style: FogStyle,
	particles: Vec<FogParticle>,
	offset: f64,
	width: f64,
	rng: SmallRng,
}

impl FogLayer {
	/// Creates the pool, seeding the rng from OS entropy.
	pub fn new(style: FogStyle) -> Self {
		Self::with_rng(style, SmallRng::from_entropy())
	}

	/// Creates the pool with a caller-provided rng.
	pub fn with_rng(style: FogStyle, rng: SmallRng) -> Self {
		let mut layer = Self {
			particles: vec![FogParticle::default(); style.count],
			style,
			offset: 0.0,
			width: 0.0,
			rng,
		};
		layer.update_size(0.0, 0.0);
		layer
	}

	/// All puffs.
	pub fn particles(&self) -> &[FogParticle] {
		&self.particles
	}

	/// The style this layer was built from.
	pub fn style(&self) -> &FogStyle {
		&self.style
	}

	/// Off-screen distance a puff of `scale` travels before wrapping.
	pub fn margin(&self, scale: f64) -> f64 {
		self.style.margin_per_scale * scale
	}

	/// Scatters every puff across the new viewport with fresh depth and opacity.
	pub fn update_size(&mut self, width: f64, height: f64) {
		self.width = width;
		let style = &self.style;
		for p in &mut self.particles {
			let depth = self.rng.r#gen::<f64>();
			let jitter = self.rng.r#gen::<f64>();
			p.x = uniform(&mut self.rng, 0.0, width);
			p.y = uniform(&mut self.rng, 0.0, height);
			p.vx = 0.0;
			p.vy = 0.0;
			p.scale = lerp(style.scale_min, style.scale_max, depth);
			p.speed = lerp(style.speed_min, style.speed_max, depth);
			p.alpha = lerp(style.alpha_min, style.alpha_max, (depth + jitter) * 0.5);
		}
	}

	/// Advances every puff by one tick.
	pub fn update(&mut self, width: f64, height: f64, pointer: Pointer) {
		self.width = width;
		let style = &self.style;
		for p in &mut self.particles {
			p.x += p.speed + p.vx;
			p.y += p.vy;

			if pointer.active {
				if let Some((fx, fy)) = repulsion(
					p.x - pointer.x,
					p.y - pointer.y,
					style.repulsion_radius,
					style.repulsion_strength,
				) {
					p.vx += fx;
					p.vy += fy;
				}
			}

			p.vx *= style.damping;
			p.vy *= style.damping;

			let margin = style.margin_per_scale * p.scale;
			if p.x > width + margin {
				p.x = -margin;
				p.y = uniform(&mut self.rng, 0.0, height);
				p.vx = 0.0;
				p.vy = 0.0;
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

	/// Draws every puff as a soft glow.
	pub fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<(), DrawError> {
		canvas.with_translation(self.parallax_translation(), 0.0, |canvas| {
			for p in &self.particles {
				canvas.draw_glow(
					p.x,
					p.y,
					self.style.sprite_radius * p.scale,
					self.style.color.with_alpha(p.alpha),
				)?;
			}
			Ok(())
		})
	}
}

/// Push applied to a puff displaced `(dx, dy)` from the pointer.
///
/// Magnitude falls off linearly from `strength` at the pointer to zero at
/// `radius`, directed away from the pointer. `None` outside the radius. A puff
/// sitting exactly on the pointer is pushed along +x.
pub fn repulsion(dx: f64, dy: f64, radius: f64, strength: f64) -> Option<(f64, f64)> {
	let dist = (dx * dx + dy * dy).sqrt();
	if dist >= radius {
		return None;
	}
	let force = (1.0 - dist / radius) * strength;
	if dist < f64::EPSILON {
		return Some((force, 0.0));
	}
	Some((dx / dist * force, dy / dist * force))
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::wallpaper::theme::Theme;

	fn layer() -> FogLayer {
		FogLayer::with_rng(Theme::ethereal().fog, SmallRng::seed_from_u64(11))
	}

	#[test]
	fn scatter_stays_in_viewport() {
		let mut fog = layer();
		fog.update_size(800.0, 600.0);
		let style = fog.style().clone();
		assert_eq!(fog.particles().len(), 12);
		for p in fog.particles() {
			assert!((0.0..800.0).contains(&p.x));
			assert!((0.0..600.0).contains(&p.y));
			assert!(p.scale >= style.scale_min && p.scale <= style.scale_max);
			assert!(p.alpha >= style.alpha_min && p.alpha <= style.alpha_max);
			assert_eq!((p.vx, p.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn nearer_puffs_drift_faster() {
		let mut fog = layer();
		fog.update_size(800.0, 600.0);
		let mut puffs = fog.particles().to_vec();
		puffs.sort_by(|a, b| a.scale.total_cmp(&b.scale));
		assert!(puffs.windows(2).all(|w| w[0].speed <= w[1].speed));
	}

	#[test]
	fn drift_without_pointer() {
		let mut fog = layer();
		fog.update_size(800.0, 600.0);
		let before = fog.particles()[0].clone();
		fog.update(800.0, 600.0, Pointer::default());
		let after = &fog.particles()[0];
		assert_eq!(after.x, before.x + before.speed);
		assert_eq!(after.y, before.y);
	}

	#[test]
	fn wraps_past_right_margin() {
		let mut fog = layer();
		fog.update_size(800.0, 600.0);
		let margin = fog.margin(fog.particles[0].scale);
		let p = &mut fog.particles[0];
		p.x = 800.0 + margin - p.speed + 0.5;
		p.vx = 3.0;
		p.vy = 1.0;
		fog.update(800.0, 600.0, Pointer::default());
		let p = &fog.particles()[0];
		assert_eq!(p.x, -margin);
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
		assert!((0.0..600.0).contains(&p.y));
	}

	#[test]
	fn does_not_wrap_inside_margin() {
		let mut fog = layer();
		fog.update_size(800.0, 600.0);
		let margin = fog.margin(fog.particles[0].scale);
		let p = &mut fog.particles[0];
		p.vx = 0.0;
		p.x = 800.0 + margin - p.speed - 0.5;
		fog.update(800.0, 600.0, Pointer::default());
		assert!(fog.particles()[0].x > 0.0);
	}

	#[test]
	fn pointer_pushes_puff_away() {
		let mut fog = layer();
		fog.update_size(800.0, 600.0);
		let p = &mut fog.particles[0];
		p.x = 400.0;
		p.y = 300.0;
		let pointer = Pointer {
			x: 350.0,
			y: 300.0,
			active: true,
		};
		fog.update(800.0, 600.0, pointer);
		assert!(fog.particles()[0].vx > 0.0);
		assert!(fog.particles()[0].vy.abs() < 1e-12);
	}

	#[test]
	fn repulsion_falls_off_linearly() {
		assert_eq!(repulsion(300.0, 0.0, 300.0, 1.0), None);
		assert_eq!(repulsion(0.0, 150.0, 300.0, 2.0), Some((0.0, 1.0)));
		assert_eq!(repulsion(0.0, 0.0, 300.0, 2.0), Some((2.0, 0.0)));
		let (fx, fy) = repulsion(-30.0, -40.0, 100.0, 1.0).unwrap();
		assert!((fx - -0.3).abs() < 1e-12 && (fy - -0.4).abs() < 1e-12);
	}

	#[test]
	fn damping_applies_without_pointer() {
		let mut fog = layer();
		fog.update_size(800.0, 600.0);
		fog.particles[0].x = 10.0;
		fog.particles[0].vx = 2.0;
		fog.update(800.0, 600.0, Pointer::default());
		assert!((fog.particles()[0].vx - 1.9).abs() < 1e-12);
	}
}
