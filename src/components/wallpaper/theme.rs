//! Visual theming for the wallpaper.
//!
//! Every tunable constant of every layer lives here, grouped per layer and
//! bundled into named presets. The layers never hard-code physics or colors.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Unpacks an Android-style `0xAARRGGBB` word.
	pub const fn argb(packed: u32) -> Self {
		Self {
			r: (packed >> 16) as u8,
			g: (packed >> 8) as u8,
			b: packed as u8,
			a: (packed >> 24) as f64 / 255.0,
		}
	}

	/// Same color with a different opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS `rgba(...)` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let color_str = color_str.trim();
		if !color_str.is_ascii() {
			return None;
		}
		if color_str.starts_with('#') && color_str.len() == 7 {
			let r = u8::from_str_radix(&color_str[1..3], 16).ok()?;
			let g = u8::from_str_radix(&color_str[3..5], 16).ok()?;
			let b = u8::from_str_radix(&color_str[5..7], 16).ok()?;
			Some(Color::rgb(r, g, b))
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.collect();
			let r = nums.first()?.trim().parse().ok()?;
			let g = nums.get(1)?.trim().parse().ok()?;
			let b = nums.get(2)?.trim().parse().ok()?;
			let a = match nums.get(3) {
				Some(s) => s.trim().parse().ok()?,
				None => 1.0,
			};
			Some(Color::rgba(r, g, b, a))
		} else {
			None
		}
	}
}

/// A palette entry with its relative draw weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swatch {
	/// Color drawn when this entry is picked.
	pub color: Color,
	/// Relative pick weight.
	pub weight: f64,
}

/// Weighted burst palette: one rare "glow" color plus a few common ones.
#[derive(Clone, Debug)]
pub struct WeightedPalette {
	/// Rare highlight color. `weight` is its probability in [0, 1].
	pub glow: Swatch,
	/// Common colors sharing the remaining probability by relative weight.
	pub common: Vec<Swatch>,
}

impl WeightedPalette {
	/// Picks a color for a uniform `roll` in [0, 1).
	pub fn pick(&self, roll: f64) -> Color {
		if roll < self.glow.weight || self.common.is_empty() {
			return self.glow.color;
		}
		let total: f64 = self.common.iter().map(|s| s.weight.max(0.0)).sum();
		if total <= 0.0 {
			return self.common[0].color;
		}
		// Rescale the roll into the common band.
		let band = (roll - self.glow.weight) / (1.0 - self.glow.weight).max(f64::EPSILON);
		let mut target = band.clamp(0.0, 1.0) * total;
		for swatch in &self.common {
			target -= swatch.weight.max(0.0);
			if target < 0.0 {
				return swatch.color;
			}
		}
		self.common[self.common.len() - 1].color
	}

	/// Whether `color` is the palette's glow color.
	pub fn is_glow(&self, color: Color) -> bool {
		self.glow.color == color
	}

	/// Uniform pick among the common colors, used when a particle gets recolored.
	pub fn common_color(&self, index: usize) -> Color {
		if self.common.is_empty() {
			return self.glow.color;
		}
		self.common[index % self.common.len()].color
	}
}

/// Background layer configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Asset identifier of the sky image.
	pub image: String,
	/// Horizontal parallax factor (0.1 - 0.3, slower than the foreground).
	pub parallax: f64,
}

/// Ambient fog configuration.
#[derive(Clone, Debug)]
pub struct FogStyle {
	/// Number of fog puffs
	pub count: usize,
	/// Depth scale for the farthest puff
	pub scale_min: f64,
	/// Depth scale for the nearest puff
	pub scale_max: f64,
	/// Drift speed of the farthest puff (units per tick)
	pub speed_min: f64,
	/// Drift speed of the nearest puff
	pub speed_max: f64,
	/// Lowest puff opacity
	pub alpha_min: f64,
	/// Highest puff opacity
	pub alpha_max: f64,
	/// Sprite radius at scale 1.0
	pub sprite_radius: f64,
	/// Off-screen margin per unit of scale before a puff wraps
	pub margin_per_scale: f64,
	/// Pointer interaction radius
	pub repulsion_radius: f64,
	/// Peak repulsion impulse, at zero distance
	pub repulsion_strength: f64,
	/// Per-tick velocity multiplier
	pub damping: f64,
	/// Horizontal parallax factor
	pub parallax: f64,
	/// Sprite core color
	pub color: Color,
}

/// What a burst particle does when it reaches the viewport boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePolicy {
	/// Deactivate once the particle is more than `margin` outside the viewport.
	Deactivate {
		/// Distance past the viewport edge.
		margin: f64,
	},
	/// Reflect off the viewport walls; non-glow particles change color on impact.
	Bounce,
}

/// Burst particle configuration.
#[derive(Clone, Debug)]
pub struct BurstStyle {
	/// Number of preallocated particle slots
	pub pool_size: usize,
	/// Particles spawned per ignite
	pub burst_count: usize,
	/// Slowest initial speed.
	pub speed_min: f64,
	/// Fastest initial speed.
	pub speed_max: f64,
	/// Minimum stroke size (disc diameter)
	pub size_min: f64,
	/// Maximum stroke size
	pub size_max: f64,
	/// Shortest initial life.
	pub life_min: f64,
	/// Longest initial life.
	pub life_max: f64,
	/// Lifetime lost per tick
	pub decay: f64,
	/// Per-tick velocity multiplier
	pub drag: f64,
	/// Added to the vertical velocity every tick (negative rises)
	pub gravity: f64,
	/// Behavior at the viewport edge.
	pub edge: EdgePolicy,
	/// Whether to draw the position history behind each particle
	pub trail: bool,
	/// Horizontal parallax factor (0.0 keeps bursts under the finger)
	pub parallax: f64,
	/// Spawn colors.
	pub palette: WeightedPalette,
}

/// Hexagon lattice overlay configuration.
#[derive(Clone, Debug)]
pub struct GridStyle {
	/// Whether the overlay is drawn
	pub enabled: bool,
	/// Hexagon circumradius
	pub radius: f64,
	/// Stroke color.
	pub color: Color,
	/// Stroke width.
	pub line_width: f64,
	/// Opacity at the bottom of the pulse
	pub alpha_min: f64,
	/// Opacity at the top of the pulse
	pub alpha_max: f64,
	/// Pulse period divisor in milliseconds (`sin(t / period)`)
	pub pulse_period_ms: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name, as accepted by `Theme::by_name`.
	pub name: &'static str,
	/// Fill painted before any layer, visible when the sky image is missing.
	pub clear_color: Color,
	/// Delay between frame ticks.
	pub frame_interval_ms: u32,
	/// Sky layer settings.
	pub background: BackgroundStyle,
	/// Fog layer settings.
	pub fog: FogStyle,
	/// Burst layer settings.
	pub burst: BurstStyle,
	/// Hex grid settings.
	pub grid: GridStyle,
}

impl Theme {
	/// Soft luminous dust over a misty sky (default)
	pub fn ethereal() -> Self {
		Self {
			name: "ethereal",
			clear_color: Color::rgb(12, 18, 32),
			frame_interval_ms: 16,
			background: BackgroundStyle {
				image: "ethereal_bg.png".to_string(),
				parallax: 0.1,
			},
			fog: FogStyle {
				count: 12,
				scale_min: 1.5,
				scale_max: 4.0,
				speed_min: 0.2,
				speed_max: 0.8,
				alpha_min: 10.0 / 255.0,
				alpha_max: 40.0 / 255.0,
				sprite_radius: 128.0,
				margin_per_scale: 200.0,
				repulsion_radius: 300.0,
				repulsion_strength: 0.6,
				damping: 0.95,
				parallax: 0.2,
				color: Color::rgb(255, 255, 255),
			},
			burst: BurstStyle {
				pool_size: 500,
				burst_count: 15,
				speed_min: 1.0,
				speed_max: 4.0,
				size_min: 2.0,
				size_max: 8.0,
				life_min: 0.8,
				life_max: 1.2,
				decay: 0.015,
				drag: 0.95,
				gravity: -0.05,
				edge: EdgePolicy::Deactivate { margin: 50.0 },
				trail: false,
				parallax: 0.0,
				palette: WeightedPalette {
					glow: Swatch {
						color: Color::argb(0xFFFF_FFFF), // Glowing white
						weight: 0.2,
					},
					common: vec![
						Swatch {
							color: Color::argb(0x9944_FFCC), // Deep aqua
							weight: 0.3,
						},
						Swatch {
							color: Color::argb(0xCC88_EEFF), // Pale cyan
							weight: 0.5,
						},
					],
				},
			},
			grid: GridStyle {
				enabled: false,
				radius: 150.0,
				color: Color::argb(0xFF00_E5FF),
				line_width: 2.0,
				alpha_min: 30.0 / 255.0,
				alpha_max: 100.0 / 255.0,
				pulse_period_ms: 1000.0,
			},
		}
	}

	/// Neon sparks ricocheting over a pulsing hex grid
	pub fn igniter() -> Self {
		let cyan = Color::argb(0xFF00_E5FF);
		let magenta = Color::argb(0xFFD5_00F9);
		Self {
			name: "igniter",
			clear_color: Color::rgb(0, 0, 0),
			frame_interval_ms: 16,
			background: BackgroundStyle {
				image: "igniter_bg.png".to_string(),
				parallax: 0.3,
			},
			fog: FogStyle {
				count: 6,
				alpha_min: 6.0 / 255.0,
				alpha_max: 20.0 / 255.0,
				color: Color::rgb(120, 220, 255),
				..Self::ethereal().fog
			},
			burst: BurstStyle {
				pool_size: 1000,
				burst_count: 50,
				speed_min: 15.0,
				speed_max: 30.0,
				size_min: 3.0,
				size_max: 12.0,
				life_min: 0.8,
				life_max: 1.0,
				decay: 0.005,
				drag: 0.96,
				gravity: 0.0,
				edge: EdgePolicy::Bounce,
				trail: true,
				parallax: 0.0,
				palette: WeightedPalette {
					glow: Swatch {
						color: Color::rgb(255, 255, 255),
						weight: 0.05,
					},
					common: vec![
						Swatch {
							color: cyan,
							weight: 1.0,
						},
						Swatch {
							color: magenta,
							weight: 1.0,
						},
					],
				},
			},
			grid: GridStyle {
				enabled: true,
				..Self::ethereal().grid
			},
		}
	}

	/// Looks up a preset by name.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"ethereal" => Some(Self::ethereal()),
			"igniter" => Some(Self::igniter()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::ethereal()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn argb_unpacks_channels() {
		let c = Color::argb(0xCC88_EEFF);
		assert_eq!((c.r, c.g, c.b), (0x88, 0xEE, 0xFF));
		assert!((c.a - 0.8).abs() < 1e-9);
	}

	#[test]
	fn parse_accepts_hex_and_functional() {
		assert_eq!(Color::parse("#ff0080"), Some(Color::rgb(255, 0, 128)));
		assert_eq!(
			Color::parse("rgba(1, 2, 3, 0.5)"),
			Some(Color::rgba(1, 2, 3, 0.5))
		);
		assert_eq!(Color::parse("rgb(1,2,3)"), Some(Color::rgb(1, 2, 3)));
		assert_eq!(Color::parse("teal"), None);
		assert_eq!(Color::parse("#aé123"), None);
		assert_eq!(Color::parse("rgb(1, 2, ३)"), None);
		assert_eq!(Color::parse("#zz0000"), None);
	}

	#[test]
	fn palette_glow_is_rare_band() {
		let palette = Theme::ethereal().burst.palette;
		assert_eq!(palette.pick(0.0), palette.glow.color);
		assert_eq!(palette.pick(0.19), palette.glow.color);
		// 0.2..0.5 is deep aqua, 0.5..1.0 pale cyan
		assert_eq!(palette.pick(0.3), palette.common[0].color);
		assert_eq!(palette.pick(0.6), palette.common[1].color);
		assert_eq!(palette.pick(0.999_999), palette.common[1].color);
	}

	#[test]
	fn palette_split_matches_weights() {
		let palette = Theme::igniter().burst.palette;
		// After the 5% glow band the two neon colors split evenly.
		assert_eq!(palette.pick(0.5), palette.common[0].color);
		assert_eq!(palette.pick(0.55), palette.common[1].color);
		assert!(palette.is_glow(Color::rgb(255, 255, 255)));
		assert!(!palette.is_glow(palette.common_color(3)));
	}

	#[test]
	fn presets_resolve_by_name() {
		assert_eq!(Theme::by_name("igniter").map(|t| t.name), Some("igniter"));
		assert_eq!(Theme::default().name, "ethereal");
		assert!(Theme::by_name("vaporwave").is_none());
		assert!(Theme::igniter().grid.enabled);
		assert!(!Theme::ethereal().grid.enabled);
	}
}
