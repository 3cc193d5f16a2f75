//! Visual theming for the mind map.
//!
//! Provides colors, the cluster palette and per-element style configuration.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Cluster colors, indexed by node group.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Saturated primaries on a light background (default)
	pub fn mindmap() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x2e, 0x75, 0xcc), // Blue
				Color::rgb(0x4c, 0xaf, 0x50), // Green
				Color::rgb(0xff, 0x98, 0x00), // Orange
				Color::rgb(0x9c, 0x27, 0xb0), // Purple
				Color::rgb(0xf4, 0x43, 0x36), // Red
			],
		}
	}

	/// Muted slate blues and teals for dark backgrounds
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(128, 128, 128);
		}
		self.colors[index % self.colors.len()]
	}
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	/// Line width in screen pixels.
	pub width: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have a soft inner gradient
	pub use_gradient: bool,
	/// Border/stroke width in screen pixels (0 = no border)
	pub border_width: f64,
	pub border_color: Color,
	/// Ring drawn around a node while it is being dragged
	pub pinned_ring: Color,
}

/// Keyword label style.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	/// Font size in screen pixels.
	pub size: f64,
	/// Labels are hidden below this zoom to avoid clutter.
	pub min_zoom: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub label: LabelStyle,
	/// Color of the "no data" message.
	pub empty_text: Color,
	pub palette: NodePalette,
}

impl Theme {
	/// Light theme matching the surrounding application (default)
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(0xfb, 0xfb, 0xfa),
			edge: EdgeStyle {
				color: Color::rgb(0xe1, 0xe5, 0xe9),
				width: 2.0,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 1.5,
				border_color: Color::rgb(255, 255, 255),
				pinned_ring: Color::rgba(46, 117, 204, 0.6),
			},
			label: LabelStyle {
				color: Color::rgb(0x37, 0x35, 0x2f),
				size: 12.0,
				min_zoom: 0.45,
			},
			empty_text: Color::rgb(0x9b, 0x9a, 0x97),
			palette: NodePalette::mindmap(),
		}
	}

	/// Dark theme with muted colors
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: Color::rgb(18, 20, 28),
			edge: EdgeStyle {
				color: Color::rgba(100, 120, 150, 0.45),
				width: 1.5,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				pinned_ring: Color::rgba(255, 255, 255, 0.6),
			},
			label: LabelStyle {
				color: Color::rgba(255, 255, 255, 0.85),
				size: 11.0,
				min_zoom: 0.45,
			},
			empty_text: Color::rgba(255, 255, 255, 0.5),
			palette: NodePalette::slate(),
		}
	}

	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"light" => Some(Self::light()),
			"midnight" => Some(Self::midnight()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
