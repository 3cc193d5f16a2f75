//! Pan and zoom transform between graph space and screen space.
//!
//! The mapping is `screen = pan + graph * zoom`. Zoom is always kept inside
//! [`MIN_ZOOM`, `MAX_ZOOM`].

use serde::{Deserialize, Serialize};

use super::types::Point;

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 3.0;
/// Wheel step when scrolling away from the user.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;
/// Wheel step when scrolling toward the user.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// The transform itself. Handed to renderers as-is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
	pub zoom: f64,
	pub pan_x: f64,
	pub pan_y: f64,
}

impl Default for ViewportState {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan_x: 0.0,
			pan_y: 0.0,
		}
	}
}

impl ViewportState {
	pub fn pan(&self) -> Point {
		Point::new(self.pan_x, self.pan_y)
	}

	pub fn to_graph_space(&self, screen: Point) -> Point {
		Point::new(
			(screen.x - self.pan_x) / self.zoom,
			(screen.y - self.pan_y) / self.zoom,
		)
	}

	pub fn to_screen_space(&self, graph: Point) -> Point {
		Point::new(
			self.pan_x + graph.x * self.zoom,
			self.pan_y + graph.y * self.zoom,
		)
	}

	/// The transform after multiplying zoom by `factor` about `screen`, which
	/// keeps the graph point under `screen` fixed. Non-finite or non-positive
	/// factors leave it unchanged.
	pub fn zoomed_at(&self, screen: Point, factor: f64) -> ViewportState {
		if !factor.is_finite() || factor <= 0.0 {
			return *self;
		}
		let anchor = self.to_graph_space(screen);
		let zoom = clamp_zoom(self.zoom * factor);
		ViewportState {
			zoom,
			pan_x: screen.x - anchor.x * zoom,
			pan_y: screen.y - anchor.y * zoom,
		}
	}
}

/// Owns the [`ViewportState`] and enforces its invariants.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
	state: ViewportState,
}

impl Viewport {
	pub fn new(zoom: f64, pan: Point) -> Self {
		let mut viewport = Self::default();
		viewport.set_transform(zoom, pan);
		viewport
	}

	pub fn state(&self) -> ViewportState {
		self.state
	}

	pub fn zoom(&self) -> f64 {
		self.state.zoom
	}

	pub fn pan(&self) -> Point {
		self.state.pan()
	}

	/// Multiply zoom by `factor` while keeping the graph point under `screen`
	/// fixed on screen. Non-finite or non-positive factors are ignored.
	pub fn zoom_at(&mut self, screen: Point, factor: f64) {
		self.state = self.state.zoomed_at(screen, factor);
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if dx.is_finite() && dy.is_finite() {
			self.state.pan_x += dx;
			self.state.pan_y += dy;
		}
	}

	/// Absolute set. Zoom is clamped into range.
	pub fn set_transform(&mut self, zoom: f64, pan: Point) {
		let zoom = if zoom.is_finite() { zoom } else { self.state.zoom };
		self.state = ViewportState {
			zoom: clamp_zoom(zoom),
			pan_x: pan.x,
			pan_y: pan.y,
		};
	}

	pub fn to_graph_space(&self, screen: Point) -> Point {
		self.state.to_graph_space(screen)
	}

	pub fn to_screen_space(&self, graph: Point) -> Point {
		self.state.to_screen_space(graph)
	}
}

pub fn clamp_zoom(zoom: f64) -> f64 {
	zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Wheel convention: scrolling down zooms out, anything else zooms in.
pub fn zoom_for_wheel(delta_y: f64) -> f64 {
	if delta_y > 0.0 {
		ZOOM_OUT_FACTOR
	} else {
		ZOOM_IN_FACTOR
	}
}
