//! Auto-fit: choose a transform that frames the whole graph.

use serde::Deserialize;

use super::types::{Bounds, Point};
use super::viewport::{MAX_ZOOM, MIN_ZOOM, ViewportState};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FitConfig {
	/// Graph-space margin added on every side of the node bounding box.
	pub padding: f64,
	/// Share of the viewport the padded box may occupy.
	pub fill: f64,
}

impl Default for FitConfig {
	fn default() -> Self {
		Self {
			padding: 100.0,
			fill: 0.85,
		}
	}
}

/// Compute the transform that centers `bounds` in a `width` x `height`
/// viewport and scales it to fit.
///
/// The size must be the live pixel size of the host surface at call time.
/// With fewer than two nodes, or a viewport with no area, the current zoom is
/// kept and the content (or the origin when there is none) is centered.
pub fn auto_fit(
	bounds: Option<Bounds>,
	node_count: usize,
	width: f64,
	height: f64,
	current: ViewportState,
	config: &FitConfig,
) -> ViewportState {
	let zoom = match bounds {
		Some(b) if node_count >= 2 && width > 0.0 && height > 0.0 => {
			let box_w = b.width() + config.padding * 2.0;
			let box_h = b.height() + config.padding * 2.0;
			let scale_x = width * config.fill / box_w;
			let scale_y = height * config.fill / box_h;
			let zoom = scale_x.min(scale_y);
			if zoom.is_finite() && zoom > 0.0 {
				zoom.clamp(MIN_ZOOM, MAX_ZOOM)
			} else {
				current.zoom
			}
		}
		_ => current.zoom,
	};

	center(bounds, width, height, ViewportState { zoom, ..current })
}

/// Place the middle of `bounds` (the origin when there is none) at the middle
/// of a `width` x `height` viewport, keeping the current zoom.
pub fn center(
	bounds: Option<Bounds>,
	width: f64,
	height: f64,
	current: ViewportState,
) -> ViewportState {
	let target = bounds.map(|b| b.center()).unwrap_or(Point::ORIGIN);
	ViewportState {
		zoom: current.zoom,
		pan_x: width / 2.0 - target.x * current.zoom,
		pan_y: height / 2.0 - target.y * current.zoom,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn square(min: f64, max: f64) -> Option<Bounds> {
		Bounds::from_points([Point::new(min, min), Point::new(max, max)])
	}

	#[test]
	fn frames_box_in_viewport() {
		let fitted = auto_fit(
			square(0.0, 100.0),
			4,
			1000.0,
			800.0,
			ViewportState::default(),
			&FitConfig::default(),
		);

		assert!(fitted.zoom <= 1000.0 * 0.85 / 300.0);
		assert!((fitted.zoom - 800.0 * 0.85 / 300.0).abs() < 1e-9);

		let center = fitted.to_screen_space(Point::new(50.0, 50.0));
		assert!((center.x - 500.0).abs() < 1e-9);
		assert!((center.y - 400.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_never_exceeds_max_for_tiny_graphs() {
		let fitted = auto_fit(
			square(0.0, 1.0),
			2,
			4000.0,
			4000.0,
			ViewportState::default(),
			&FitConfig {
				padding: 0.0,
				fill: 0.85,
			},
		);
		assert_eq!(fitted.zoom, MAX_ZOOM);
	}

	#[test]
	fn huge_graphs_stop_at_min_zoom_and_stay_centered() {
		let fitted = auto_fit(
			square(-10_000.0, 10_000.0),
			50,
			800.0,
			600.0,
			ViewportState::default(),
			&FitConfig::default(),
		);
		assert_eq!(fitted.zoom, MIN_ZOOM);
		assert_eq!(fitted.to_screen_space(Point::ORIGIN), Point::new(400.0, 300.0));
	}

	#[test]
	fn single_node_is_centered_at_current_zoom() {
		let current = ViewportState {
			zoom: 1.7,
			pan_x: 3.0,
			pan_y: 9.0,
		};
		let bounds = Bounds::from_points([Point::new(30.0, -40.0)]);
		let fitted = auto_fit(bounds, 1, 600.0, 400.0, current, &FitConfig::default());

		assert_eq!(fitted.zoom, 1.7);
		let at = fitted.to_screen_space(Point::new(30.0, -40.0));
		assert!((at.x - 300.0).abs() < 1e-9 && (at.y - 200.0).abs() < 1e-9);
	}

	#[test]
	fn center_keeps_zoom() {
		let current = ViewportState {
			zoom: 2.5,
			pan_x: -40.0,
			pan_y: 7.0,
		};
		let centered = center(square(0.0, 100.0), 800.0, 600.0, current);
		assert_eq!(centered.zoom, 2.5);
		assert_eq!(centered.to_screen_space(Point::new(50.0, 50.0)), Point::new(400.0, 300.0));
	}

	#[test]
	fn empty_graph_centers_origin() {
		let fitted = auto_fit(
			None,
			0,
			600.0,
			400.0,
			ViewportState::default(),
			&FitConfig::default(),
		);
		assert_eq!(fitted.zoom, 1.0);
		assert_eq!((fitted.pan_x, fitted.pan_y), (300.0, 200.0));
	}

	#[test]
	fn zero_sized_viewport_keeps_zoom() {
		let fitted = auto_fit(
			square(0.0, 100.0),
			3,
			0.0,
			0.0,
			ViewportState::default(),
			&FitConfig::default(),
		);
		assert_eq!(fitted.zoom, 1.0);
		assert!(fitted.pan_x.is_finite() && fitted.pan_y.is_finite());
	}

	#[test]
	fn coincident_nodes_do_not_divide_by_zero() {
		let fitted = auto_fit(
			square(5.0, 5.0),
			3,
			1000.0,
			800.0,
			ViewportState::default(),
			&FitConfig {
				padding: 0.0,
				fill: 0.85,
			},
		);
		assert_eq!(fitted.zoom, 1.0);
		assert!(fitted.pan_x.is_finite());
	}
}
