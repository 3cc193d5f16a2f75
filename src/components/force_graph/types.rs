//! Canonical graph data consumed by the simulation and renderer.

use serde::{Deserialize, Serialize};

/// A 2D point. Used for both screen-space and graph-space coordinates; which
/// one is meant is always stated by the function taking it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A keyword node in the mind map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique identifier within one graph.
	pub id: String,
	/// Display text.
	pub keyword: String,
	/// Backing page reference, if the backend supplied one.
	#[serde(default)]
	pub page_id: Option<String>,
	/// Connected-component index, used for cluster coloring.
	#[serde(default)]
	pub group: usize,
	#[serde(default)]
	pub x: f64,
	#[serde(default)]
	pub y: f64,
	#[serde(default)]
	pub vx: f64,
	#[serde(default)]
	pub vy: f64,
	/// Set while the node is dragged. Overrides physics for this axis.
	#[serde(default)]
	pub pinned_x: Option<f64>,
	#[serde(default)]
	pub pinned_y: Option<f64>,
}

impl Node {
	pub fn new(id: impl Into<String>, keyword: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			keyword: keyword.into(),
			page_id: None,
			group: 0,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			pinned_x: None,
			pinned_y: None,
		}
	}

	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	pub fn is_pinned(&self) -> bool {
		self.pinned_x.is_some() || self.pinned_y.is_some()
	}
}

/// An undirected link between two node ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	pub source_id: String,
	pub target_id: String,
}

impl Edge {
	pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
		Self {
			source_id: source_id.into(),
			target_id: target_id.into(),
		}
	}
}

/// Complete graph data: nodes and the edges between them.
///
/// Produced by [`super::adapter`], which guarantees unique node ids and that
/// every edge references existing nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Axis-aligned bounding box in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min: Point,
	pub max: Point,
}

impl Bounds {
	/// Bounding box of a set of points, `None` when empty.
	pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
		let mut iter = points.into_iter();
		let first = iter.next()?;
		Some(iter.fold(
			Bounds {
				min: first,
				max: first,
			},
			|b, p| Bounds {
				min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
				max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
			},
		))
	}

	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}

	pub fn center(&self) -> Point {
		Point::new(
			(self.min.x + self.max.x) / 2.0,
			(self.min.y + self.max.y) / 2.0,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bounds_of_empty_set_is_none() {
		assert!(Bounds::from_points(std::iter::empty()).is_none());
	}

	#[test]
	fn bounds_cover_all_points() {
		let b = Bounds::from_points([
			Point::new(10.0, -5.0),
			Point::new(-20.0, 40.0),
			Point::new(3.0, 3.0),
		])
		.unwrap();
		assert_eq!(b.min, Point::new(-20.0, -5.0));
		assert_eq!(b.max, Point::new(10.0, 40.0));
		assert_eq!(b.center(), Point::new(-5.0, 17.5));
		assert_eq!(b.width(), 30.0);
		assert_eq!(b.height(), 45.0);
	}
}
