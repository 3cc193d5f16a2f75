//! Graph view state: simulation, viewport and pointer gesture together.
//!
//! Wraps the layout engine with the view transform for pan/zoom and the
//! gesture state machine, and applies the actions produced by pointer
//! transitions. Hit testing lives here because it needs both the node
//! positions and the transform.

use log::debug;
use serde::Deserialize;

use super::fit::{FitConfig, auto_fit, center};
use super::interaction::{Action, InteractionState, PointerEvent, PointerTarget};
use super::simulation::{Simulation, SimulationConfig};
use super::types::{GraphData, Point};
use super::viewport::Viewport;

/// Everything configurable about a mounted graph view.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub simulation: SimulationConfig,
	pub fit: FitConfig,
	/// Node circle radius in graph units. Also the hit-test radius.
	pub node_radius: f64,
	/// Alpha bump applied when the host surface is resized.
	pub resize_alpha: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationConfig::default(),
			fit: FitConfig::default(),
			node_radius: 12.0,
			resize_alpha: 0.1,
		}
	}
}

/// Raw pointer input before hit testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
	Down(Point),
	Move(Point),
	Up,
	Leave,
	Wheel { position: Point, delta_y: f64 },
}

/// Core graph state combining the simulation with view and gesture tracking.
///
/// Created once when the component mounts. Graph reloads go through
/// [`ForceGraphState::load`], which replaces the simulation contents but keeps
/// the viewport.
pub struct ForceGraphState {
	pub simulation: Simulation,
	pub viewport: Viewport,
	pub interaction: InteractionState,
	pub config: GraphConfig,
	/// Surface size the viewport was last framed for.
	surface: Option<(f64, f64)>,
}

impl ForceGraphState {
	pub fn new(data: GraphData, config: GraphConfig) -> Self {
		let mut simulation = Simulation::new(config.simulation.clone());
		simulation.start(data);
		Self {
			simulation,
			viewport: Viewport::default(),
			interaction: InteractionState::Idle,
			config,
			surface: None,
		}
	}

	/// Swap in a new graph. Any gesture in progress is abandoned since the
	/// node it referred to may no longer exist.
	pub fn load(&mut self, data: GraphData) {
		self.interaction = InteractionState::Idle;
		self.simulation.start(data);
	}

	pub fn screen_to_graph(&self, screen: Point) -> Point {
		self.viewport.to_graph_space(screen)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, screen: Point) -> Option<&str> {
		let g = self.screen_to_graph(screen);
		let r2 = self.config.node_radius * self.config.node_radius;
		// Later nodes are drawn on top, so search from the back.
		self.simulation
			.nodes()
			.iter()
			.rev()
			.find(|n| (n.x - g.x).powi(2) + (n.y - g.y).powi(2) <= r2)
			.map(|n| n.id.as_str())
	}

	/// Feed one pointer event through the gesture state machine and apply the
	/// resulting actions. Returns true when the event started a node drag and
	/// should not propagate further.
	pub fn handle_pointer(&mut self, input: PointerInput) -> bool {
		let event = match input {
			PointerInput::Down(position) => PointerEvent::Down {
				position,
				target: match self.node_at_position(position) {
					Some(id) => PointerTarget::Node(id.to_string()),
					None => PointerTarget::Canvas,
				},
			},
			PointerInput::Move(position) => PointerEvent::Move { position },
			PointerInput::Up => PointerEvent::Up,
			PointerInput::Leave => PointerEvent::Leave,
			PointerInput::Wheel { position, delta_y } => PointerEvent::Wheel { position, delta_y },
		};

		let transition = self.interaction.transition(&event, &self.viewport.state());
		for action in transition.actions {
			self.apply(action);
		}
		if transition.next != self.interaction {
			debug!("mindmap-graph: interaction {:?}", transition.next);
		}
		self.interaction = transition.next;
		transition.claimed
	}

	fn apply(&mut self, action: Action) {
		match action {
			Action::PanBy { dx, dy } => self.viewport.pan_by(dx, dy),
			Action::ZoomAt { position, factor } => self.viewport.zoom_at(position, factor),
			Action::Pin { node_id, x, y } => {
				self.simulation.pin(&node_id, x, y);
			}
			Action::Unpin { node_id } => {
				self.simulation.unpin(&node_id);
			}
		}
	}

	/// Frame the whole graph inside a `width` x `height` surface.
	pub fn auto_fit(&mut self, width: f64, height: f64) {
		let fitted = auto_fit(
			self.simulation.bounds(),
			self.simulation.nodes().len(),
			width,
			height,
			self.viewport.state(),
			&self.config.fit,
		);
		self.viewport
			.set_transform(fitted.zoom, Point::new(fitted.pan_x, fitted.pan_y));
		self.surface = Some((width, height));
	}

	/// Move the graph to the middle of a `width` x `height` surface without
	/// zooming. Used while the layout is still a tight initial cluster.
	pub fn center(&mut self, width: f64, height: f64) {
		let centered = center(self.simulation.bounds(), width, height, self.viewport.state());
		self.viewport
			.set_transform(centered.zoom, Point::new(centered.pan_x, centered.pan_y));
		self.surface = Some((width, height));
	}

	/// The host surface changed size: refit and let the layout breathe a
	/// little, without restarting it. Returns false, doing nothing, when the
	/// size is the one already framed.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if self.surface == Some((width, height)) {
			return false;
		}
		self.auto_fit(width, height);
		self.simulation.nudge(self.config.resize_alpha);
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{Edge, Node};
	use crate::components::force_graph::viewport::MAX_ZOOM;

	fn state() -> ForceGraphState {
		let data = GraphData {
			nodes: vec![Node::new("a", "alpha"), Node::new("b", "beta")],
			edges: vec![Edge::new("a", "b")],
		};
		ForceGraphState::new(data, GraphConfig::default())
	}

	fn screen_of(state: &ForceGraphState, id: &str) -> Point {
		let node = state.simulation.node(id).unwrap();
		state.viewport.to_screen_space(node.position())
	}

	#[test]
	fn hit_test_respects_transform() {
		let mut s = state();
		s.viewport.set_transform(2.0, Point::new(300.0, 200.0));

		let a = screen_of(&s, "a");
		assert_eq!(s.node_at_position(a), Some("a"));
		// 12 graph units at zoom 2 is 24 pixels.
		assert!(s.node_at_position(Point::new(a.x + 23.0, a.y)).is_some());
		assert_eq!(s.node_at_position(Point::new(-1000.0, -1000.0)), None);
	}

	#[test]
	fn dragging_a_node_pins_it_under_the_pointer() {
		let mut s = state();
		let a = screen_of(&s, "a");

		assert!(s.handle_pointer(PointerInput::Down(a)));
		assert_eq!(s.interaction.dragged_node(), Some("a"));

		let target = Point::new(a.x + 80.0, a.y - 40.0);
		assert!(!s.handle_pointer(PointerInput::Move(target)));
		for _ in 0..10 {
			s.simulation.tick();
		}
		let node = s.simulation.node("a").unwrap();
		assert_eq!(node.position(), s.screen_to_graph(target));
		assert!(node.is_pinned());

		s.handle_pointer(PointerInput::Up);
		assert!(s.interaction.is_idle());
		assert!(!s.simulation.node("a").unwrap().is_pinned());
	}

	#[test]
	fn canvas_drag_pans_viewport() {
		let mut s = state();
		let start = Point::new(-500.0, -500.0);
		assert!(!s.handle_pointer(PointerInput::Down(start)));
		s.handle_pointer(PointerInput::Move(Point::new(-480.0, -470.0)));
		s.handle_pointer(PointerInput::Move(Point::new(-450.0, -460.0)));
		assert_eq!(s.viewport.pan(), Point::new(50.0, 40.0));

		s.handle_pointer(PointerInput::Leave);
		s.handle_pointer(PointerInput::Move(Point::new(0.0, 0.0)));
		assert_eq!(s.viewport.pan(), Point::new(50.0, 40.0));
	}

	#[test]
	fn wheel_zooms_around_cursor() {
		let mut s = state();
		let cursor = Point::new(123.0, 45.0);
		let before = s.screen_to_graph(cursor);
		for _ in 0..40 {
			s.handle_pointer(PointerInput::Wheel {
				position: cursor,
				delta_y: -1.0,
			});
		}
		assert_eq!(s.viewport.zoom(), MAX_ZOOM);
		let after = s.screen_to_graph(cursor);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
	}

	#[test]
	fn resize_refits_and_nudges() {
		let mut s = state();
		while s.simulation.tick() {}
		let positions: Vec<Point> = s.simulation.nodes().iter().map(Node::position).collect();

		assert!(s.resize(800.0, 600.0));
		assert!(s.simulation.is_running());
		let center = s.simulation.bounds().unwrap().center();
		let on_screen = s.viewport.to_screen_space(center);
		assert!((on_screen.x - 400.0).abs() < 1e-9 && (on_screen.y - 300.0).abs() < 1e-9);

		let unchanged: Vec<Point> = s.simulation.nodes().iter().map(Node::position).collect();
		assert_eq!(positions, unchanged);
	}

	#[test]
	fn resize_to_same_size_is_ignored() {
		let mut s = state();
		s.center(800.0, 600.0);
		while s.simulation.tick() {}
		let view = s.viewport.state();

		assert!(!s.resize(800.0, 600.0));
		assert!(!s.simulation.is_running());
		assert_eq!(s.viewport.state(), view);

		assert!(s.resize(640.0, 600.0));
		assert!(!s.resize(640.0, 600.0));
	}

	#[test]
	fn centering_a_fresh_layout_does_not_zoom() {
		let mut s = state();
		s.center(1000.0, 800.0);
		assert_eq!(s.viewport.zoom(), 1.0);
		let middle = s.simulation.bounds().unwrap().center();
		let on_screen = s.viewport.to_screen_space(middle);
		assert!((on_screen.x - 500.0).abs() < 1e-9 && (on_screen.y - 400.0).abs() < 1e-9);

		s.auto_fit(1000.0, 800.0);
		assert_eq!(s.viewport.zoom(), MAX_ZOOM);
	}

	#[test]
	fn load_replaces_graph_and_cancels_gesture() {
		let mut s = state();
		let a = screen_of(&s, "a");
		s.handle_pointer(PointerInput::Down(a));

		s.load(GraphData {
			nodes: vec![Node::new("z", "zeta")],
			edges: vec![],
		});
		assert!(s.interaction.is_idle());
		assert!(s.simulation.node("a").is_none());
		assert!(s.simulation.node("z").is_some());
	}
}
