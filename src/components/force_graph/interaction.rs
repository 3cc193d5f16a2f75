//! Pointer gesture state machine.
//!
//! A press on a node starts a node drag, a press on empty canvas starts a pan,
//! and releasing or leaving the surface always returns to [`InteractionState::Idle`].
//! Transitions are pure: they take the current state, the event and a copy of
//! the viewport transform, and return the next state plus the [`Action`]s the
//! caller should apply to the viewport and the simulation.

use super::types::Point;
use super::viewport::{ViewportState, zoom_for_wheel};

/// What the pointer went down on, as determined by hit testing.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerTarget {
	Canvas,
	Node(String),
}

/// Pointer input in screen coordinates relative to the host surface.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
	Down { position: Point, target: PointerTarget },
	Move { position: Point },
	Up,
	/// The pointer left the surface. Handled exactly like [`PointerEvent::Up`].
	Leave,
	Wheel { position: Point, delta_y: f64 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
	#[default]
	Idle,
	Panning {
		start_screen: Point,
		start_pan: Point,
	},
	DraggingNode {
		node_id: String,
	},
}

/// Side effects requested by a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	PanBy { dx: f64, dy: f64 },
	ZoomAt { position: Point, factor: f64 },
	/// Pin position in graph space.
	Pin { node_id: String, x: f64, y: f64 },
	Unpin { node_id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
	pub next: InteractionState,
	pub actions: Vec<Action>,
	/// The event started a node drag and must not reach canvas-level handlers.
	pub claimed: bool,
}

impl Transition {
	fn to(next: InteractionState) -> Self {
		Self {
			next,
			actions: Vec::new(),
			claimed: false,
		}
	}

	fn with(mut self, action: Action) -> Self {
		self.actions.push(action);
		self
	}
}

impl InteractionState {
	pub fn is_idle(&self) -> bool {
		matches!(self, InteractionState::Idle)
	}

	pub fn dragged_node(&self) -> Option<&str> {
		match self {
			InteractionState::DraggingNode { node_id } => Some(node_id),
			_ => None,
		}
	}

	/// Compute the next state for `event`.
	pub fn transition(&self, event: &PointerEvent, viewport: &ViewportState) -> Transition {
		use InteractionState::*;

		match (self, event) {
			(_, PointerEvent::Wheel { position, delta_y }) => {
				let factor = zoom_for_wheel(*delta_y);
				// A pan in progress restarts from the zoomed transform, otherwise
				// the next move would undo the zoom's pan correction.
				let next = match self {
					Panning { .. } => Panning {
						start_screen: *position,
						start_pan: viewport.zoomed_at(*position, factor).pan(),
					},
					_ => self.clone(),
				};
				Transition::to(next).with(Action::ZoomAt {
					position: *position,
					factor,
				})
			}

			(_, PointerEvent::Down { position, target }) => {
				// A drag already in progress (e.g. a second button) is released
				// before the new gesture starts.
				let release = self.release();
				match target {
					PointerTarget::Node(node_id) => {
						let at = viewport.to_graph_space(*position);
						let mut t = Transition::to(DraggingNode {
							node_id: node_id.clone(),
						});
						t.actions.extend(release);
						t.actions.push(Action::Pin {
							node_id: node_id.clone(),
							x: at.x,
							y: at.y,
						});
						t.claimed = true;
						t
					}
					PointerTarget::Canvas => {
						let mut t = Transition::to(Panning {
							start_screen: *position,
							start_pan: viewport.pan(),
						});
						t.actions.extend(release);
						t
					}
				}
			}

			(
				Panning {
					start_screen,
					start_pan,
				},
				PointerEvent::Move { position },
			) => {
				let target_x = start_pan.x + (position.x - start_screen.x);
				let target_y = start_pan.y + (position.y - start_screen.y);
				Transition::to(self.clone()).with(Action::PanBy {
					dx: target_x - viewport.pan_x,
					dy: target_y - viewport.pan_y,
				})
			}

			(DraggingNode { node_id }, PointerEvent::Move { position }) => {
				let at = viewport.to_graph_space(*position);
				Transition::to(self.clone()).with(Action::Pin {
					node_id: node_id.clone(),
					x: at.x,
					y: at.y,
				})
			}

			(Idle, PointerEvent::Move { .. }) => Transition::to(Idle),

			(_, PointerEvent::Up | PointerEvent::Leave) => {
				let mut t = Transition::to(Idle);
				t.actions.extend(self.release());
				t
			}
		}
	}

	fn release(&self) -> Option<Action> {
		self.dragged_node().map(|id| Action::Unpin {
			node_id: id.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::viewport::{Viewport, ZOOM_IN_FACTOR};

	fn at(x: f64, y: f64) -> Point {
		Point::new(x, y)
	}

	fn down(x: f64, y: f64, target: PointerTarget) -> PointerEvent {
		PointerEvent::Down {
			position: at(x, y),
			target,
		}
	}

	fn mv(x: f64, y: f64) -> PointerEvent {
		PointerEvent::Move { position: at(x, y) }
	}

	fn node(id: &str) -> PointerTarget {
		PointerTarget::Node(id.to_string())
	}

	#[test]
	fn canvas_press_pans_relative_to_start() {
		let viewport = ViewportState {
			zoom: 2.0,
			pan_x: 10.0,
			pan_y: 20.0,
		};
		let t = InteractionState::Idle
			.transition(&down(100.0, 100.0, PointerTarget::Canvas), &viewport);
		assert!(!t.claimed);
		assert!(t.actions.is_empty());
		assert_eq!(
			t.next,
			InteractionState::Panning {
				start_screen: at(100.0, 100.0),
				start_pan: at(10.0, 20.0),
			}
		);

		let t = t.next.transition(&mv(130.0, 90.0), &viewport);
		assert_eq!(t.actions, [Action::PanBy { dx: 30.0, dy: -10.0 }]);

		// Viewport already moved by the first delta: the second move only adds
		// the remaining distance.
		let moved = ViewportState {
			pan_x: 40.0,
			pan_y: 10.0,
			..viewport
		};
		let t = t.next.transition(&mv(135.0, 90.0), &moved);
		assert_eq!(t.actions, [Action::PanBy { dx: 5.0, dy: 0.0 }]);

		let t = t.next.transition(&PointerEvent::Up, &moved);
		assert!(t.next.is_idle());
		assert!(t.actions.is_empty());
	}

	#[test]
	fn node_press_drags_in_graph_space() {
		let viewport = ViewportState {
			zoom: 2.0,
			pan_x: 100.0,
			pan_y: 50.0,
		};
		let t = InteractionState::Idle.transition(&down(140.0, 90.0, node("n1")), &viewport);
		assert!(t.claimed);
		assert_eq!(t.next.dragged_node(), Some("n1"));
		assert_eq!(
			t.actions,
			[Action::Pin {
				node_id: "n1".into(),
				x: 20.0,
				y: 20.0,
			}]
		);

		let t = t.next.transition(&mv(200.0, 150.0), &viewport);
		assert_eq!(
			t.actions,
			[Action::Pin {
				node_id: "n1".into(),
				x: 50.0,
				y: 50.0,
			}]
		);

		let t = t.next.transition(&PointerEvent::Up, &viewport);
		assert!(t.next.is_idle());
		assert_eq!(t.actions, [Action::Unpin { node_id: "n1".into() }]);
	}

	#[test]
	fn node_press_during_pan_switches_to_drag() {
		let viewport = ViewportState::default();
		let panning = InteractionState::Idle
			.transition(&down(0.0, 0.0, PointerTarget::Canvas), &viewport)
			.next;

		let t = panning.transition(&down(10.0, 10.0, node("k")), &viewport);
		assert_eq!(t.next.dragged_node(), Some("k"));
		assert!(t.claimed);

		let t = t.next.transition(&mv(50.0, 50.0), &viewport);
		assert!(
			t.actions
				.iter()
				.all(|a| !matches!(a, Action::PanBy { .. }))
		);
	}

	#[test]
	fn leave_ends_any_gesture() {
		let viewport = ViewportState::default();
		let dragging = InteractionState::DraggingNode {
			node_id: "x".into(),
		};
		let t = dragging.transition(&PointerEvent::Leave, &viewport);
		assert!(t.next.is_idle());
		assert_eq!(t.actions, [Action::Unpin { node_id: "x".into() }]);

		let panning = InteractionState::Panning {
			start_screen: at(0.0, 0.0),
			start_pan: at(0.0, 0.0),
		};
		let t = panning.transition(&PointerEvent::Leave, &viewport);
		assert!(t.next.is_idle());
		assert!(t.actions.is_empty());

		let t = InteractionState::Idle.transition(&PointerEvent::Leave, &viewport);
		assert!(t.next.is_idle());
	}

	#[test]
	fn pressing_another_node_releases_the_first() {
		let viewport = ViewportState::default();
		let dragging = InteractionState::DraggingNode {
			node_id: "a".into(),
		};
		let t = dragging.transition(&down(5.0, 5.0, node("b")), &viewport);
		assert_eq!(t.actions[0], Action::Unpin { node_id: "a".into() });
		assert!(matches!(t.actions[1], Action::Pin { ref node_id, .. } if node_id == "b"));
	}

	#[test]
	fn wheel_zooms_without_changing_state() {
		let viewport = ViewportState::default();
		let dragging = InteractionState::DraggingNode {
			node_id: "a".into(),
		};
		let t = dragging.transition(
			&PointerEvent::Wheel {
				position: at(3.0, 4.0),
				delta_y: 100.0,
			},
			&viewport,
		);
		assert_eq!(t.next, dragging);
		assert_eq!(
			t.actions,
			[Action::ZoomAt {
				position: at(3.0, 4.0),
				factor: 0.9,
			}]
		);
	}

	#[test]
	fn wheel_during_pan_keeps_cursor_anchored() {
		let mut viewport = Viewport::default();
		let cursor = at(-500.0, -500.0);
		let mut state = InteractionState::Idle
			.transition(&down(cursor.x, cursor.y, PointerTarget::Canvas), &viewport.state())
			.next;

		let apply = |state: &InteractionState, event: PointerEvent, viewport: &mut Viewport| {
			let t = state.transition(&event, &viewport.state());
			for action in t.actions {
				match action {
					Action::PanBy { dx, dy } => viewport.pan_by(dx, dy),
					Action::ZoomAt { position, factor } => viewport.zoom_at(position, factor),
					other => panic!("unexpected {:?}", other),
				}
			}
			t.next
		};

		state = apply(
			&state,
			PointerEvent::Wheel {
				position: cursor,
				delta_y: -1.0,
			},
			&mut viewport,
		);
		let under_cursor = viewport.to_graph_space(cursor);
		assert_eq!(viewport.zoom(), ZOOM_IN_FACTOR);

		let moved = at(-499.0, -500.0);
		state = apply(&state, mv(moved.x, moved.y), &mut viewport);
		let after = viewport.to_graph_space(moved);
		assert!((after.x - under_cursor.x).abs() < 1e-9);
		assert!((after.y - under_cursor.y).abs() < 1e-9);
		assert!(matches!(state, InteractionState::Panning { .. }));
	}

	#[test]
	fn idle_moves_do_nothing() {
		let t = InteractionState::Idle.transition(&mv(1.0, 1.0), &ViewportState::default());
		assert!(t.next.is_idle());
		assert!(t.actions.is_empty());
	}
}
