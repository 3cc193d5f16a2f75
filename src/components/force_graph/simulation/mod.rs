//! Force-directed layout engine.
//!
//! A [`Simulation`] owns the node and edge sets for one mounted graph and
//! advances them one tick at a time. Each tick combines four forces (link,
//! charge, center, collision), integrates velocities, and decays the
//! simulation "temperature" `alpha`. Once alpha drops below `alpha_min` the
//! layout is considered settled and ticking stops until something perturbs it
//! (a drag, or a resize nudge).
//!
//! Outside code never mutates nodes directly: it goes through [`Simulation::pin`],
//! [`Simulation::unpin`] and [`Simulation::nudge`], and observes positions via
//! [`Simulation::on_tick`] snapshots or the read-only accessors.

mod forces;

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, info};
use serde::Deserialize;

use super::frame::{DEFAULT_PUBLISH_INTERVAL_MS, FrameThrottle};
use super::types::{Bounds, Edge, GraphData, Node};
use forces::{
	ChargeParams, CollisionParams, Lcg, Link, LinkParams, apply_center, apply_charge,
	apply_collision, apply_links,
};

/// Tunable physics constants. The defaults give a stable, readable layout for
/// graphs of a few dozen nodes.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Rest length of a link.
	pub link_distance: f64,
	pub link_strength: f64,
	/// Relaxation passes of the link force per tick.
	pub link_iterations: usize,
	/// Negative values repel.
	pub charge_strength: f64,
	pub charge_distance_min: f64,
	pub charge_distance_max: f64,
	pub center_strength: f64,
	/// Per-node collision radius.
	pub collision_radius: f64,
	pub collision_strength: f64,
	/// Fraction of velocity removed each tick.
	pub velocity_decay: f64,
	pub alpha_start: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	/// Alpha is held near this value while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Alpha is raised to at least this much when a drag starts.
	pub pin_alpha_floor: f64,
	/// Spread of the initial spiral placement.
	pub initial_radius: f64,
	/// Amplitude of the random offset added to initial positions.
	pub initial_jitter: f64,
	pub seed: u32,
	/// Minimum time between published tick snapshots.
	pub publish_interval_ms: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_distance: 120.0,
			link_strength: 0.8,
			link_iterations: 2,
			charge_strength: -800.0,
			charge_distance_min: 5.0,
			charge_distance_max: 300.0,
			center_strength: 0.05,
			collision_radius: 35.0,
			collision_strength: 0.8,
			velocity_decay: 0.6,
			alpha_start: 1.0,
			alpha_decay: 0.03,
			alpha_min: 0.005,
			drag_alpha_target: 0.3,
			pin_alpha_floor: 0.1,
			initial_radius: 10.0,
			initial_jitter: 5.0,
			seed: 1,
			publish_interval_ms: DEFAULT_PUBLISH_INTERVAL_MS,
		}
	}
}

/// Read-only view of the simulation handed to tick listeners.
#[derive(Debug)]
pub struct TickSnapshot<'a> {
	pub nodes: &'a [Node],
	pub edges: &'a [Edge],
	pub alpha: f64,
	/// True on the tick that brought alpha below `alpha_min`.
	pub settled: bool,
}

type TickListener = Box<dyn FnMut(&TickSnapshot<'_>)>;

/// Layout state for one mounted graph.
pub struct Simulation {
	config: SimulationConfig,
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	links: Vec<Link>,
	index: HashMap<String, usize>,
	alpha: f64,
	alpha_target: f64,
	rng: Lcg,
	throttle: FrameThrottle,
	listener: Option<TickListener>,
	stopped: bool,
}

impl Simulation {
	pub fn new(config: SimulationConfig) -> Self {
		Self {
			rng: Lcg::new(config.seed),
			throttle: FrameThrottle::new(config.publish_interval_ms),
			config,
			nodes: Vec::new(),
			edges: Vec::new(),
			links: Vec::new(),
			index: HashMap::new(),
			alpha: 0.0,
			alpha_target: 0.0,
			listener: None,
			stopped: false,
		}
	}

	/// Replace the graph and restart from a fresh layout. Any previous node
	/// state, pins and momentum are discarded; a registered listener is kept.
	pub fn start(&mut self, graph: GraphData) {
		let GraphData { mut nodes, edges } = graph;

		self.rng = Lcg::new(self.config.seed);
		place_initial(&mut nodes, &self.config, &mut self.rng);

		self.index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();

		let mut pairs = Vec::with_capacity(edges.len());
		let mut kept = Vec::with_capacity(edges.len());
		for edge in edges {
			// The adapter already guarantees this; a bad edge is skipped
			// rather than indexing out of bounds.
			if let (Some(&s), Some(&t)) = (
				self.index.get(&edge.source_id),
				self.index.get(&edge.target_id),
			) {
				pairs.push((s, t));
				kept.push(edge);
			}
		}
		self.links = Link::resolve(&pairs, nodes.len());
		self.nodes = nodes;
		self.edges = kept;

		self.alpha = self.config.alpha_start;
		self.alpha_target = 0.0;
		self.throttle.reset();
		self.stopped = false;

		info!(
			"mindmap-graph: simulation started with {} nodes, {} edges",
			self.nodes.len(),
			self.edges.len()
		);
	}

	/// Hold a node at `(x, y)` in graph space. The first pin of a drag heats the
	/// simulation so the rest of the graph reacts. Returns false for unknown ids.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
		let Some(&i) = self.index.get(id) else {
			return false;
		};
		let node = &mut self.nodes[i];
		let drag_start = !node.is_pinned();
		node.pinned_x = Some(x);
		node.pinned_y = Some(y);
		node.x = x;
		node.y = y;
		node.vx = 0.0;
		node.vy = 0.0;

		if drag_start {
			debug!("mindmap-graph: pinned {:?}", id);
			self.alpha_target = self.config.drag_alpha_target;
			self.alpha = self.alpha.max(self.config.pin_alpha_floor);
		}
		true
	}

	/// Release a pinned node. When no node remains pinned the simulation is
	/// allowed to cool down again.
	pub fn unpin(&mut self, id: &str) -> bool {
		let Some(&i) = self.index.get(id) else {
			return false;
		};
		let node = &mut self.nodes[i];
		node.pinned_x = None;
		node.pinned_y = None;
		debug!("mindmap-graph: unpinned {:?}", id);

		if !self.nodes.iter().any(Node::is_pinned) {
			self.alpha_target = 0.0;
		}
		true
	}

	/// Raise alpha to at least `alpha` without restarting the layout.
	pub fn nudge(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
	}

	/// Register the snapshot listener, replacing any previous one.
	pub fn on_tick(&mut self, listener: impl FnMut(&TickSnapshot<'_>) + 'static) {
		self.listener = Some(Box::new(listener));
	}

	/// Halt ticking and drop the listener. After this no snapshot is ever
	/// published until [`Simulation::start`] runs and a listener is registered again.
	pub fn stop(&mut self) {
		if !self.stopped {
			info!("mindmap-graph: simulation stopped");
		}
		self.stopped = true;
		self.listener = None;
	}

	pub fn is_running(&self) -> bool {
		!self.stopped && !self.nodes.is_empty() && self.alpha >= self.config.alpha_min
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	/// Advance one tick without publishing. Returns whether the simulation is
	/// still running afterwards.
	pub fn tick(&mut self) -> bool {
		self.advance().unwrap_or(false)
	}

	/// Advance one tick and publish a snapshot to the listener if at least
	/// `publish_interval_ms` passed since the last one. The settling tick is
	/// always published so the final layout gets drawn.
	pub fn step(&mut self, now_ms: f64) -> bool {
		let Some(running) = self.advance() else {
			return false;
		};
		let publish = if running {
			self.throttle.ready(now_ms)
		} else {
			self.throttle.force(now_ms);
			true
		};
		if publish {
			self.publish(!running);
		}
		running
	}

	/// One integration step, or `None` if there was nothing to do.
	fn advance(&mut self) -> Option<bool> {
		if !self.is_running() {
			return None;
		}
		let c = &self.config;

		self.alpha += (self.alpha_target - self.alpha) * c.alpha_decay;

		apply_links(
			&mut self.nodes,
			&self.links,
			&LinkParams {
				distance: c.link_distance,
				strength: c.link_strength,
				iterations: c.link_iterations,
			},
			self.alpha,
			&mut self.rng,
		);
		apply_charge(
			&mut self.nodes,
			&ChargeParams {
				strength: c.charge_strength,
				distance_min: c.charge_distance_min,
				distance_max: c.charge_distance_max,
			},
			self.alpha,
			&mut self.rng,
		);
		apply_center(&mut self.nodes, c.center_strength);
		apply_collision(
			&mut self.nodes,
			&CollisionParams {
				radius: c.collision_radius,
				strength: c.collision_strength,
			},
			&mut self.rng,
		);

		let keep = 1.0 - c.velocity_decay;
		for node in &mut self.nodes {
			match node.pinned_x {
				Some(px) => {
					node.x = px;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.pinned_y {
				Some(py) => {
					node.y = py;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}

		let running = self.alpha >= self.config.alpha_min;
		if !running {
			debug!("mindmap-graph: simulation settled");
		}
		Some(running)
	}

	fn publish(&mut self, settled: bool) {
		debug_assert!(!self.stopped, "tick published after stop()");
		if let Some(listener) = self.listener.as_mut() {
			listener(&TickSnapshot {
				nodes: &self.nodes,
				edges: &self.edges,
				alpha: self.alpha,
				settled,
			});
		}
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Both endpoints of every edge, in edge order.
	pub fn edge_endpoints(&self) -> impl Iterator<Item = (&Node, &Node)> {
		self.links
			.iter()
			.map(|l| (&self.nodes[l.source], &self.nodes[l.target]))
	}

	/// Bounding box of all node positions.
	pub fn bounds(&self) -> Option<Bounds> {
		Bounds::from_points(self.nodes.iter().map(Node::position))
	}
}

/// Lays nodes out on a sunflower spiral around the origin with a little
/// seeded jitter, so no two nodes start on top of each other.
fn place_initial(nodes: &mut [Node], config: &SimulationConfig, rng: &mut Lcg) {
	let golden_angle = PI * (3.0 - 5f64.sqrt());
	for (i, node) in nodes.iter_mut().enumerate() {
		let radius = config.initial_radius * (0.5 + i as f64).sqrt();
		let angle = i as f64 * golden_angle;
		node.x = radius * angle.cos() + (rng.next() - 0.5) * config.initial_jitter;
		node.y = radius * angle.sin() + (rng.next() - 0.5) * config.initial_jitter;
		node.vx = 0.0;
		node.vy = 0.0;
		node.pinned_x = None;
		node.pinned_y = None;
	}
}
