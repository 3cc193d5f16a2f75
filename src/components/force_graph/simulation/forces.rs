//! The four forces combined each tick. Each function adds to node velocities
//! (the center force translates positions directly); integration happens in
//! the caller.

use crate::components::force_graph::types::Node;

/// Linear congruential generator used for initial jitter and for separating
/// coincident nodes. Deterministic so layouts are reproducible per seed.
#[derive(Clone, Debug)]
pub(super) struct Lcg(u32);

impl Lcg {
	pub(super) fn new(seed: u32) -> Self {
		Self(seed)
	}

	/// Next value in `[0, 1)`.
	pub(super) fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	/// Tiny nonzero offset that breaks exact overlaps.
	pub(super) fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// A resolved link with its degree bias precomputed.
#[derive(Clone, Copy, Debug)]
pub(super) struct Link {
	pub source: usize,
	pub target: usize,
	/// Share of the correction applied to the target; the source gets the rest.
	/// Weighted by degree so hubs move less than leaves.
	pub bias: f64,
}

impl Link {
	pub(super) fn resolve(pairs: &[(usize, usize)], node_count: usize) -> Vec<Link> {
		let mut degree = vec![0usize; node_count];
		for &(s, t) in pairs {
			degree[s] += 1;
			degree[t] += 1;
		}
		pairs
			.iter()
			.map(|&(source, target)| Link {
				source,
				target,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect()
	}
}

pub(super) struct LinkParams {
	pub distance: f64,
	pub strength: f64,
	pub iterations: usize,
}

/// Spring force toward `distance`. Runs several relaxation passes, each one
/// seeing the velocities written by the previous pass.
pub(super) fn apply_links(
	nodes: &mut [Node],
	links: &[Link],
	params: &LinkParams,
	alpha: f64,
	rng: &mut Lcg,
) {
	for _ in 0..params.iterations {
		for link in links {
			let (s, t) = (&nodes[link.source], &nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = rng.jiggle();
			}
			if y == 0.0 {
				y = rng.jiggle();
			}
			let mut l = (x * x + y * y).sqrt();
			l = (l - params.distance) / l * alpha * params.strength;
			x *= l;
			y *= l;

			let t = &mut nodes[link.target];
			t.vx -= x * link.bias;
			t.vy -= y * link.bias;
			let s = &mut nodes[link.source];
			s.vx += x * (1.0 - link.bias);
			s.vy += y * (1.0 - link.bias);
		}
	}
}

pub(super) struct ChargeParams {
	pub strength: f64,
	pub distance_min: f64,
	pub distance_max: f64,
}

/// Pairwise inverse-square repulsion (attraction for positive strength),
/// ignored beyond `distance_max` and softened below `distance_min`.
pub(super) fn apply_charge(nodes: &mut [Node], params: &ChargeParams, alpha: f64, rng: &mut Lcg) {
	let positions: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
	let min2 = params.distance_min * params.distance_min;
	let max2 = params.distance_max * params.distance_max;

	for (i, node) in nodes.iter_mut().enumerate() {
		let (xi, yi) = positions[i];
		for (j, &(xj, yj)) in positions.iter().enumerate() {
			if i == j {
				continue;
			}
			let mut x = xj - xi;
			let mut y = yj - yi;
			let mut l = x * x + y * y;
			if l >= max2 {
				continue;
			}
			if x == 0.0 {
				x = rng.jiggle();
				l += x * x;
			}
			if y == 0.0 {
				y = rng.jiggle();
				l += y * y;
			}
			if l < min2 {
				l = (min2 * l).sqrt();
			}
			let w = params.strength * alpha / l;
			node.vx += x * w;
			node.vy += y * w;
		}
	}
}

/// Moves the whole node set so its centroid approaches the origin.
/// Relative positions are untouched.
pub(super) fn apply_center(nodes: &mut [Node], strength: f64) {
	if nodes.is_empty() {
		return;
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
	let (dx, dy) = (sx / n * strength, sy / n * strength);
	for node in nodes {
		node.x -= dx;
		node.y -= dy;
	}
}

pub(super) struct CollisionParams {
	pub radius: f64,
	pub strength: f64,
}

/// Soft push-apart for nodes whose circles (of `radius` each) overlap,
/// looking one step ahead using current velocities.
pub(super) fn apply_collision(nodes: &mut [Node], params: &CollisionParams, rng: &mut Lcg) {
	let r = params.radius * 2.0;
	let r2 = r * r;
	// Equal radii: each side takes half the correction.
	let w = 0.5;

	for i in 0..nodes.len() {
		let xi = nodes[i].x + nodes[i].vx;
		let yi = nodes[i].y + nodes[i].vy;
		for j in (i + 1)..nodes.len() {
			let mut x = xi - nodes[j].x - nodes[j].vx;
			let mut y = yi - nodes[j].y - nodes[j].vy;
			let mut l = x * x + y * y;
			if l >= r2 {
				continue;
			}
			if x == 0.0 {
				x = rng.jiggle();
				l += x * x;
			}
			if y == 0.0 {
				y = rng.jiggle();
				l += y * y;
			}
			let d = l.sqrt();
			let k = (r - d) / d * params.strength;
			x *= k;
			y *= k;
			nodes[i].vx += x * w;
			nodes[i].vy += y * w;
			nodes[j].vx -= x * (1.0 - w);
			nodes[j].vy -= y * (1.0 - w);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node_at(id: &str, x: f64, y: f64) -> Node {
		Node {
			x,
			y,
			..Node::new(id, id)
		}
	}

	#[test]
	fn lcg_stays_in_unit_interval() {
		let mut rng = Lcg::new(7);
		for _ in 0..1000 {
			let v = rng.next();
			assert!((0.0..1.0).contains(&v));
		}
		assert!(rng.jiggle().abs() <= 0.5e-6);
	}

	#[test]
	fn stretched_link_pulls_endpoints_together() {
		let mut nodes = vec![node_at("a", 0.0, 0.0), node_at("b", 300.0, 0.0)];
		let links = Link::resolve(&[(0, 1)], 2);
		let params = LinkParams {
			distance: 120.0,
			strength: 0.8,
			iterations: 1,
		};
		apply_links(&mut nodes, &links, &params, 1.0, &mut Lcg::new(1));

		assert!(nodes[0].vx > 0.0);
		assert!(nodes[1].vx < 0.0);
		assert!(nodes[0].vy.abs() < 1e-6);
	}

	#[test]
	fn link_bias_favors_moving_leaves() {
		// b is a hub linked to a, c and d; the a-b correction should mostly move a.
		let mut nodes = vec![
			node_at("a", -300.0, 0.0),
			node_at("b", 0.0, 0.0),
			node_at("c", 0.0, 120.0),
			node_at("d", 0.0, -120.0),
		];
		let links = Link::resolve(&[(0, 1), (1, 2), (1, 3)], 4);
		assert_eq!(links[0].bias, 0.25);

		let params = LinkParams {
			distance: 120.0,
			strength: 0.8,
			iterations: 1,
		};
		apply_links(&mut nodes, &links[..1], &params, 1.0, &mut Lcg::new(1));
		assert!(nodes[0].vx.abs() > nodes[1].vx.abs());
	}

	#[test]
	fn charge_repels_and_respects_max_distance() {
		let mut nodes = vec![
			node_at("a", 0.0, 0.0),
			node_at("b", 50.0, 0.0),
			node_at("far", 1000.0, 0.0),
		];
		let params = ChargeParams {
			strength: -800.0,
			distance_min: 5.0,
			distance_max: 300.0,
		};
		apply_charge(&mut nodes, &params, 1.0, &mut Lcg::new(1));

		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert_eq!(nodes[2].vx, 0.0);
	}

	#[test]
	fn charge_separates_coincident_nodes() {
		let mut nodes = vec![node_at("a", 10.0, 10.0), node_at("b", 10.0, 10.0)];
		let params = ChargeParams {
			strength: -800.0,
			distance_min: 5.0,
			distance_max: 300.0,
		};
		apply_charge(&mut nodes, &params, 1.0, &mut Lcg::new(3));

		for node in &nodes {
			assert!(node.vx.is_finite() && node.vy.is_finite());
		}
		assert!(nodes[0].vx != nodes[1].vx || nodes[0].vy != nodes[1].vy);
	}

	#[test]
	fn center_moves_centroid_toward_origin() {
		let mut nodes = vec![node_at("a", 100.0, 50.0), node_at("b", 140.0, 90.0)];
		apply_center(&mut nodes, 0.5);

		assert_eq!((nodes[0].x, nodes[0].y), (40.0, 15.0));
		assert_eq!((nodes[1].x, nodes[1].y), (80.0, 55.0));
	}

	#[test]
	fn collision_pushes_overlapping_nodes_apart() {
		let mut nodes = vec![
			node_at("a", 0.0, 0.0),
			node_at("b", 20.0, 0.0),
			node_at("c", 500.0, 0.0),
		];
		let params = CollisionParams {
			radius: 35.0,
			strength: 0.8,
		};
		apply_collision(&mut nodes, &params, &mut Lcg::new(1));

		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert_eq!(nodes[2].vx, 0.0);
		assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-9);
	}
}
