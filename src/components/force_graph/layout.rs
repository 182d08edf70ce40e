//! Mesh layout: `force_graph` integrates repulsion and velocities, then a
//! constraint pass applies link rest lengths, role rings, centering and
//! collisions on top of the integrated positions.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, MeshEdge, NodeRole};

/// A position solver the canvas can drive without knowing its internals.
pub trait LayoutEngine {
	/// Advance the simulation by `dt` seconds.
	fn step(&mut self, dt: f32);
	/// Current positions, index-aligned with the graph's node list.
	fn positions(&self) -> Vec<(f64, f64)>;
	/// Hold a node at a fixed position until released.
	fn pin(&mut self, node: usize, x: f64, y: f64);
	/// Hand a pinned node back to the physics.
	fn release(&mut self, node: usize);
	/// Move the point the centering and radial constraints pull toward.
	fn set_center(&mut self, x: f64, y: f64);
}

/// Settings handed to the `force_graph` integrator.
#[derive(Clone, Copy, Debug)]
pub struct IntegratorParams {
	/// Pairwise repulsion.
	pub charge: f32,
	/// Spring force of the integrator's own edges.
	pub spring: f32,
	/// Cap on any single force.
	pub max_force: f32,
	/// Velocity scale.
	pub node_speed: f32,
	/// Velocity kept per step.
	pub damping: f32,
	/// Mass given to every node.
	pub node_mass: f32,
}

impl IntegratorParams {
	fn simulation(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.charge,
			force_spring: self.spring,
			force_max: self.max_force,
			node_speed: self.node_speed,
			damping_factor: self.damping,
		}
	}
}

/// Tunables for [`ForceLayout`].
#[derive(Clone, Debug)]
pub struct LayoutParams {
	/// Settings for the `force_graph` pass.
	pub integrator: IntegratorParams,
	/// Radius primaries are pulled toward.
	pub primary_ring: f64,
	/// Radius leaves are pulled toward.
	pub secondary_ring: f64,
	/// Strength of the ring pull.
	pub radial_strength: f64,
	/// Gap kept between the rims of two bodies (15 per body).
	pub collision_margin: f64,
	/// Share of an overlap resolved per tick.
	pub collision_strength: f64,
	/// Cooling rate per tick.
	pub alpha_decay: f64,
	/// Temperature below which the layout counts as settled.
	pub alpha_min: f64,
	/// Temperature held while a node is being dragged.
	pub drag_alpha: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			integrator: IntegratorParams {
				charge: 400.0,
				spring: 0.01,
				max_force: 100.0,
				node_speed: 3000.0,
				damping: 0.9,
				node_mass: 10.0,
			},
			primary_ring: 140.0,
			secondary_ring: 220.0,
			radial_strength: 0.15,
			collision_margin: 30.0,
			collision_strength: 0.8,
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			drag_alpha: 0.3,
		}
	}
}

impl LayoutParams {
	/// Ring radius for `role`; the hub sits at the centre.
	pub fn ring(&self, role: NodeRole) -> f64 {
		match role {
			NodeRole::Hub => 0.0,
			NodeRole::Primary => self.primary_ring,
			NodeRole::Secondary => self.secondary_ring,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub ring: f64,
	pub pin: Option<(f64, f64)>,
}

impl Body {
	fn new(x: f64, y: f64, radius: f64, ring: f64) -> Self {
		Self {
			x,
			y,
			radius,
			ring,
			pin: None,
		}
	}
}

#[derive(Clone, Copy, Debug)]
pub struct Link {
	pub source: usize,
	pub target: usize,
	pub distance: f64,
	pub strength: f64,
	/// Share of the correction applied to the target end.
	pub bias: f64,
}

/// `force_graph` integration plus the mesh constraints.
pub struct ForceLayout {
	graph: ForceGraph<usize, ()>,
	bodies: Vec<Body>,
	links: Vec<Link>,
	params: LayoutParams,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
}

impl ForceLayout {
	/// Seed bodies on their rings around `center`.
	pub fn new(data: &GraphData, center: (f64, f64), params: LayoutParams) -> Self {
		let mut graph = ForceGraph::new(params.integrator.simulation());
		let bodies = initial_bodies(data, center, &params);

		let handles: Vec<DefaultNodeIdx> = bodies
			.iter()
			.enumerate()
			.map(|(i, b)| {
				graph.add_node(NodeData {
					x: b.x as f32,
					y: b.y as f32,
					mass: params.integrator.node_mass,
					is_anchor: false,
					user_data: i,
				})
			})
			.collect();

		let mut degree = vec![0usize; bodies.len()];
		for (s, t) in data.edge_indices() {
			degree[s] += 1;
			degree[t] += 1;
		}

		let mut links = Vec::with_capacity(data.edges.len());
		for edge in &data.edges {
			let (Some(s), Some(t)) = (data.index_of(&edge.source), data.index_of(&edge.target))
			else {
				continue;
			};
			graph.add_edge(handles[s], handles[t], EdgeData::default());
			links.push(link_for(edge, s, t, &degree));
		}

		Self {
			graph,
			bodies,
			links,
			params,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
		}
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// True once the temperature has decayed below the floor.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.params.alpha_min
	}

	/// True while `node` is held by a drag.
	pub fn is_pinned(&self, node: usize) -> bool {
		self.bodies.get(node).is_some_and(|b| b.pin.is_some())
	}

	/// Position of `node` in graph units.
	pub fn position(&self, node: usize) -> Option<(f64, f64)> {
		self.bodies.get(node).map(|b| (b.x, b.y))
	}

	/// Number of bodies.
	pub fn node_count(&self) -> usize {
		self.bodies.len()
	}

	/// Point the centering force pulls toward.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
	}

	fn read_back(&mut self) {
		let bodies = &mut self.bodies;
		self.graph.visit_nodes(|node| {
			let i = node.data.user_data;
			let (x, y) = (node.x() as f64, node.y() as f64);
			// Keep the previous position if the integrator blew up.
			if x.is_finite() && y.is_finite() {
				bodies[i].x = x;
				bodies[i].y = y;
			}
		});
	}

	fn write_back(&mut self) {
		let bodies = &self.bodies;
		self.graph.visit_nodes_mut(|node| {
			let b = &bodies[node.data.user_data];
			node.data.x = b.x as f32;
			node.data.y = b.y as f32;
			node.data.is_anchor = b.pin.is_some();
		});
	}
}

impl LayoutEngine for ForceLayout {
	fn step(&mut self, dt: f32) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		if self.is_settled() {
			return;
		}
		let alpha = self.alpha;

		self.graph.update(dt * alpha as f32);
		self.read_back();

		apply_links(&mut self.bodies, &self.links, alpha);
		apply_radial(
			&mut self.bodies,
			self.center,
			self.params.radial_strength * alpha,
		);
		apply_center(&mut self.bodies, self.center);
		apply_collisions(
			&mut self.bodies,
			self.params.collision_margin,
			self.params.collision_strength,
		);
		apply_pins(&mut self.bodies);

		self.write_back();
	}

	fn positions(&self) -> Vec<(f64, f64)> {
		self.bodies.iter().map(|b| (b.x, b.y)).collect()
	}

	fn pin(&mut self, node: usize, x: f64, y: f64) {
		let Some(body) = self.bodies.get_mut(node) else {
			return;
		};
		body.pin = Some((x, y));
		body.x = x;
		body.y = y;
		self.alpha_target = self.params.drag_alpha;
		self.reheat(self.params.drag_alpha);
		self.write_back();
	}

	fn release(&mut self, node: usize) {
		if let Some(body) = self.bodies.get_mut(node) {
			body.pin = None;
		}
		if self.bodies.iter().all(|b| b.pin.is_none()) {
			self.alpha_target = 0.0;
		}
		self.write_back();
	}

	fn set_center(&mut self, x: f64, y: f64) {
		if self.center != (x, y) {
			self.center = (x, y);
			self.reheat(self.params.drag_alpha);
		}
	}
}

fn link_for(edge: &MeshEdge, source: usize, target: usize, degree: &[usize]) -> Link {
	let (ds, dt) = (degree[source] as f64, degree[target] as f64);
	Link {
		source,
		target,
		distance: if edge.distance > 0.0 {
			edge.distance
		} else {
			MeshEdge::DEFAULT_DISTANCE
		},
		strength: edge.strength,
		bias: ds / (ds + dt),
	}
}

/// Hub at the centre, every other role spread evenly over its own ring.
fn initial_bodies(data: &GraphData, center: (f64, f64), params: &LayoutParams) -> Vec<Body> {
	let count = |role| data.nodes.iter().filter(|n| n.role == role).count().max(1);
	let totals = [
		(NodeRole::Hub, count(NodeRole::Hub)),
		(NodeRole::Primary, count(NodeRole::Primary)),
		(NodeRole::Secondary, count(NodeRole::Secondary)),
	];
	let mut seen = [0usize; 3];

	data.nodes
		.iter()
		.map(|node| {
			let slot = totals.iter().position(|(r, _)| *r == node.role).unwrap_or(0);
			let k = seen[slot];
			seen[slot] += 1;

			let ring = params.ring(node.role);
			// Hubs get a small ring so several never start on the same point.
			let start = if ring > 0.0 { ring } else { 5.0 * k as f64 };
			let angle = 2.0 * PI * k as f64 / totals[slot].1 as f64 + 0.3 * slot as f64;
			Body::new(
				center.0 + start * angle.cos(),
				center.1 + start * angle.sin(),
				node.radius,
				ring,
			)
		})
		.collect()
}

/// Pull linked bodies toward their rest distance, splitting the move by degree.
pub fn apply_links(bodies: &mut [Body], links: &[Link], alpha: f64) {
	for (n, link) in links.iter().enumerate() {
		let (s, t) = (bodies[link.source], bodies[link.target]);
		let (mut dx, mut dy) = (t.x - s.x, t.y - s.y);
		if dx == 0.0 && dy == 0.0 {
			dx = 1e-3 * (n + 1) as f64;
			dy = 1e-3;
		}
		let len = (dx * dx + dy * dy).sqrt();
		let k = (len - link.distance) / len * alpha * link.strength;
		let (mx, my) = (dx * k, dy * k);

		let target = &mut bodies[link.target];
		target.x -= mx * link.bias;
		target.y -= my * link.bias;
		let source = &mut bodies[link.source];
		source.x += mx * (1.0 - link.bias);
		source.y += my * (1.0 - link.bias);
	}
}

/// Move every body a `strength` fraction toward its ring around `center`.
pub fn apply_radial(bodies: &mut [Body], center: (f64, f64), strength: f64) {
	for b in bodies.iter_mut() {
		let (dx, dy) = (b.x - center.0, b.y - center.1);
		let r = (dx * dx + dy * dy).sqrt();
		if r < 1e-9 {
			continue;
		}
		let k = (b.ring - r) * strength / r;
		b.x += dx * k;
		b.y += dy * k;
	}
}

/// Translate all bodies so their mean sits on `center`.
pub fn apply_center(bodies: &mut [Body], center: (f64, f64)) {
	if bodies.is_empty() {
		return;
	}
	let n = bodies.len() as f64;
	let (sx, sy) = bodies
		.iter()
		.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
	let (ox, oy) = (center.0 - sx / n, center.1 - sy / n);
	for b in bodies.iter_mut() {
		b.x += ox;
		b.y += oy;
	}
}

/// Push apart any pair closer than `radius_a + radius_b + margin`.
/// Pinned bodies do not move; the other side takes the whole correction.
pub fn apply_collisions(bodies: &mut [Body], margin: f64, strength: f64) {
	for i in 0..bodies.len() {
		for j in (i + 1)..bodies.len() {
			let (a, b) = (bodies[i], bodies[j]);
			let min = a.radius + b.radius + margin;
			let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
			if dx == 0.0 && dy == 0.0 {
				dx = 1e-3 * (j - i) as f64;
				dy = 1e-3;
			}
			let dist = (dx * dx + dy * dy).sqrt();
			if dist >= min {
				continue;
			}

			let (ra2, rb2) = (a.radius * a.radius, b.radius * b.radius);
			let (mut wa, mut wb) = match (a.pin.is_some(), b.pin.is_some()) {
				(true, true) => continue,
				(true, false) => (0.0, 1.0),
				(false, true) => (1.0, 0.0),
				(false, false) if ra2 + rb2 > 0.0 => (rb2 / (ra2 + rb2), ra2 / (ra2 + rb2)),
				(false, false) => (0.5, 0.5),
			};
			let push = (min - dist) / dist * strength;
			wa *= push;
			wb *= push;

			bodies[i].x -= dx * wa;
			bodies[i].y -= dy * wa;
			bodies[j].x += dx * wb;
			bodies[j].y += dy * wb;
		}
	}
}

pub fn apply_pins(bodies: &mut [Body]) {
	for b in bodies.iter_mut() {
		if let Some((x, y)) = b.pin {
			b.x = x;
			b.y = y;
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::builder::credit_mesh;
	use super::*;

	fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
		((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
	}

	fn layout() -> ForceLayout {
		let data = credit_mesh(&mut StdRng::seed_from_u64(11));
		ForceLayout::new(&data, (400.0, 300.0), LayoutParams::default())
	}

	#[test]
	fn starts_on_role_rings() {
		let layout = layout();
		let data = credit_mesh(&mut StdRng::seed_from_u64(11));
		for (i, node) in data.nodes.iter().enumerate() {
			let p = layout.position(i).unwrap();
			let expected = LayoutParams::default().ring(node.role);
			assert!((dist(p, (400.0, 300.0)) - expected).abs() < 1e-6);
		}
	}

	#[test]
	fn collisions_separate_overlapping_bodies() {
		let mut bodies = [
			Body::new(0.0, 0.0, 10.0, 0.0),
			Body::new(10.0, 0.0, 10.0, 0.0),
		];
		apply_collisions(&mut bodies, 30.0, 1.0);
		assert!((bodies[1].x - bodies[0].x - 50.0).abs() < 1e-9);
		assert!((bodies[0].x + 20.0).abs() < 1e-9);

		let mut bodies = [
			Body::new(0.0, 0.0, 10.0, 0.0),
			Body::new(10.0, 0.0, 10.0, 0.0),
		];
		apply_collisions(&mut bodies, 30.0, 0.8);
		assert!((bodies[1].x - bodies[0].x - 42.0).abs() < 1e-9);
	}

	#[test]
	fn collisions_leave_pinned_bodies_in_place() {
		let mut bodies = [
			Body::new(0.0, 0.0, 10.0, 0.0),
			Body::new(5.0, 0.0, 10.0, 0.0),
		];
		bodies[0].pin = Some((0.0, 0.0));
		apply_collisions(&mut bodies, 0.0, 1.0);
		assert_eq!((bodies[0].x, bodies[0].y), (0.0, 0.0));
		assert!((bodies[1].x - 20.0).abs() < 1e-9);
	}

	#[test]
	fn radial_moves_toward_ring() {
		let mut bodies = [Body::new(100.0, 0.0, 5.0, 140.0)];
		apply_radial(&mut bodies, (0.0, 0.0), 0.5);
		assert!((bodies[0].x - 120.0).abs() < 1e-9);
		assert_eq!(bodies[0].y, 0.0);
	}

	#[test]
	fn center_translates_mean() {
		let mut bodies = [
			Body::new(0.0, 0.0, 5.0, 0.0),
			Body::new(10.0, 20.0, 5.0, 0.0),
		];
		apply_center(&mut bodies, (100.0, 100.0));
		let mean_x = (bodies[0].x + bodies[1].x) / 2.0;
		let mean_y = (bodies[0].y + bodies[1].y) / 2.0;
		assert!((mean_x - 100.0).abs() < 1e-9);
		assert!((mean_y - 100.0).abs() < 1e-9);
		assert!((bodies[1].x - bodies[0].x - 10.0).abs() < 1e-9);
	}

	#[test]
	fn links_relax_toward_rest_length() {
		let mut bodies = [
			Body::new(0.0, 0.0, 5.0, 0.0),
			Body::new(200.0, 0.0, 5.0, 0.0),
		];
		let links = [Link {
			source: 0,
			target: 1,
			distance: 100.0,
			strength: 1.0,
			bias: 0.5,
		}];
		apply_links(&mut bodies, &links, 1.0);
		assert!((bodies[1].x - bodies[0].x - 100.0).abs() < 1e-9);
		assert!((bodies[0].x - 50.0).abs() < 1e-9);
	}

	#[test]
	fn pinned_node_holds_its_position() {
		let mut layout = layout();
		layout.pin(3, 50.0, 60.0);
		for _ in 0..30 {
			layout.step(0.016);
		}
		assert!(layout.is_pinned(3));
		assert_eq!(layout.position(3), Some((50.0, 60.0)));
	}

	#[test]
	fn released_node_moves_again() {
		let mut layout = layout();
		layout.pin(2, 5000.0, 5000.0);
		layout.step(0.016);
		assert_eq!(layout.position(2), Some((5000.0, 5000.0)));

		layout.release(2);
		assert!(!layout.is_pinned(2));
		layout.step(0.016);
		assert_ne!(layout.position(2), Some((5000.0, 5000.0)));
	}

	#[test]
	fn simulation_cools_and_stays_finite() {
		let mut layout = layout();
		for _ in 0..400 {
			layout.step(0.016);
		}
		assert!(layout.is_settled());
		assert!(
			layout
				.positions()
				.iter()
				.all(|(x, y)| x.is_finite() && y.is_finite())
		);
	}

	#[test]
	fn dragging_reheats_a_settled_layout() {
		let mut layout = layout();
		for _ in 0..400 {
			layout.step(0.016);
		}
		assert!(layout.is_settled());
		layout.pin(1, 10.0, 10.0);
		assert!(!layout.is_settled());
		assert!(layout.alpha() >= 0.3);
	}
}
