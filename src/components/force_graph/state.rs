use std::collections::HashSet;

use super::interaction::{EdgeSnapshot, NodeSnapshot};
use super::layout::{ForceLayout, LayoutEngine, LayoutParams};
use super::types::GraphData;

/// Extra world-space slack around a node's radius for hit testing.
pub const HIT_SLOP: f64 = 4.0;
/// Half-width of the band around an edge that counts as hovering it.
pub const EDGE_HIT_HALF_WIDTH: f64 = 4.0;
/// Pan movement (pixels) below which a background press counts as a click.
const CLICK_TOLERANCE: f64 = 3.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub edge: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Everything the canvas needs between frames.
pub struct ForceGraphState {
	/// The mesh being drawn.
	pub data: GraphData,
	/// Positions and physics.
	pub layout: ForceLayout,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Node drag in progress.
	pub drag: DragState,
	/// Background pan in progress.
	pub pan: PanState,
	/// Hover highlight and its fade.
	pub hover: HoverState,
	/// Canvas width in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	/// Seconds elapsed, drives the edge pulse.
	pub flow_time: f64,
	edges: Vec<(usize, usize)>,
}

impl ForceGraphState {
	/// Lay `data` out around the centre of a `width` by `height` view.
	pub fn new(data: GraphData, width: f64, height: f64) -> Self {
		let layout = ForceLayout::new(
			&data,
			(width / 2.0, height / 2.0),
			LayoutParams::default(),
		);
		let edges = data.edge_indices();
		Self {
			data,
			layout,
			edges,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	/// False until the canvas has been measured.
	pub fn has_size(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}

	/// Canvas pixels to graph units.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Graph units to canvas pixels.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	/// Topmost node under the pointer; later nodes draw on top.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.layout
			.positions()
			.iter()
			.enumerate()
			.rev()
			.find(|&(i, &(x, y))| {
				let (dx, dy) = (x - gx, y - gy);
				(dx * dx + dy * dy).sqrt() < self.data.nodes[i].radius + HIT_SLOP
			})
			.map(|(i, _)| i)
	}

	/// First edge within hit distance of the pointer.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.layout.positions();
		self.data.edges.iter().position(|edge| {
			let (Some(s), Some(t)) = (
				self.data.index_of(&edge.source),
				self.data.index_of(&edge.target),
			) else {
				return false;
			};
			let half = (edge.weight * 0.75).max(EDGE_HIT_HALF_WIDTH);
			segment_distance((gx, gy), positions[s], positions[t]) < half
		})
	}

	/// Snapshot of node `index` at its current screen position.
	pub fn node_snapshot(&self, index: usize) -> Option<NodeSnapshot> {
		let node = self.data.nodes.get(index)?.clone();
		let (gx, gy) = self.layout.position(index)?;
		let (x, y) = self.graph_to_screen(gx, gy);
		Some(NodeSnapshot { index, node, x, y })
	}

	/// Snapshot of edge `index` with the pointer's client coordinates.
	pub fn edge_snapshot(&self, index: usize, client_x: f64, client_y: f64) -> Option<EdgeSnapshot> {
		let edge = self.data.edges.get(index)?.clone();
		Some(EdgeSnapshot {
			index,
			edge,
			client_x,
			client_y,
		})
	}

	/// Returns true when the hovered node changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hover.node == node {
			return false;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
		true
	}

	/// Returns true when the hovered edge changed.
	pub fn set_hover_edge(&mut self, edge: Option<usize>) -> bool {
		if self.hover.edge == edge {
			return false;
		}
		self.hover.edge = edge;
		true
	}

	/// Hovered, or a neighbour of the hovered node, including during fade-out.
	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	/// Hovered now or fading out.
	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	/// True while any highlight is showing.
	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Start dragging `node` and pin it where it currently is.
	pub fn begin_drag(&mut self, node: usize, sx: f64, sy: f64) {
		let Some((x, y)) = self.layout.position(node) else {
			return;
		};
		self.drag = DragState {
			active: true,
			node: Some(node),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
		self.layout.pin(node, x, y);
	}

	/// Move the dragged node with the pointer.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node.filter(|_| self.drag.active) else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		self.layout
			.pin(idx, self.drag.node_start_x + dx, self.drag.node_start_y + dy);
	}

	/// Release the dragged node back to the physics.
	pub fn end_drag(&mut self) {
		if let Some(idx) = self.drag.node.take() {
			self.layout.release(idx);
		}
		self.drag.active = false;
	}

	/// Press on empty background.
	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Follow the pointer while panning.
	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if dx.abs() > CLICK_TOLERANCE || dy.abs() > CLICK_TOLERANCE {
			self.pan.moved = true;
		}
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	/// Finish a pan; true when it never moved, i.e. a background click.
	pub fn end_pan(&mut self) -> bool {
		let clicked = self.pan.active && !self.pan.moved;
		self.pan.active = false;
		self.pan.moved = false;
		clicked
	}

	/// Zoom around the cursor, keeping the point under it fixed.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Advance physics and hover easing. Skipped until the view has a size.
	pub fn tick(&mut self, dt: f32) {
		if !self.has_size() {
			return;
		}
		self.layout.step(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	/// New canvas size; recentres the layout when non-zero.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if self.has_size() {
			self.layout.set_center(width / 2.0, height / 2.0);
		}
	}
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let len2 = abx * abx + aby * aby;
	let t = if len2 == 0.0 {
		0.0
	} else {
		(((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + abx * t, a.1 + aby * t);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::builder::credit_mesh;
	use super::*;

	fn state(width: f64, height: f64) -> ForceGraphState {
		ForceGraphState::new(credit_mesh(&mut StdRng::seed_from_u64(9)), width, height)
	}

	#[test]
	fn zero_sized_view_skips_layout() {
		let mut s = state(0.0, 0.0);
		let before = s.layout.positions();
		for _ in 0..10 {
			s.tick(0.016);
		}
		assert_eq!(s.layout.positions(), before);
		assert_eq!(s.flow_time, 0.0);

		s.resize(800.0, 600.0);
		s.tick(0.016);
		assert_ne!(s.layout.positions(), before);
	}

	#[test]
	fn hit_tests_nodes_and_background() {
		let s = state(800.0, 600.0);
		let (x, y) = s.layout.position(0).unwrap();
		assert_eq!(s.node_at_position(x, y), Some(0));
		assert_eq!(s.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn hit_tests_edges_between_nodes() {
		let s = state(800.0, 600.0);
		let hub = s.layout.position(0).unwrap();
		let employer = s.data.index_of("employer").unwrap();
		let p = s.layout.position(employer).unwrap();
		let mid = ((hub.0 + p.0) / 2.0, (hub.1 + p.1) / 2.0);
		let edge = s.edge_at_position(mid.0, mid.1).unwrap();
		assert_eq!(s.data.edges[edge].target, "employer");
	}

	#[test]
	fn drag_pins_and_release_unpins() {
		let mut s = state(800.0, 600.0);
		let idx = s.data.index_of("rent").unwrap();
		let (x, y) = s.layout.position(idx).unwrap();

		s.begin_drag(idx, x, y);
		s.drag_to(x + 40.0, y - 10.0);
		assert!(s.layout.is_pinned(idx));
		s.tick(0.016);
		let (px, py) = s.layout.position(idx).unwrap();
		assert!((px - (x + 40.0)).abs() < 1e-9);
		assert!((py - (y - 10.0)).abs() < 1e-9);

		s.end_drag();
		assert!(!s.drag.active);
		assert!(!s.layout.is_pinned(idx));
	}

	#[test]
	fn still_press_on_background_is_a_click() {
		let mut s = state(800.0, 600.0);
		s.begin_pan(10.0, 10.0);
		s.pan_to(11.0, 10.0);
		assert!(s.end_pan());
		assert_eq!(s.transform.x, 1.0);

		s.transform = ViewTransform::default();
		s.begin_pan(10.0, 10.0);
		s.pan_to(60.0, 10.0);
		assert!(!s.end_pan());
		assert_eq!(s.transform.x, 50.0);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut s = state(800.0, 600.0);
		let before = s.screen_to_graph(200.0, 150.0);
		s.zoom(200.0, 150.0, -1.0);
		assert!((s.transform.k - 1.1).abs() < 1e-9);
		let after = s.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut s = state(800.0, 600.0);
		let upi = s.data.index_of("upi").unwrap();
		assert!(s.set_hover(Some(upi)));
		assert!(!s.set_hover(Some(upi)));
		assert!(s.is_highlighted(0));
		assert!(s.is_highlighted(s.data.index_of("bill").unwrap()));
		assert!(!s.is_highlighted(s.data.index_of("rent").unwrap()));
	}

	#[test]
	fn snapshot_reports_screen_position() {
		let mut s = state(800.0, 600.0);
		s.transform = ViewTransform {
			x: 10.0,
			y: 20.0,
			k: 2.0,
		};
		let (gx, gy) = s.layout.position(1).unwrap();
		let snap = s.node_snapshot(1).unwrap();
		assert_eq!((snap.x, snap.y), (gx * 2.0 + 10.0, gy * 2.0 + 20.0));
		assert_eq!(snap.node.id, "employer");
	}
}
