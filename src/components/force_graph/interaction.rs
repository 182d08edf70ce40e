//! Selection and hover cells for the mesh view.
//!
//! Each slot is overwritten by the latest pointer event. A selected node
//! takes visual priority: while one is selected, hover tooltips stay hidden.

use super::types::{MeshEdge, MeshNode};

/// A node as it looked when the pointer event fired.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
	/// Node index in the graph.
	pub index: usize,
	/// Copy of the node data.
	pub node: MeshNode,
	/// Canvas pixel position at event time.
	pub x: f64,
	/// See `x`.
	pub y: f64,
}

/// An edge plus the raw client coordinates of the pointer that entered it.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSnapshot {
	/// Edge index in the graph.
	pub index: usize,
	/// Copy of the edge data.
	pub edge: MeshEdge,
	/// Pointer x in client coordinates.
	pub client_x: f64,
	/// Pointer y in client coordinates.
	pub client_y: f64,
}

impl EdgeSnapshot {
	/// Transaction count, or a dash when the edge has no metrics.
	pub fn tx_count_label(&self) -> String {
		self.edge
			.metrics
			.as_ref()
			.map(|m| m.tx_count.to_string())
			.unwrap_or_else(|| "—".into())
	}
}

/// What the mesh view is pointing at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
	selected: Option<NodeSnapshot>,
	hovered_node: Option<NodeSnapshot>,
	hovered_edge: Option<EdgeSnapshot>,
}

impl InteractionState {
	/// Node shown in the detail panel.
	pub fn selected(&self) -> Option<&NodeSnapshot> {
		self.selected.as_ref()
	}

	/// Last node entered.
	pub fn hovered_node(&self) -> Option<&NodeSnapshot> {
		self.hovered_node.as_ref()
	}

	/// Last edge entered.
	pub fn hovered_edge(&self) -> Option<&EdgeSnapshot> {
		self.hovered_edge.as_ref()
	}

	/// Ignored while a node is selected.
	pub fn hover_node(&mut self, snapshot: NodeSnapshot) {
		if self.selected.is_none() {
			self.hovered_node = Some(snapshot);
		}
	}

	/// Pointer left the node.
	pub fn leave_node(&mut self) {
		self.hovered_node = None;
	}

	/// Pointer entered an edge.
	pub fn hover_edge(&mut self, snapshot: EdgeSnapshot) {
		self.hovered_edge = Some(snapshot);
	}

	/// Pointer left the edge.
	pub fn leave_edge(&mut self) {
		self.hovered_edge = None;
	}

	/// Select a node and drop every hover tooltip.
	pub fn select(&mut self, snapshot: NodeSnapshot) {
		self.selected = Some(snapshot);
		self.hovered_node = None;
		self.hovered_edge = None;
	}

	/// Background click.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// True when node `index` is selected.
	pub fn is_selected(&self, index: usize) -> bool {
		self.selected.as_ref().is_some_and(|s| s.index == index)
	}

	/// Node tooltip to draw, if any. Nodes without metrics have none.
	pub fn node_tooltip(&self) -> Option<&NodeSnapshot> {
		if self.selected.is_some() {
			return None;
		}
		self.hovered_node
			.as_ref()
			.filter(|s| !s.node.metrics.is_empty())
	}

	/// Edge tooltip to draw, hidden while a node is selected.
	pub fn edge_tooltip(&self) -> Option<&EdgeSnapshot> {
		if self.selected.is_some() {
			return None;
		}
		self.hovered_edge.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::builder::credit_mesh;
	use super::super::types::GraphData;
	use super::*;

	fn mesh() -> GraphData {
		credit_mesh(&mut StdRng::seed_from_u64(5))
	}

	fn node(data: &GraphData, id: &str) -> NodeSnapshot {
		let index = data.index_of(id).unwrap();
		NodeSnapshot {
			index,
			node: data.nodes[index].clone(),
			x: 10.0,
			y: 20.0,
		}
	}

	fn edge(data: &GraphData, target: &str) -> EdgeSnapshot {
		let index = data.edges.iter().position(|e| e.target == target).unwrap();
		EdgeSnapshot {
			index,
			edge: data.edges[index].clone(),
			client_x: 300.0,
			client_y: 200.0,
		}
	}

	#[test]
	fn hover_shows_tooltip_until_leave() {
		let data = mesh();
		let mut state = InteractionState::default();
		state.hover_node(node(&data, "upi"));
		assert_eq!(state.node_tooltip().map(|s| s.node.id.as_str()), Some("upi"));
		state.leave_node();
		assert!(state.node_tooltip().is_none());
	}

	#[test]
	fn selecting_clears_hover_tooltips() {
		let data = mesh();
		let mut state = InteractionState::default();
		state.hover_node(node(&data, "rent"));
		state.hover_edge(edge(&data, "rent"));
		state.select(node(&data, "savings"));

		assert!(state.hovered_node().is_none());
		assert!(state.node_tooltip().is_none());
		assert!(state.edge_tooltip().is_none());
		assert!(state.is_selected(data.index_of("savings").unwrap()));
	}

	#[test]
	fn hover_is_ignored_while_selected() {
		let data = mesh();
		let mut state = InteractionState::default();
		state.select(node(&data, "employer"));
		state.hover_node(node(&data, "p2p"));
		assert!(state.hovered_node().is_none());

		state.hover_edge(edge(&data, "p2p"));
		assert!(state.hovered_edge().is_some());
		assert!(state.edge_tooltip().is_none());
	}

	#[test]
	fn background_click_clears_selection() {
		let data = mesh();
		let mut state = InteractionState::default();
		state.select(node(&data, "merchant"));
		state.clear_selection();
		assert!(state.selected().is_none());

		state.hover_node(node(&data, "merchant"));
		assert!(state.node_tooltip().is_some());
	}

	#[test]
	fn leaf_nodes_have_no_tooltip() {
		let data = mesh();
		let mut state = InteractionState::default();
		state.hover_node(node(&data, "lux"));
		assert!(state.hovered_node().is_some());
		assert!(state.node_tooltip().is_none());
	}

	#[test]
	fn edge_tooltip_keeps_client_coordinates() {
		let data = mesh();
		let mut state = InteractionState::default();
		state.hover_edge(edge(&data, "employer"));
		let tip = state.edge_tooltip().unwrap();
		assert_eq!((tip.client_x, tip.client_y), (300.0, 200.0));
		assert_ne!(tip.tx_count_label(), "—");

		state.hover_edge(edge(&data, "inc_var"));
		assert_eq!(state.edge_tooltip().unwrap().tx_count_label(), "—");
		state.leave_edge();
		assert!(state.edge_tooltip().is_none());
	}
}
