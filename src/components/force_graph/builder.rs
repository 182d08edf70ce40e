//! The fixed credit mesh template shown on the Credit Mesh page.

use rand::Rng;

use super::types::{EdgeMetrics, GraphData, MeshEdge, MeshNode, Metric, NodeRole, NodeStatus};

/// Id of the borrower node every primary links from.
pub const HUB_ID: &str = "user";

struct PrimarySpec {
	id: &'static str,
	label: &'static str,
	group: &'static str,
	status: NodeStatus,
	importance: u32,
	metrics: [(&'static str, &'static str); 3],
	trend: [f64; 4],
}

const PRIMARIES: &[PrimarySpec] = &[
	PrimarySpec {
		id: "employer",
		label: "EMPLOYER / GIG",
		group: "income",
		status: NodeStatus::Stable,
		importance: 9,
		metrics: [
			("Income Consistency", "82%"),
			("Avg Monthly", "₹28,500"),
			("Variance", "Low"),
		],
		trend: [28000.0, 28200.0, 28500.0, 28500.0],
	},
	PrimarySpec {
		id: "upi",
		label: "UPI NETWORK",
		group: "payment",
		status: NodeStatus::Neutral,
		importance: 7,
		metrics: [
			("Monthly Volume", "₹18,200"),
			("Recurring", "64%"),
			("Volatility", "Medium"),
		],
		trend: [15000.0, 19000.0, 16000.0, 18200.0],
	},
	PrimarySpec {
		id: "rent",
		label: "RENT / UTILITIES",
		group: "obligation",
		status: NodeStatus::Stable,
		importance: 8,
		metrics: [
			("On-Time Rate", "95%"),
			("Missed (6m)", "0"),
			("Avg Payment", "₹12,000"),
		],
		trend: [12000.0, 12000.0, 12000.0, 12000.0],
	},
	PrimarySpec {
		id: "merchant",
		label: "MERCHANT NETWORK",
		group: "spending",
		status: NodeStatus::Volatile,
		importance: 8,
		metrics: [
			("Spending Volatility", "High"),
			("Essential Ratio", "72%"),
			("Spikes", "2/mo"),
		],
		trend: [5000.0, 12000.0, 6000.0, 15000.0],
	},
	PrimarySpec {
		id: "savings",
		label: "SAVINGS ACCOUNT",
		group: "asset",
		status: NodeStatus::Stable,
		importance: 7,
		metrics: [
			("Avg Monthly", "₹3,200"),
			("Consistency", "78%"),
			("Buffer", "2.5 mo"),
		],
		trend: [3000.0, 3100.0, 3000.0, 3200.0],
	},
	PrimarySpec {
		id: "p2p",
		label: "P2P NETWORK",
		group: "social",
		status: NodeStatus::Neutral,
		importance: 6,
		metrics: [
			("Borrowing Events", "1"),
			("Transfers", "Moderate"),
			("Network Risk", "Low"),
		],
		trend: [2.0, 0.0, 1.0, 1.0],
	},
];

/// Leaf breakdowns keyed by their primary node.
const CLUSTERS: &[(&str, &[(&str, &str, NodeStatus)])] = &[
	(
		"employer",
		&[
			("inc_stable", "Salary", NodeStatus::Stable),
			("inc_var", "Bonus", NodeStatus::Neutral),
		],
	),
	(
		"upi",
		&[
			("bill", "Bills", NodeStatus::Stable),
			("groceries", "Store", NodeStatus::Neutral),
		],
	),
	(
		"merchant",
		&[
			("lux", "Luxury", NodeStatus::Volatile),
			("subs", "Subs", NodeStatus::Stable),
		],
	),
	("savings", &[("rd", "FD", NodeStatus::Stable)]),
];

const PRIMARY_DISTANCE: f64 = 120.0;
const PRIMARY_STRENGTH: f64 = 0.8;
const SECONDARY_DISTANCE: f64 = 40.0;
const SECONDARY_STRENGTH: f64 = 0.5;
const SECONDARY_RADIUS: f64 = 8.0;
const SECONDARY_IMPORTANCE: u32 = 3;

/// Build the mesh. Topology is fixed; only the hub edge metrics are drawn
/// from `rng`, so every mount may show different transaction numbers.
pub fn credit_mesh<R: Rng + ?Sized>(rng: &mut R) -> GraphData {
	let mut nodes = vec![MeshNode {
		id: HUB_ID.into(),
		group: "user".into(),
		label: "USER".into(),
		role: NodeRole::Hub,
		importance: 10,
		radius: 30.0,
		status: NodeStatus::Stable,
		metrics: vec![Metric::new("Score", "810"), Metric::new("Risk", "Low")],
		trend: Vec::new(),
	}];
	let mut edges = Vec::new();

	for p in PRIMARIES {
		nodes.push(MeshNode {
			id: p.id.into(),
			group: p.group.into(),
			label: p.label.into(),
			role: NodeRole::Primary,
			importance: p.importance,
			radius: 15.0 + p.importance as f64,
			status: p.status,
			metrics: p.metrics.iter().map(|&(l, v)| Metric::new(l, v)).collect(),
			trend: p.trend.to_vec(),
		});
		edges.push(MeshEdge {
			source: HUB_ID.into(),
			target: p.id.into(),
			distance: PRIMARY_DISTANCE,
			strength: PRIMARY_STRENGTH,
			weight: p.importance as f64 / 2.0,
			stable: p.status == NodeStatus::Stable,
			active: p.status == NodeStatus::Volatile || p.id == "upi",
			metrics: Some(EdgeMetrics {
				tx_count: rng.gen_range(10..60),
				avg_value: rng.gen_range(500..5500),
			}),
		});
	}

	for &(parent, kids) in CLUSTERS {
		for &(id, label, status) in kids {
			nodes.push(MeshNode {
				id: id.into(),
				group: parent.into(),
				label: label.into(),
				role: NodeRole::Secondary,
				importance: SECONDARY_IMPORTANCE,
				radius: SECONDARY_RADIUS,
				status,
				metrics: Vec::new(),
				trend: Vec::new(),
			});
			edges.push(MeshEdge {
				source: parent.into(),
				target: id.into(),
				distance: SECONDARY_DISTANCE,
				strength: SECONDARY_STRENGTH,
				weight: 1.0,
				stable: true,
				active: false,
				metrics: None,
			});
		}
	}

	GraphData { nodes, edges }
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::types::GraphError;
	use super::*;

	#[test]
	fn template_is_valid() {
		let data = credit_mesh(&mut StdRng::seed_from_u64(7));
		assert_eq!(data.validate(), Ok(()));
		assert_eq!(data.nodes.len(), 1 + 6 + 7);
		assert_eq!(data.edges.len(), 6 + 7);
		assert_eq!(data.hub().map(|n| n.id.as_str()), Some(HUB_ID));
		assert!(data.edges.iter().all(|e| e.target != HUB_ID));
	}

	#[test]
	fn topology_is_seed_independent() {
		let a = credit_mesh(&mut StdRng::seed_from_u64(1));
		let b = credit_mesh(&mut StdRng::seed_from_u64(2));
		assert_eq!(a.nodes, b.nodes);
		let ends = |g: &GraphData| {
			g.edges
				.iter()
				.map(|e| (e.source.clone(), e.target.clone()))
				.collect::<Vec<_>>()
		};
		assert_eq!(ends(&a), ends(&b));
	}

	#[test]
	fn same_seed_pins_edge_metrics() {
		let a = credit_mesh(&mut StdRng::seed_from_u64(42));
		let b = credit_mesh(&mut StdRng::seed_from_u64(42));
		assert_eq!(a, b);
	}

	#[test]
	fn edge_metrics_only_on_hub_edges_and_in_range() {
		let data = credit_mesh(&mut StdRng::seed_from_u64(3));
		for edge in &data.edges {
			match &edge.metrics {
				Some(m) => {
					assert_eq!(edge.source, HUB_ID);
					assert!((10..60).contains(&m.tx_count));
					assert!((500..5500).contains(&m.avg_value));
				}
				None => assert_ne!(edge.source, HUB_ID),
			}
		}
	}

	#[test]
	fn primary_edges_follow_status() {
		let data = credit_mesh(&mut StdRng::seed_from_u64(0));
		let edge = |t: &str| data.edges.iter().find(|e| e.target == t).unwrap();
		assert!(edge("employer").stable);
		assert!(!edge("employer").active);
		assert!(!edge("merchant").stable);
		assert!(edge("merchant").active);
		assert!(edge("upi").active);
		assert_eq!(edge("employer").weight, 4.5);
		assert_eq!(edge("lux").distance, 40.0);

		let employer = &data.nodes[data.index_of("employer").unwrap()];
		assert_eq!(employer.radius, 24.0);
	}

	#[test]
	fn validate_rejects_broken_graphs() {
		let mut data = credit_mesh(&mut StdRng::seed_from_u64(0));
		data.edges.push(MeshEdge {
			source: "rent".into(),
			target: HUB_ID.into(),
			distance: MeshEdge::DEFAULT_DISTANCE,
			strength: 0.5,
			weight: 1.0,
			stable: true,
			active: false,
			metrics: None,
		});
		assert_eq!(
			data.validate(),
			Err(GraphError::HubHasIncoming("rent".into()))
		);

		let mut data = credit_mesh(&mut StdRng::seed_from_u64(0));
		let dup = data.nodes[1].clone();
		data.nodes.push(dup);
		assert_eq!(
			data.validate(),
			Err(GraphError::DuplicateNode("employer".into()))
		);

		let mut data = credit_mesh(&mut StdRng::seed_from_u64(0));
		data.nodes.remove(0);
		data.edges.retain(|e| e.source != HUB_ID);
		assert_eq!(data.validate(), Err(GraphError::MissingHub));

		let mut data = credit_mesh(&mut StdRng::seed_from_u64(0));
		data.edges[0].target = "ghost".into();
		assert_eq!(
			data.validate(),
			Err(GraphError::UnknownEndpoint("ghost".into()))
		);
	}
}
