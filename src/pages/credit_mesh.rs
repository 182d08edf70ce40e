use leptos::prelude::*;
use log::{error, info};

use crate::components::charts::Sparkline;
use crate::components::force_graph::{
	EdgeSnapshot, ForceGraphCanvas, InteractionState, NodeSnapshot, NodeStatus, credit_mesh,
};

const STATUS_LEGEND: [NodeStatus; 3] = [NodeStatus::Stable, NodeStatus::Neutral, NodeStatus::Volatile];

fn badge_class(status: NodeStatus) -> &'static str {
	match status {
		NodeStatus::Stable => "badge badge-green",
		NodeStatus::Volatile => "badge badge-red",
		_ => "badge badge-blue",
	}
}

#[component]
fn NodeTooltip(snap: NodeSnapshot) -> impl IntoView {
	let style = format!(
		"left: {}px; top: {}px;",
		snap.x,
		snap.y - snap.node.radius - 12.0
	);
	view! {
		<div class="mesh-tooltip" style=style>
			<div class="tooltip-title">
				<span class="dot" style=format!("background: {}", snap.node.color())></span>
				<span>{snap.node.label.clone()}</span>
			</div>
			{snap
				.node
				.metrics
				.iter()
				.map(|m| {
					view! {
						<div class="tooltip-row">
							<span class="muted">{m.label.clone()}</span>
							<span>{m.value.clone()}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

#[component]
fn EdgeTooltip(snap: EdgeSnapshot) -> impl IntoView {
	view! {
		<div
			class="edge-tooltip"
			style=format!("left: {}px; top: {}px;", snap.client_x + 12.0, snap.client_y + 12.0)
		>
			"Tx Count: "
			<span class="mono">{snap.tx_count_label()}</span>
		</div>
	}
}

#[component]
fn DetailPanel(snap: NodeSnapshot, interaction: RwSignal<InteractionState>) -> impl IntoView {
	let node = snap.node;
	let trend_color = if node.status == NodeStatus::Volatile {
		"#ef4444"
	} else {
		"#22c55e"
	};
	let trend = (!node.trend.is_empty()).then(|| {
		view! {
			<div class="panel-card trend">
				<span class="muted">"3-Month Trend"</span>
				<Sparkline values=node.trend.clone() color=trend_color />
			</div>
		}
	});

	view! {
		<aside class="side-panel">
			<div class="panel-head">
				<div>
					<h2>{node.label.clone()}</h2>
					<span class=badge_class(node.status)>{node.status.as_str()} " Signal"</span>
				</div>
				<button class="icon-button" on:click=move |_| interaction.update(|i| i.clear_selection())>
					"✕"
				</button>
			</div>
			{trend}
			<div class="metric-grid">
				{node
					.metrics
					.iter()
					.map(|m| {
						view! {
							<div class="panel-card">
								<div class="muted small">{m.label.clone()}</div>
								<div class="metric-value">{m.value.clone()}</div>
							</div>
						}
					})
					.collect_view()}
			</div>
			<div class="panel-card insight">
				<h3>"Behavioral Insight"</h3>
				<p>{node.status.insight()}</p>
			</div>
		</aside>
	}
}

/// Credit Mesh page: the relationship graph with tooltips and a detail panel.
#[component]
pub fn CreditMesh() -> impl IntoView {
	let interaction = RwSignal::new(InteractionState::default());
	let node_tip = Memo::new(move |_| interaction.with(|i| i.node_tooltip().cloned()));
	let edge_tip = Memo::new(move |_| interaction.with(|i| i.edge_tooltip().cloned()));
	let selected = Memo::new(move |_| interaction.with(|i| i.selected().cloned()));
	let mesh = credit_mesh(&mut rand::thread_rng());
	let graph = match mesh.validate() {
		Ok(()) => {
			info!(
				"credit mesh: {} nodes, {} edges",
				mesh.nodes.len(),
				mesh.edges.len()
			);
			Ok(mesh)
		}
		Err(e) => {
			error!("credit mesh template is invalid: {e}");
			Err(e)
		}
	};

	view! {
		<div class="page mesh-page">
			<header class="page-header">
				<h1>"Credit Mesh " <span class="tag">"BETA"</span></h1>
				<div class="legend">
					{STATUS_LEGEND
						.iter()
						.map(|s| {
							view! {
								<span class="legend-item">
									<span class="dot" style=format!("background: {}", s.color())></span>
									{s.as_str()}
								</span>
							}
						})
						.collect_view()}
				</div>
			</header>
			<ErrorBoundary fallback=|errors| {
				view! {
					<div class="error-panel">
						<h2>"The mesh could not be drawn"</h2>
						<ul>
							{move || {
								errors
									.get()
									.into_iter()
									.map(|(_, e)| view! { <li>{e.to_string()}</li> })
									.collect_view()
							}}
						</ul>
					</div>
				}
			}>
				<div class="mesh-viewport">
					{graph.map(|data| view! { <ForceGraphCanvas data=data interaction=interaction /> })}
					{move || node_tip.get().map(|snap| view! { <NodeTooltip snap=snap /> })}
					{move || edge_tip.get().map(|snap| view! { <EdgeTooltip snap=snap /> })}
					{move || {
						selected
							.get()
							.map(|snap| view! { <DetailPanel snap=snap interaction=interaction /> })
					}}
				</div>
			</ErrorBoundary>
			<p class="hint">"Drag nodes to reposition. Scroll to zoom. Drag the background to pan."</p>
		</div>
	}
}
