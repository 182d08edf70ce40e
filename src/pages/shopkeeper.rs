use std::time::Duration;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use log::info;

use crate::app_state::AppState;
use crate::components::timers::ViewTimers;
use crate::financing::{LoanStatus, SUBMIT_DELAY_MS, StructuredRequest, format_rupees};

const SHOP_LINE: &str = "Shop: Kisan Sewa Kendra (Partner ID: #KSK-901)";
const CREDIT_LIMIT: u32 = 250_000;

fn percent(v: f64) -> String {
	format!("{:.0}%", v * 100.0)
}

#[component]
fn InsightCard(title: &'static str, value: String, label: &'static str, color: &'static str) -> impl IntoView {
	view! {
		<div class="insight-card">
			<div class="section-label" style=format!("color: {color}")>{title}</div>
			<div class="big">{value}</div>
			<div class="muted small">{label}</div>
		</div>
	}
}

#[component]
fn FlowTriangle() -> impl IntoView {
	view! {
		<div class="flow-triangle">
			<svg width="300" height="150" viewBox="0 0 300 150">
				<circle cx="150" cy="20" r="5" fill="#3b82f6" />
				<circle cx="50" cy="130" r="5" fill="#10b981" />
				<circle cx="250" cy="130" r="5" fill="#fff" />
				<path class="flow-path" d="M 150 20 L 50 130" stroke="#3b82f6" stroke-width="1" stroke-dasharray="4 2" />
				<path class="flow-path" d="M 50 130 L 250 130" stroke="#10b981" stroke-width="1" stroke-dasharray="4 2" />
				<path class="flow-path" d="M 250 130 L 150 20" stroke="#fff" stroke-width="1" stroke-dasharray="4 2" />
			</svg>
			<div class="flow-labels small">
				<span>"🪙 Bank Funds Shop"</span>
				<span>"🚚 Shop Supplies User"</span>
				<span>"🪙 User Repays Bank"</span>
			</div>
		</div>
	}
}

/// Merchant view of the structured request; its decision goes back to the borrower.
#[component]
pub fn Shopkeeper() -> impl IntoView {
	let app = AppState::expect();
	let navigate = use_navigate();
	let processing = RwSignal::new(false);
	let timers = ViewTimers::new();
	let request = app
		.structured_request
		.get_untracked()
		.unwrap_or_default();

	let decide = move |approved: bool| {
		if processing.get_untracked() {
			return;
		}
		processing.set(true);
		let navigate = navigate.clone();
		timers.after(
			move || {
				let _ = processing.try_set(false);
				info!("shopkeeper {}", if approved { "approved" } else { "declined" });
				app.set_loan_status(LoanStatus::structured(approved));
				navigate("/dashboard", Default::default());
			},
			Duration::from_millis(SUBMIT_DELAY_MS),
		);
	};
	let decline = {
		let decide = decide.clone();
		move |_| decide(false)
	};
	let approve = move |_| decide(true);

	let items = request
		.items
		.iter()
		.map(|item| {
			view! {
				<div class="inventory-row">
					<span>{item.name.clone()}</span>
					<span>
						<span class="muted">{format!("x{}", item.qty)}</span>
						<span class="line-total">{format!("₹{}", format_rupees(item.line_total()))}</span>
					</span>
				</div>
			}
		})
		.collect_view();
	let StructuredRequest {
		user_name,
		user_location,
		total,
		risk_score,
		gnn_confidence,
		tcn_stability,
		rejection_reason,
		..
	} = request;

	view! {
		<div class="page shopkeeper-page">
			<header class="page-header">
				<div>
					<h1>"🏪 Merchant Node Dashboard"</h1>
					<p class="muted small">{SHOP_LINE}</p>
				</div>
				<div class="right">
					<div class="section-label">"Credit Limit"</div>
					<div class="mono accent">{format!("₹{} Available", format_rupees(CREDIT_LIMIT))}</div>
				</div>
			</header>

			<main class="shopkeeper-grid">
				<section class="requests">
					<h2 class="section-label">"Incoming Requests"</h2>
					<div class="request-card active">
						<div class="row">
							<div>
								<h3>{user_name}</h3>
								<p class="muted tiny">{user_location}</p>
							</div>
							<span class="chip accent">"NEW"</span>
						</div>
						<div class="row small">
							<span class="muted">"Structured Total"</span>
							<span class="mono">{format!("₹{}", format_rupees(total))}</span>
						</div>
						<div class="progress"><div class="progress-fill"></div></div>
						<p class="accent tiny">"AI Risk Check: Passed ✅"</p>
					</div>
					<div class="request-card old">
						<div class="row">
							<h3 class="small">"Suresh Verma"</h3>
							<span class="muted tiny">"2 days ago"</span>
						</div>
						<div class="row tiny">
							<span class="muted">"₹4,200"</span>
							<span class="good">"Approved"</span>
						</div>
					</div>
				</section>

				<section class="transparency">
					<div class="panel">
						<h2>"🛡 AI Risk Transparency Panel"</h2>
						<div class="insight-grid">
							<InsightCard
								title="Composite Risk"
								value=risk_score.to_string()
								label="Low Risk (GNN + TCN)"
								color="#4ade80"
							/>
							<InsightCard
								title="Relational Stability"
								value=percent(gnn_confidence)
								label="Strong Network Ties"
								color="#60a5fa"
							/>
							<InsightCard
								title="Temporal Discipline"
								value=percent(tcn_stability)
								label="Consistent Repayment"
								color="#c084fc"
							/>
						</div>
						<div class="rejection">
							<div class="bad small">"⚠ REASON FOR DIRECT LOAN REJECTION"</div>
							<p class="small italic">{format!("\"{rejection_reason}\"")}</p>
							<p class="muted tiny">
								"* Structured financing mitigates this risk by ensuring funds are used specifically for productivity gains (inputs) rather than cash liquidity."
							</p>
						</div>
					</div>

					<div class="two-col">
						<div class="panel">
							<h3 class="section-label">"Requested Inventory"</h3>
							{items}
							<div class="inventory-row total">
								<span class="section-label">"Total Supply Credit"</span>
								<span class="big accent mono">{format!("₹{}", format_rupees(total))}</span>
							</div>
						</div>
						<FlowTriangle />
					</div>

					<div class="actions row">
						<button class="reject" on:click=decline disabled=move || processing.get()>
							"Decline Credit"
						</button>
						<button class="approve wide" on:click=approve disabled=move || processing.get()>
							{move || {
								if processing.get() { "⟳" } else { "✔ Approve Structured Financing" }
							}}
						</button>
					</div>
				</section>
			</main>
		</div>
	}
}
