use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};

use crate::app_state::AppState;
use crate::components::charts::AreaSparkline;
use crate::components::timers::ViewTimers;
use crate::config::AppConfig;
use crate::decision::{
	APPLICATION_ID, CELEBRATION_MS, GNN_HISTORY, RECOMMENDATION, TCN_DETAILS, TCN_HISTORY,
	TCN_STATUS, TERMS, risk_ring_offset, shap_bar, shap_contributions,
};
use crate::financing::LoanStatus;

const GNN_COLOR: &str = "#a855f7";
const TCN_COLOR: &str = "#3b82f6";

#[component]
fn ModelCard(
	title: &'static str,
	#[prop(into)] score: Signal<f64>,
	#[prop(into)] status: Signal<String>,
	#[prop(into)] details: Signal<Vec<(&'static str, String)>>,
	history: Vec<f64>,
	color: &'static str,
) -> impl IntoView {
	let strong = move || score.get() > 0.7;
	view! {
		<div class="model-card">
			<h3>{title}</h3>
			<div class="model-card-body">
				<div>
					<div class="big">
						{move || score.get().to_string()}
						<span class="muted small">" / 1.0"</span>
					</div>
					<div class:good=strong class:warn=move || !strong()>
						{move || if strong() { "✔ " } else { "⚠ " }}
						{move || status.get()}
					</div>
				</div>
				<AreaSparkline values=history color=color />
			</div>
			<div class="detail-rows">
				{move || {
					details
						.get()
						.into_iter()
						.map(|(label, value)| {
							view! {
								<div class="detail-row">
									<span class="muted">{label}</span>
									<span>{value}</span>
								</div>
							}
						})
						.collect_view()
				}}
			</div>
		</div>
	}
}

#[component]
fn ShapChart() -> impl IntoView {
	view! {
		<div class="shap-chart">
			{shap_contributions()
				.into_iter()
				.map(|f| {
					let (left, width) = shap_bar(f.value);
					let color = if f.is_positive() { "#10b981" } else { "#ef4444" };
					view! {
						<div class="shap-row" title=format!("{:+.2}", f.value)>
							<span class="shap-name">{f.name}</span>
							<div class="shap-track">
								<div
									class="shap-bar"
									style=format!(
										"left: {:.2}%; width: {:.2}%; background: {color}",
										left * 100.0,
										width * 100.0,
									)
								></div>
							</div>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

/// Decision Engine page: live GNN feed, fixed TCN output and the sanction buttons.
#[component]
pub fn DecisionEngine() -> impl IntoView {
	let app = AppState::expect();
	let config = expect_context::<AppConfig>();
	let tcn = config.tcn_fixed_score;
	let sanctioned = RwSignal::new(false);
	let celebrating = RwSignal::new(false);
	let timers = ViewTimers::new();

	let endpoint = config.risk_endpoint.clone();
	let poll = move || {
		let endpoint = endpoint.clone();
		spawn_local(async move {
			let outcome = crate::risk::fetch_risk(&endpoint).await;
			let Some(mut board) = app.risk.try_get_untracked() else {
				return;
			};
			if board.record(outcome, tcn) {
				app.risk.set(board);
			}
		});
	};
	poll();
	match set_interval_with_handle(poll, config.poll_interval) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => warn!("risk polling disabled: {e:?}"),
	}

	let gnn_score = Signal::derive(move || app.risk.with(|r| r.gnn.score));
	let gnn_status = Signal::derive(move || app.risk.with(|r| r.gnn.status.clone()));
	let gnn_details = Signal::derive(move || {
		app.risk.with(|r| {
			vec![
				("Network Density", r.gnn.network_density.clone()),
				("Relationship Strength", r.gnn.relationship_strength.clone()),
				("Volatility Exposure", r.gnn.volatility_exposure.clone()),
			]
		})
	});
	let tcn_details = TCN_DETAILS
		.iter()
		.map(|&(label, value)| (label, value.to_string()))
		.collect::<Vec<_>>();
	let combined = move || app.risk.with(|r| r.combined_risk);

	let sanction = move |_| {
		debug!("sanction pressed for {APPLICATION_ID}");
		sanctioned.set(true);
		celebrating.set(true);
		app.set_loan_status(LoanStatus::Approved);
		timers.after(
			move || {
				let _ = celebrating.try_set(false);
			},
			Duration::from_millis(CELEBRATION_MS),
		);
	};
	let reject = move |_| app.set_loan_status(LoanStatus::Rejected);

	view! {
		<div class="page decision-page">
			<Show when=move || celebrating.get()>
				<div class="celebration">"🎉"</div>
			</Show>
			<header class="page-header">
				<div>
					<h1>"Decision Engine"</h1>
					<p class="muted small">"Multi-Model AI Underwriting System"</p>
				</div>
				<div class="right">
					<div class="section-label">"Application ID"</div>
					<div class="mono accent">{APPLICATION_ID}</div>
				</div>
			</header>

			<main class="decision-grid">
				<section class="decision-models">
					<div class="two-col">
						<ModelCard
							title="Relational Stability (GNN)"
							score=gnn_score
							status=gnn_status
							details=gnn_details
							history=GNN_HISTORY.to_vec()
							color=GNN_COLOR
						/>
						<ModelCard
							title="Temporal Consistency (TCN)"
							score=Signal::stored(tcn)
							status=Signal::stored(TCN_STATUS.to_string())
							details=Signal::stored(tcn_details)
							history=TCN_HISTORY.to_vec()
							color=TCN_COLOR
						/>
					</div>
					<div class="panel">
						<div class="panel-title">
							<h3>"Feature Contribution Analysis (SHAP)"</h3>
							<div class="muted small">
								<span class="dot green"></span>
								" Positive Impact "
								<span class="dot red"></span>
								" Negative Impact"
							</div>
						</div>
						<ShapChart />
					</div>
				</section>

				<section class="decision-side">
					<div class="panel center">
						<h3 class="section-label">"Combined Risk Score"</h3>
						<div class="risk-ring">
							<svg viewBox="0 0 192 192">
								<circle cx="96" cy="96" r="88" stroke="#1f2937" stroke-width="12" fill="none" />
								<circle
									cx="96"
									cy="96"
									r="88"
									stroke="#10b981"
									stroke-width="12"
									fill="none"
									stroke-linecap="round"
									stroke-dasharray="552"
									stroke-dashoffset=move || risk_ring_offset(combined()).to_string()
									transform="rotate(-90 96 96)"
								/>
							</svg>
							<div class="risk-ring-label">
								<span class="huge">{move || combined().to_string()}</span>
								<span class="good small">"Low Risk"</span>
							</div>
						</div>
						<div class="muted small chip">
							{move || format!("Weighted(GNN: {} + TCN: {tcn})", gnn_score.get())}
						</div>
					</div>

					<div class="panel recommendation">
						<h3 class="section-label center">"AI Recommendation"</h3>
						<div class="center">
							<div class="verdict">"APPROVE"</div>
							<p class="muted small">{RECOMMENDATION}</p>
						</div>
						<div class="terms">
							<div class="detail-row">
								<span class="muted">"Term"</span>
								<span>{TERMS.term}</span>
							</div>
							<div class="detail-row">
								<span class="muted">"Interest Rate"</span>
								<span class="good">{TERMS.rate}</span>
							</div>
							<div class="detail-row total">
								<span class="muted">"Loan Amount"</span>
								<span class="big">{TERMS.amount}</span>
							</div>
						</div>
						<Show
							when=move || sanctioned.get()
							fallback=move || {
								view! {
									<div class="actions">
										<button class="approve" on:click=sanction>
											"✔ Sanction Loan"
										</button>
										<button class="reject" on:click=reject>
											"✕ Reject Loan"
										</button>
									</div>
								}
							}
						>
							<div class="sanctioned">"Loan Sanctioned Successfully"</div>
						</Show>
					</div>
				</section>
			</main>

			<footer class="muted small center">
				"Decision generated using multi-model AI underwriting system (GNN + TCN + Agent Swarm)."
			</footer>
		</div>
	}
}
