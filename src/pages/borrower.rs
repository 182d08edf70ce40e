use std::time::Duration;

use leptos::prelude::*;
use leptos_router::components::A;
use log::{debug, info, warn};

use crate::app_state::AppState;
use crate::borrower::{IMPROVEMENT_DELAY_MS, Tone, headline_metrics, history};
use crate::components::charts::CashFlowChart;
use crate::components::timers::ViewTimers;
use crate::financing::{
	DEFAULT_LOAN_AMOUNT, FinancingError, FinancingFlow, FinancingStep, LoanStatus, NEARBY_SHOPS,
	SHOP_ITEMS, SUBMIT_DELAY_MS, format_rupees, parse_loan_amount,
};

const STEP_LABELS: [&str; 4] = ["AI Assist", "Shop", "Items", "Approval"];

/// Run one financing transition, logging a refused one.
fn step_flow<T>(app: AppState, action: impl FnOnce(&mut FinancingFlow) -> Result<T, FinancingError>) {
	app.financing.update(|flow| {
		if let Err(e) = action(flow) {
			warn!("financing flow: {e}");
		}
	});
}

fn shop_name(app: AppState) -> &'static str {
	app.financing
		.with(|f| f.shop().map(|s| s.name))
		.unwrap_or_default()
}

#[component]
fn MetricTile(label: &'static str, value: &'static str, subtext: &'static str, tone: Tone) -> impl IntoView {
	let icon = if tone == Tone::Good { "↗ " } else { "! " };
	view! {
		<div class="metric-tile">
			<div class="section-label">{label}</div>
			<div class="big">{value}</div>
			<div class="small" style=format!("color: {}", tone.color())>
				{icon}
				{subtext}
			</div>
		</div>
	}
}

#[component]
fn BehaviorPanel() -> impl IntoView {
	let improved = RwSignal::new(false);
	let toggling = RwSignal::new(false);
	let series = Signal::derive(move || history(improved.get()));
	let timers = ViewTimers::new();

	let toggle = move |_| {
		toggling.set(true);
		timers.after(
			move || {
				let _ = improved.try_update(|m| *m = !*m);
				let _ = toggling.try_set(false);
			},
			Duration::from_millis(IMPROVEMENT_DELAY_MS),
		);
	};

	view! {
		<div class="panel">
			<div class="panel-title">
				<div>
					<h2>"Financial Behavior"</h2>
					<p class="muted small">"12-Week Income vs Spending Analysis"</p>
				</div>
				<button
					class="toggle"
					class:active=move || improved.get()
					disabled=move || toggling.get()
					on:click=toggle
				>
					{move || if toggling.get() { "⟳ " } else { "⚡ " }}
					{move || if improved.get() { "Simulation Active" } else { "Simulate Improvement" }}
				</button>
			</div>
			<div class="chart-area">
				<CashFlowChart series=series filled=true />
			</div>
			<div class="metric-tiles">
				{move || {
					headline_metrics(improved.get())
						.into_iter()
						.map(|m| {
							view! {
								<MetricTile label=m.label value=m.value subtext=m.subtext tone=m.tone />
							}
						})
						.collect_view()
				}}
			</div>
		</div>
	}
}

#[component]
fn ApplicationModal(open: RwSignal<bool>) -> impl IntoView {
	let app = AppState::expect();
	let amount = RwSignal::new(DEFAULT_LOAN_AMOUNT.to_string());
	let error = RwSignal::new(None::<String>);
	let applying = RwSignal::new(false);
	let timers = ViewTimers::new();

	let confirm = move |_| {
		if applying.get_untracked() {
			return;
		}
		match parse_loan_amount(&amount.get_untracked()) {
			Ok(rupees) => {
				error.set(None);
				applying.set(true);
				timers.after(
					move || {
						let _ = applying.try_set(false);
						let _ = open.try_set(false);
						info!("loan application for ₹{}", format_rupees(rupees));
						app.set_loan_status(LoanStatus::Review);
					},
					Duration::from_millis(SUBMIT_DELAY_MS),
				);
			}
			Err(e) => {
				warn!("{e}");
				error.set(Some(e.to_string()));
			}
		}
	};

	view! {
		<div class="modal-backdrop">
			<div class="modal">
				<h3>"Confirm Application"</h3>
				<label class="section-label">"Loan Amount"</label>
				<div class="amount-input">
					<span class="muted">"₹"</span>
					<input
						type="number"
						prop:value=move || amount.get()
						on:input=move |ev| amount.set(event_target_value(&ev))
					/>
				</div>
				{move || error.get().map(|e| view! { <p class="error small">{e}</p> })}
				<div class="actions row">
					<button class="secondary" on:click=move |_| open.set(false)>
						"Cancel"
					</button>
					<button class="primary" on:click=confirm disabled=move || applying.get()>
						{move || if applying.get() { "⟳" } else { "Confirm" }}
					</button>
				</div>
			</div>
		</div>
	}
}

/// The right-hand card before structured financing is activated.
#[component]
fn StatusCard(modal_open: RwSignal<bool>) -> impl IntoView {
	let app = AppState::expect();
	let status = move || app.loan_status.get();

	let body = move || match status() {
		LoanStatus::None => view! {
			<div class="status-icon">"₹"</div>
			<h3>"Eligible for Loan"</h3>
			<p class="muted small">
				"Your profile meets the baseline criteria for micro-credit up to ₹50,000."
			</p>
			<button class="primary wide" on:click=move |_| modal_open.set(true)>
				"Apply Now"
			</button>
		}
		.into_any(),
		LoanStatus::Review => view! {
			<div class="status-icon warn pulse">"⏳"</div>
			<h3>"Under Review"</h3>
			<p class="muted small">
				"The AI Decision Engine is analyzing your profile. This usually takes less than a minute."
			</p>
		}
		.into_any(),
		LoanStatus::Approved => view! {
			<div class="status-icon good">"✔"</div>
			<h3>"Loan Sanctioned"</h3>
			<p class="good small chip">"Funds unlocked via Smart Contract"</p>
		}
		.into_any(),
		LoanStatus::Rejected => view! {
			<div class="status-icon bad">"✕"</div>
			<h3>"Application Rejected"</h3>
			<p class="muted small">
				"Direct cash lending is not available for your current risk profile."
			</p>
			<div class="pivot">
				<h4 class="accent">"⚡ AI Alternative Support"</h4>
				<p class="small">
					"We can connect you with verified agri-supply partners. The bank finances the shopkeeper instead."
				</p>
			</div>
			<button
				class="light wide"
				on:click=move |_| {
					let status = app.loan_status.get_untracked();
					step_flow(app, |f| f.activate(status));
				}
			>
				"Activate Smart Assistance ›"
			</button>
		}
		.into_any(),
		LoanStatus::StructuredApproved => view! {
			<div class="status-icon good">"🚚"</div>
			<h3>"Structured Financing Approved"</h3>
			<p class="good small chip">"Your inputs are paid for directly by the bank."</p>
		}
		.into_any(),
		LoanStatus::StructuredRejected => view! {
			<div class="status-icon bad">"✕"</div>
			<h3>"Structured Request Declined"</h3>
			<p class="muted small">"The partner shop could not fulfil the request."</p>
		}
		.into_any(),
	};

	view! {
		<div class="panel status-card" data-status=move || status().as_str()>
			<h2>
				{move || {
					if status() == LoanStatus::Rejected {
						"Alternative Financing"
					} else {
						"Loan Application"
					}
				}}
			</h2>
			<div class="status-body">{body}</div>
		</div>
	}
}

#[component]
fn IntroStep() -> impl IntoView {
	let app = AppState::expect();
	view! {
		<div class="step center">
			<div class="status-icon accent">"🤖"</div>
			<h3>"Structured Supply Financing"</h3>
			<p class="muted small">
				"Instead of cash, we will approve a credit line for specific agricultural inputs (Seeds, Fertilizers) through our partner network."
			</p>
			<ul class="perks">
				<li>"✔ 0% Interest for 30 days"</li>
				<li>"✔ Verified Quality Goods"</li>
				<li>"✔ Direct Bank-to-Shop Payment"</li>
			</ul>
			<button class="primary wide" on:click=move |_| step_flow(app, FinancingFlow::find_shops)>
				"Find Nearby Agri Shops"
			</button>
		</div>
	}
}

#[component]
fn ShopStep() -> impl IntoView {
	let app = AppState::expect();
	view! {
		<div class="step">
			<h3>"📍 Select Shopkeeper"</h3>
			<div class="shop-list">
				{NEARBY_SHOPS
					.iter()
					.map(|shop| {
						let id = shop.id;
						view! {
							<div class="shop-card" on:click=move |_| step_flow(app, |f| f.choose_shop(id))>
								<div class="row">
									<h4>{shop.name}</h4>
									<span class="chip accent">{shop.rating} " ★"</span>
								</div>
								<div class="muted small row">
									<span>{shop.distance}</span>
									{shop.verified.then(|| view! { <span class="verified">"🛡 Verified"</span> })}
								</div>
								<div class="tags">
									{shop
										.inventory
										.iter()
										.map(|tag| view! { <span class="tag">{*tag}</span> })
										.collect_view()}
								</div>
							</div>
						}
					})
					.collect_view()}
			</div>
		</div>
	}
}

#[component]
fn ItemStep() -> impl IntoView {
	let app = AppState::expect();
	let total = move || app.financing.with(|f| f.cart().total());
	let submitting = move || app.financing.with(FinancingFlow::is_submitting);
	let timers = ViewTimers::new();
	// A submission in flight is abandoned along with the view
	on_cleanup(move || {
		if app.financing.try_with_untracked(FinancingFlow::is_submitting) == Some(true) {
			let _ = app.financing.try_update(FinancingFlow::cancel_submit);
		}
	});

	let submit = move |_| {
		let mut started = Ok(());
		app.financing.update(|f| started = f.begin_submit());
		if let Err(e) = started {
			warn!("financing flow: {e}");
			return;
		}
		timers.after(
			move || match app.financing.try_update(FinancingFlow::finish_submit) {
				Some(Ok(request)) => {
					match serde_json::to_string(&request) {
						Ok(json) => debug!("structured request: {json}"),
						Err(e) => warn!("structured request is not serializable: {e}"),
					}
					info!(
						"structured request sent to {} for ₹{}",
						shop_name(app),
						format_rupees(request.total)
					);
					app.structured_request.set(Some(request));
					// A fresh request supersedes an earlier decline
					if app.loan_status.get_untracked() == LoanStatus::StructuredRejected {
						app.set_loan_status(LoanStatus::Rejected);
					}
				}
				Some(Err(e)) => warn!("financing flow: {e}"),
				None => {}
			},
			Duration::from_millis(SUBMIT_DELAY_MS),
		);
	};

	view! {
		<div class="step">
			<h3>{move || shop_name(app)}</h3>
			<p class="muted small">"Select items for financing request"</p>
			<div class="item-list">
				{SHOP_ITEMS
					.iter()
					.map(|item| {
						let qty = move || app.financing.with(|f| f.cart().quantity(item.id));
						let controls = if item.credit {
							view! {
								<div class="qty">
									<Show when=move || { qty() > 0 }>
										<button
											class="qty-btn"
											on:click=move |_| step_flow(app, |f| f.remove_item(item.id))
										>
											"−"
										</button>
									</Show>
									<span class="mono" class:muted=move || qty() == 0>
										{qty}
									</span>
									<button
										class="qty-btn"
										on:click=move |_| step_flow(app, |f| f.add_item(item.id))
									>
										"+"
									</button>
								</div>
							}
								.into_any()
						} else {
							view! { <span class="cash-only">"Cash Only"</span> }.into_any()
						};
						view! {
							<div class="item-card" class:picked=move || { qty() > 0 }>
								<div>
									<div class="item-name">{item.name}</div>
									<div class="muted small">"₹" {item.price}</div>
								</div>
								{controls}
							</div>
						}
					})
					.collect_view()}
			</div>
			<div class="item-footer">
				<div class="row">
					<span class="muted small">"Total Request"</span>
					<span class="big accent mono">{move || format!("₹{}", format_rupees(total()))}</span>
				</div>
				<button
					class="primary wide"
					on:click=submit
					disabled=move || { total() == 0 || submitting() }
				>
					{move || if submitting() { "⟳" } else { "Submit Financing Request" }}
				</button>
			</div>
		</div>
	}
}

#[component]
fn PendingStep() -> impl IntoView {
	let app = AppState::expect();
	move || match app.loan_status.get() {
		LoanStatus::StructuredApproved => view! {
			<div class="step center">
				<div class="status-icon good">"🚚"</div>
				<h3>"Structured Financing Approved"</h3>
				<p class="good small chip">{format!("Items Ready for Pickup at {}", shop_name(app))}</p>
				<button class="link" on:click=move |_| step_flow(app, FinancingFlow::done)>
					"Done"
				</button>
			</div>
		}
		.into_any(),
		LoanStatus::StructuredRejected => view! {
			<div class="step center">
				<div class="status-icon bad">"✕"</div>
				<h3>"Structured Request Declined"</h3>
				<p class="muted small">
					{format!("{} declined the structured credit request.", shop_name(app))}
				</p>
				<button class="secondary wide" on:click=move |_| step_flow(app, FinancingFlow::try_another_shop)>
					"Try Another Shop"
				</button>
			</div>
		}
		.into_any(),
		_ => view! {
			<div class="step center">
				<div class="status-icon warn pulse">"🕒"</div>
				<h3>"Request Sent"</h3>
				<p class="muted small">
					{format!(
						"Waiting for Shopkeeper ({}) to approve inventory availability.",
						shop_name(app),
					)}
				</p>
				<div class="next-steps">
					<div class="section-label">"Next Steps"</div>
					<div class="row">
						<span class="dot warn"></span>
						"Shopkeeper Approval"
					</div>
					<div class="row muted">
						<span class="dot"></span>
						"Bank Disbursal"
					</div>
				</div>
				<A href="/shopkeeper">
					<span class="link">"(Demo) Go to Shopkeeper View"</span>
				</A>
			</div>
		}
		.into_any(),
	}
}

#[component]
fn FinancingPanel() -> impl IntoView {
	let app = AppState::expect();
	let step = move || app.financing.with(FinancingFlow::step);

	view! {
		<div class="panel financing">
			<button class="icon-button corner" on:click=move |_| app.financing.update(FinancingFlow::back)>
				"✕"
			</button>
			{move || match step() {
				FinancingStep::Intro => view! { <IntroStep /> }.into_any(),
				FinancingStep::ShopSelection => view! { <ShopStep /> }.into_any(),
				FinancingStep::ItemSelection => view! { <ItemStep /> }.into_any(),
				FinancingStep::Pending => view! { <PendingStep /> }.into_any(),
				FinancingStep::Inactive => ().into_any(),
			}}
		</div>
	}
}

/// Borrower dashboard: behaviour history, loan status and the structured financing flow.
#[component]
pub fn BorrowerDashboard() -> impl IntoView {
	let app = AppState::expect();
	let modal_open = RwSignal::new(false);
	let step = move || app.financing.with(FinancingFlow::step);
	let active = move || step() != FinancingStep::Inactive;

	view! {
		<div class="page dashboard-page">
			<header class="page-header">
				<h1>"Borrower Dashboard"</h1>
				<Show when=active>
					<div class="step-indicator">
						{STEP_LABELS
							.iter()
							.zip(1u8..)
							.map(|(label, n)| {
								view! {
									<span class="dot" class:on=move || { step().index() >= n }></span>
									<span class="muted small">{*label}</span>
								}
							})
							.collect_view()}
					</div>
				</Show>
			</header>

			<main class="dashboard-grid">
				<section class="behavior" class:dimmed=active>
					<BehaviorPanel />
				</section>
				<section class="loan">
					<Show when=active fallback=move || view! { <StatusCard modal_open=modal_open /> }>
						<FinancingPanel />
					</Show>
				</section>
			</main>

			<Show when=move || modal_open.get()>
				<ApplicationModal open=modal_open />
			</Show>
		</div>
	}
}
