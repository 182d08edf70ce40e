use std::time::Duration;

use leptos::prelude::*;
use log::debug;

use crate::components::charts::{CashFlowChart, INCOME_COLOR, SAVINGS_COLOR, SPENDING_COLOR};
use crate::components::timers::ViewTimers;
use crate::simulator::{
	BASE_WEEKS, PROJECTION_DELAY_MS, PROJECTION_STEP, SAVINGS_HISTORY, ScoreBand, Slider,
	SliderInputs, SpendingRisk, income_band, payment_is_strong, savings_delta_label, simulate,
	system_stable, volatility_bar_color,
};

#[component]
fn SliderControl(slider: Slider, inputs: RwSignal<SliderInputs>) -> impl IntoView {
	let value = move || inputs.with(|i| i.get(slider));
	view! {
		<label class="slider">
			<div class="slider-head">
				<span>{slider.label()}</span>
				<span class="mono" style=format!("color: {}", slider.accent())>
					{move || format!("{}%", value())}
				</span>
			</div>
			<input
				type="range"
				min="0"
				max="100"
				style=format!("accent-color: {}", slider.accent())
				prop:value=move || value().to_string()
				on:input=move |ev| {
					let raw = event_target_value(&ev);
					inputs.update(|i| {
						if !i.set_from_input(slider, &raw) {
							debug!("ignoring slider value {raw:?}");
						}
					});
				}
			/>
		</label>
	}
}

#[component]
fn IndexCard(title: &'static str, children: Children) -> impl IntoView {
	view! {
		<div class="index-card">
			<div class="index-title">{title}</div>
			{children()}
		</div>
	}
}

/// TCN Agent page: what-if sliders driving the simulated stability score.
#[component]
pub fn TcnAgent() -> impl IntoView {
	let inputs = RwSignal::new(SliderInputs::default());
	let weeks = RwSignal::new(BASE_WEEKS);
	let simulating = RwSignal::new(false);
	let timers = ViewTimers::new();

	// Fresh noise on every slider move or horizon change
	let sim = Memo::new(move |_| simulate(&inputs.get(), weeks.get(), &mut rand::thread_rng()));
	let series = Signal::derive(move || sim.with(|s| s.series.clone()));
	let marker = Signal::derive(move || sim.with(|s| s.projection_marker()));
	let score = move || sim.with(|s| s.score);
	let score_color = move || ScoreBand::of(score()).color();

	let on_simulate = move |_| {
		simulating.set(true);
		timers.after(
			move || {
				let _ = weeks.try_update(|w| *w += PROJECTION_STEP);
				let _ = simulating.try_set(false);
			},
			Duration::from_millis(PROJECTION_DELAY_MS),
		);
	};

	let savings = move || inputs.with(|i| i.savings);
	let volatility = move || inputs.with(|i| i.spending_volatility);
	let income = move || inputs.with(|i| i.income_stability);
	let payment = move || inputs.with(|i| i.payment_reliability);

	view! {
		<div class="page tcn-page">
			<header class="page-header">
				<div>
					<h1>"TCN Agent " <span class="accent">"v2.1"</span></h1>
					<p class="muted small">"Temporal Convolutional Network · Live Monitoring"</p>
				</div>
				<div class="status-pill" class:ok=move || system_stable(score())>
					<span class="pulse-dot"></span>
					{move || if system_stable(score()) { "System Stable" } else { "High Volatility" }}
				</div>
			</header>

			<main class="split">
				<section class="chart-panel">
					<div class="panel-title">
						<h2>"Real-time Behavioral Analysis"</h2>
						<div class="series-legend">
							<span style=format!("color: {INCOME_COLOR}")>"● Income"</span>
							<span style=format!("color: {SPENDING_COLOR}")>"● Spending"</span>
							<span style=format!("color: {SAVINGS_COLOR}")>"● Savings"</span>
						</div>
					</div>
					<div class="chart-area">
						<CashFlowChart series=series marker=marker />
						<Show when=move || simulating.get()>
							<div class="overlay">"GENERATING TCN PREDICTIONS..."</div>
						</Show>
					</div>
					<div class="controls">
						<div class="controls-head">
							<h3>"Simulation Parameters"</h3>
							<button
								class="primary"
								on:click=on_simulate
								disabled=move || simulating.get()
							>
								"Simulate Next 4 Weeks"
							</button>
						</div>
						<div class="slider-grid">
							{Slider::ALL
								.iter()
								.map(|&slider| view! { <SliderControl slider=slider inputs=inputs /> })
								.collect_view()}
						</div>
					</div>
				</section>

				<aside class="indices">
					<h2 class="section-label">"TCN Behavioral Indices"</h2>

					<IndexCard title="Income Stability">
						<div class="row">
							<svg class="ring" viewBox="0 0 56 56">
								<circle cx="28" cy="28" r="24" stroke="#1e293b" stroke-width="4" fill="none" />
								<circle
									cx="28"
									cy="28"
									r="24"
									stroke=INCOME_COLOR
									stroke-width="4"
									fill="none"
									stroke-linecap="round"
									transform="rotate(-90 28 28)"
									stroke-dasharray=move || format!("{} 150", income() as f64 * 1.5)
								/>
							</svg>
							<span class="big" class:good=move || { income() > 70 }>
								{move || income_band(income())}
							</span>
						</div>
					</IndexCard>

					<IndexCard title="Spending Volatility">
						<div class="row small">
							<span>"Risk Level"</span>
							<span class:bad=move || { volatility() > 50 }>
								{move || SpendingRisk::from_volatility(volatility()).label()}
							</span>
						</div>
						<div class="bar-track">
							<div
								class="bar-fill"
								style=move || {
									format!(
										"width: {}%; background: {}",
										volatility(),
										volatility_bar_color(volatility()),
									)
								}
							></div>
						</div>
					</IndexCard>

					<IndexCard title="Savings Consistency">
						<div class="mini-bars">
							{move || {
								let current = savings();
								let color = if current > 50 { "#10b981" } else { "#eab308" };
								SAVINGS_HISTORY
									.iter()
									.copied()
									.chain(std::iter::once(current))
									.map(|v| {
										view! {
											<div class="mini-bar" style=format!("height: {v}%; background: {color}")></div>
										}
									})
									.collect_view()
							}}
						</div>
						<div class="mono small right">{move || savings_delta_label(savings())}</div>
					</IndexCard>

					<IndexCard title="Liquidity Health">
						<div class="row">
							<span class="big">{move || format!("{:.1}x", sim.with(|s| s.liquidity))}</span>
							<div class="pips" title="Months of coverage">
								{move || {
									let liquidity = sim.with(|s| s.liquidity);
									(1..=6u8)
										.map(|i| {
											let on = f64::from(i) <= liquidity;
											view! { <span class="pip" class:on=on></span> }
										})
										.collect_view()
								}}
							</div>
						</div>
						<div class="muted small">"Monthly Coverage Ratio"</div>
					</IndexCard>

					<IndexCard title="Payment Reliability">
						<div class="row">
							<span class="big" class:good=move || payment_is_strong(payment())>
								{move || format!("{}/100", payment())}
							</span>
							<span class="muted small">"On-Time Performance"</span>
						</div>
					</IndexCard>

					<div class="tcn-output" style=move || format!("border-color: {}", score_color())>
						<h3 class="section-label">"Temporal Consistency Output"</h3>
						<div class="muted small">"Behavioral Stability Score"</div>
						<div class="score">
							<span style=move || format!("color: {}", score_color())>
								{move || format!("{:.2}", score())}
							</span>
							<span class="muted mono">" / 1.00"</span>
						</div>
						<p class="prediction">{move || sim.with(|s| s.prediction.message())}</p>
					</div>
				</aside>
			</main>
		</div>
	}
}
