use leptos::prelude::*;
use leptos_router::components::A;

const FEATURES: [(&str, &str, &str); 4] = [
	(
		"/mesh",
		"Credit Mesh",
		"Relationship graph of income, payment and spending signals around one borrower.",
	),
	(
		"/tcn",
		"TCN Agent",
		"What-if simulator for temporal behaviour: move the sliders, watch the stability score.",
	),
	(
		"/decision",
		"Decision Engine",
		"GNN and TCN outputs combined into a single risk score and an approval recommendation.",
	),
	(
		"/dashboard",
		"Borrower Dashboard",
		"Apply for a loan, or unlock structured supply financing after a rejection.",
	),
];

/// Landing page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div class="page home">
			<section class="hero">
				<h1>"Credit for the " <span class="accent">"credit invisible"</span></h1>
				<p class="subtitle">
					"PurposePay scores behaviour instead of history: relationship graphs, "
					"temporal consistency and purpose-bound lending."
				</p>
				<A href="/dashboard">
					<span class="cta">"Open Borrower Dashboard"</span>
				</A>
			</section>
			<section class="feature-grid">
				{FEATURES
					.iter()
					.map(|&(href, title, blurb)| {
						view! {
							<A href=href>
								<div class="feature-card">
									<h3>{title}</h3>
									<p>{blurb}</p>
								</div>
							</A>
						}
					})
					.collect_view()}
			</section>
		</div>
	}
}
