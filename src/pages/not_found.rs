use leptos::prelude::*;
use leptos_router::components::A;
use log::warn;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	if let Some(window) = web_sys::window() {
		warn!(
			"no route for {}",
			window.location().pathname().unwrap_or_default()
		);
	}

	view! {
		<div class="page not-found">
			<h1>"Uh oh!" <br /> "We couldn't find that page!"</h1>
			<A href="/">"Back to PurposePay"</A>
		</div>
	}
}
