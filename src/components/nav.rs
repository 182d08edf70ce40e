use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

const MENU: [(&str, &str); 4] = [
	("TCN Agent", "/tcn"),
	("Credit Mesh", "/mesh"),
	("Final Decision", "/decision"),
	("Shopkeeper", "/shopkeeper"),
];

/// Top bar shown on every page.
#[component]
pub fn Navbar() -> impl IntoView {
	let (open, set_open) = signal(false);
	let navigate = use_navigate();
	let login = move |_| {
		navigate("/dashboard", Default::default());
	};

	let links = move || {
		MENU.iter()
			.map(|&(name, href)| {
				view! {
					<A href=href>{name}</A>
				}
			})
			.collect_view()
	};

	view! {
		<header class="navbar">
			<nav class="navbar-inner">
				<A href="/">
					<span class="brand">
						<span class="brand-mark">"P"</span>
						<span class="brand-name">"PurposePay"</span>
					</span>
				</A>
				<div class="navbar-links" class:open=open on:click=move |_| set_open.set(false)>
					{links}
					<button class="login" on:click=login>
						"Login"
					</button>
				</div>
				<button class="menu-toggle" on:click=move |_| set_open.update(|o| *o = !*o)>
					{move || if open.get() { "✕" } else { "☰" }}
				</button>
			</nav>
		</header>
	}
}
