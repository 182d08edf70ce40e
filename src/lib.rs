//! PurposePay: credit-decisioning demo as a Leptos client-side app.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// `rand` pulls getrandom in; the wasm build needs its "js" backend
use getrandom as _;

// Modules
mod app_state;
mod borrower;
pub mod components;
mod config;
mod decision;
pub mod financing;
mod pages;
pub mod risk;
pub mod simulator;

use crate::app_state::AppState;
use crate::components::nav::Navbar;
use crate::config::AppConfig;

// Top-Level pages
use crate::pages::borrower::BorrowerDashboard;
use crate::pages::credit_mesh::CreditMesh;
use crate::pages::decision::DecisionEngine;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::shopkeeper::Shopkeeper;
use crate::pages::tcn_agent::TcnAgent;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The router with every view, sharing one `AppState` and `AppConfig`.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::load();
	info!(
		"risk endpoint {} every {:?}",
		config.risk_endpoint, config.poll_interval
	);
	provide_context(config);
	AppState::provide();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="PurposePay" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Navbar />
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/mesh") view=CreditMesh />
				<Route path=path!("/tcn") view=TcnAgent />
				<Route path=path!("/decision") view=DecisionEngine />
				<Route path=path!("/dashboard") view=BorrowerDashboard />
				<Route path=path!("/shopkeeper") view=Shopkeeper />
			</Routes>
		</Router>
	}
}
