//! State shared across pages, handed out through Leptos context.

use leptos::prelude::*;
use log::info;

use crate::financing::{FinancingFlow, LoanStatus, StructuredRequest};
use crate::risk::RiskBoard;

#[derive(Clone, Copy)]
pub struct AppState {
	pub loan_status: RwSignal<LoanStatus>,
	/// Set when the borrower submits a structured request.
	pub structured_request: RwSignal<Option<StructuredRequest>>,
	pub risk: RwSignal<RiskBoard>,
	/// Survives the trip to the shopkeeper view and back.
	pub financing: RwSignal<FinancingFlow>,
}

impl AppState {
	pub fn new() -> Self {
		Self {
			loan_status: RwSignal::new(LoanStatus::default()),
			structured_request: RwSignal::new(None),
			risk: RwSignal::new(RiskBoard::default()),
			financing: RwSignal::new(FinancingFlow::default()),
		}
	}

	pub fn provide() -> Self {
		let state = Self::new();
		provide_context(state);
		state
	}

	pub fn expect() -> Self {
		expect_context::<Self>()
	}

	pub fn set_loan_status(&self, status: LoanStatus) {
		info!("loan status -> {}", status.as_str());
		self.loan_status.set(status);
	}
}

impl Default for AppState {
	fn default() -> Self {
		Self::new()
	}
}
