//! Loan status and the structured supply financing flow.
//!
//! A rejected direct loan unlocks a four step flow: intro, shop choice,
//! item basket, then a pending request the shopkeeper decides on.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Where the borrower's direct or structured application stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoanStatus {
	/// Nothing applied for yet.
	#[default]
	None,
	/// Direct application under review.
	Review,
	/// Direct loan sanctioned.
	Approved,
	/// Direct loan declined; structured financing becomes available.
	Rejected,
	/// Shopkeeper accepted the structured request.
	StructuredApproved,
	/// Shopkeeper declined the structured request.
	StructuredRejected,
}

impl LoanStatus {
	/// Snake-case name used in logs.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Review => "review",
			Self::Approved => "approved",
			Self::Rejected => "rejected",
			Self::StructuredApproved => "structured_approved",
			Self::StructuredRejected => "structured_rejected",
		}
	}

	/// Shopkeeper outcome for a structured request.
	pub fn structured(approved: bool) -> Self {
		if approved {
			Self::StructuredApproved
		} else {
			Self::StructuredRejected
		}
	}
}

/// Amount prefilled in the application dialog.
pub const DEFAULT_LOAN_AMOUNT: &str = "50000";
/// Simulated processing time for applications and submissions.
pub const SUBMIT_DELAY_MS: u64 = 1500;

/// Why a financing action was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinancingError {
	/// Assistance requested while the direct loan is not rejected.
	#[error("structured financing is only offered after a rejected loan (status `{}`)", .0.as_str())]
	NotRejected(LoanStatus),
	/// Action not allowed at the current step.
	#[error("cannot {action} at step {from:?}")]
	InvalidTransition {
		/// Step the flow was at.
		from: FinancingStep,
		/// What was attempted.
		action: &'static str,
	},
	/// No shop with this id.
	#[error("unknown shop {0}")]
	UnknownShop(u32),
	/// No catalog item with this id.
	#[error("unknown item `{0}`")]
	UnknownItem(String),
	/// Item cannot be financed.
	#[error("`{0}` is sold for cash only")]
	CashOnly(&'static str),
	/// Submit pressed with nothing in the basket.
	#[error("financing request has no items")]
	EmptyCart,
	/// Submit pressed twice.
	#[error("a request is already being submitted")]
	AlreadySubmitting,
	/// Loan amount is not a positive whole number.
	#[error("loan amount `{0}` is not a positive number of rupees")]
	InvalidAmount(String),
}

/// Parse the amount typed into the application dialog.
pub fn parse_loan_amount(raw: &str) -> Result<u32, FinancingError> {
	match raw.trim().parse::<u32>() {
		Ok(v) if v > 0 => Ok(v),
		_ => Err(FinancingError::InvalidAmount(raw.to_string())),
	}
}

/// A verified partner shop near the borrower.
#[derive(Debug, PartialEq, Eq)]
pub struct Shop {
	/// Stable id used by the flow.
	pub id: u32,
	/// Display name.
	pub name: &'static str,
	/// Distance from the borrower.
	pub distance: &'static str,
	/// Star rating.
	pub rating: &'static str,
	/// Shown with a verified badge.
	pub verified: bool,
	/// Product categories stocked.
	pub inventory: &'static [&'static str],
}

/// Shops offered on the selection step.
pub static NEARBY_SHOPS: [Shop; 3] = [
	Shop {
		id: 1,
		name: "Kisan Sewa Kendra",
		distance: "0.8 km",
		rating: "4.8",
		verified: true,
		inventory: &["Seeds", "Fertilizers"],
	},
	Shop {
		id: 2,
		name: "AgriTarget Supplies",
		distance: "2.1 km",
		rating: "4.5",
		verified: true,
		inventory: &["Tools", "Pesticides"],
	},
	Shop {
		id: 3,
		name: "Village Co-op Store",
		distance: "3.5 km",
		rating: "4.9",
		verified: true,
		inventory: &["All"],
	},
];

/// A product the borrower can put in the basket.
#[derive(Debug, PartialEq, Eq)]
pub struct CatalogItem {
	/// Catalog id.
	pub id: &'static str,
	/// Display name.
	pub name: &'static str,
	/// Whole rupees.
	pub price: u32,
	/// False for cash-only goods.
	pub credit: bool,
}

/// The shop's catalog, in display order.
pub static SHOP_ITEMS: [CatalogItem; 5] = [
	CatalogItem {
		id: "s1",
		name: "Hybrid Wheat Seeds (20kg)",
		price: 1200,
		credit: true,
	},
	CatalogItem {
		id: "f1",
		name: "Urea Fertilizer (50kg)",
		price: 850,
		credit: true,
	},
	CatalogItem {
		id: "p1",
		name: "Bio-Pesticide (1L)",
		price: 450,
		credit: true,
	},
	CatalogItem {
		id: "t1",
		name: "Spread Sprayer",
		price: 2500,
		credit: false,
	},
	CatalogItem {
		id: "f2",
		name: "DAP Fertilizer (50kg)",
		price: 1350,
		credit: true,
	},
];

/// Look up a nearby shop.
pub fn find_shop(id: u32) -> Option<&'static Shop> {
	NEARBY_SHOPS.iter().find(|s| s.id == id)
}

/// Look up a catalog item.
pub fn find_item(id: &str) -> Option<&'static CatalogItem> {
	SHOP_ITEMS.iter().find(|i| i.id == id)
}

/// Format rupees with Indian digit grouping, e.g. 250000 → "2,50,000".
pub fn format_rupees(amount: u32) -> String {
	let digits = amount.to_string();
	if digits.len() <= 3 {
		return digits;
	}
	let (head, tail) = digits.split_at(digits.len() - 3);
	let mut groups: Vec<&str> = Vec::new();
	let mut rest = head;
	while rest.len() > 2 {
		let (h, t) = rest.split_at(rest.len() - 2);
		groups.push(t);
		rest = h;
	}
	groups.push(rest);
	groups.reverse();
	format!("{},{tail}", groups.join(","))
}

/// One basket line in a structured request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestItem {
	/// Item name.
	pub name: String,
	/// Units requested.
	pub qty: u32,
	/// Unit price in rupees.
	pub price: u32,
}

impl RequestItem {
	/// `qty * price`.
	pub fn line_total(&self) -> u32 {
		self.qty * self.price
	}
}

/// Item quantities keyed by catalog id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
	quantities: BTreeMap<&'static str, u32>,
}

impl Cart {
	/// Units of `id` in the basket.
	pub fn quantity(&self, id: &str) -> u32 {
		self.quantities.get(id).copied().unwrap_or(0)
	}

	/// Add one unit; cash-only and unknown items are refused.
	pub fn add(&mut self, id: &str) -> Result<u32, FinancingError> {
		let item = find_item(id).ok_or_else(|| FinancingError::UnknownItem(id.to_string()))?;
		if !item.credit {
			return Err(FinancingError::CashOnly(item.name));
		}
		let qty = self.quantities.entry(item.id).or_insert(0);
		*qty += 1;
		Ok(*qty)
	}

	/// Remove one unit, never going below zero.
	pub fn remove(&mut self, id: &str) -> u32 {
		match self.quantities.get_mut(id) {
			Some(qty) => {
				*qty = qty.saturating_sub(1);
				*qty
			}
			None => 0,
		}
	}

	/// Basket value in rupees.
	pub fn total(&self) -> u32 {
		self.quantities
			.iter()
			.filter_map(|(id, qty)| find_item(id).map(|i| i.price * qty))
			.sum()
	}

	/// True when nothing is in the basket.
	pub fn is_empty(&self) -> bool {
		self.total() == 0
	}

	/// Lines with a positive quantity, in catalog order.
	pub fn line_items(&self) -> Vec<RequestItem> {
		SHOP_ITEMS
			.iter()
			.filter_map(|item| {
				let qty = self.quantity(item.id);
				(qty > 0).then(|| RequestItem {
					name: item.name.to_string(),
					qty,
					price: item.price,
				})
			})
			.collect()
	}
}

/// Steps of the structured financing flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FinancingStep {
	/// Flow not started.
	#[default]
	Inactive,
	/// Smart assistance explainer.
	Intro,
	/// Choosing a nearby shop.
	ShopSelection,
	/// Filling the basket.
	ItemSelection,
	/// Request sent, awaiting the shopkeeper.
	Pending,
}

impl FinancingStep {
	/// Position in the step indicator; 0 when inactive.
	pub fn index(self) -> u8 {
		match self {
			Self::Inactive => 0,
			Self::Intro => 1,
			Self::ShopSelection => 2,
			Self::ItemSelection => 3,
			Self::Pending => 4,
		}
	}

	/// One step back, stopping at `Inactive`.
	pub fn back(self) -> Self {
		match self {
			Self::Inactive | Self::Intro => Self::Inactive,
			Self::ShopSelection => Self::Intro,
			Self::ItemSelection => Self::ShopSelection,
			Self::Pending => Self::ItemSelection,
		}
	}
}

/// Payload handed from the borrower to the shopkeeper.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRequest {
	/// Borrower name.
	pub user_name: String,
	/// Borrower village and sector.
	pub user_location: String,
	/// Basket lines.
	pub items: Vec<RequestItem>,
	/// Basket value in rupees.
	pub total: u32,
	/// Combined risk at the time of request.
	pub risk_score: f64,
	/// GNN confidence shown to the shopkeeper.
	pub gnn_confidence: f64,
	/// TCN stability shown to the shopkeeper.
	pub tcn_stability: f64,
	/// Why the direct loan was declined.
	pub rejection_reason: String,
}

const BORROWER_NAME: &str = "Rajesh Kumar";
const BORROWER_LOCATION: &str = "Village-2, Sector B";
const REJECTION_REASON: &str =
	"Direct loan rejected due to high spending volatility exceeding cash-buffer thresholds.";

impl StructuredRequest {
	/// Request for the current basket.
	pub fn from_cart(cart: &Cart) -> Self {
		Self {
			items: cart.line_items(),
			total: cart.total(),
			..Self::default()
		}
	}
}

/// The request shown when the shopkeeper view opens without one.
impl Default for StructuredRequest {
	fn default() -> Self {
		Self {
			user_name: BORROWER_NAME.into(),
			user_location: BORROWER_LOCATION.into(),
			items: vec![
				RequestItem {
					name: SHOP_ITEMS[0].name.into(),
					qty: 2,
					price: SHOP_ITEMS[0].price,
				},
				RequestItem {
					name: SHOP_ITEMS[1].name.into(),
					qty: 5,
					price: SHOP_ITEMS[1].price,
				},
			],
			total: 6650,
			risk_score: 0.28,
			gnn_confidence: 0.84,
			tcn_stability: 0.79,
			rejection_reason: REJECTION_REASON.into(),
		}
	}
}

/// State machine behind the borrower's financing panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FinancingFlow {
	step: FinancingStep,
	shop: Option<u32>,
	cart: Cart,
	submitting: bool,
}

impl FinancingFlow {
	/// Current step.
	pub fn step(&self) -> FinancingStep {
		self.step
	}

	/// Chosen shop, once picked.
	pub fn shop(&self) -> Option<&'static Shop> {
		self.shop.and_then(find_shop)
	}

	/// Basket so far.
	pub fn cart(&self) -> &Cart {
		&self.cart
	}

	/// True between submit and its completion.
	pub fn is_submitting(&self) -> bool {
		self.submitting
	}

	/// True once the flow has started.
	pub fn is_active(&self) -> bool {
		self.step != FinancingStep::Inactive
	}

	fn require(&self, step: FinancingStep, action: &'static str) -> Result<(), FinancingError> {
		if self.step == step {
			Ok(())
		} else {
			Err(FinancingError::InvalidTransition {
				from: self.step,
				action,
			})
		}
	}

	/// "Activate Smart Assistance": only once the direct loan is rejected.
	pub fn activate(&mut self, status: LoanStatus) -> Result<(), FinancingError> {
		if status != LoanStatus::Rejected {
			return Err(FinancingError::NotRejected(status));
		}
		self.require(FinancingStep::Inactive, "activate")?;
		self.step = FinancingStep::Intro;
		Ok(())
	}

	/// Intro → shop selection.
	pub fn find_shops(&mut self) -> Result<(), FinancingError> {
		self.require(FinancingStep::Intro, "find shops")?;
		self.step = FinancingStep::ShopSelection;
		Ok(())
	}

	/// Pick a shop and move to the basket.
	pub fn choose_shop(&mut self, id: u32) -> Result<(), FinancingError> {
		self.require(FinancingStep::ShopSelection, "choose a shop")?;
		let shop = find_shop(id).ok_or(FinancingError::UnknownShop(id))?;
		self.shop = Some(shop.id);
		self.step = FinancingStep::ItemSelection;
		Ok(())
	}

	/// Add one unit; returns the new quantity.
	pub fn add_item(&mut self, id: &str) -> Result<u32, FinancingError> {
		self.require(FinancingStep::ItemSelection, "add items")?;
		self.cart.add(id)
	}

	/// Remove one unit; returns the new quantity.
	pub fn remove_item(&mut self, id: &str) -> Result<u32, FinancingError> {
		self.require(FinancingStep::ItemSelection, "remove items")?;
		Ok(self.cart.remove(id))
	}

	/// Start submitting the basket; the caller finishes after a delay.
	pub fn begin_submit(&mut self) -> Result<(), FinancingError> {
		self.require(FinancingStep::ItemSelection, "submit")?;
		if self.submitting {
			return Err(FinancingError::AlreadySubmitting);
		}
		if self.cart.is_empty() {
			return Err(FinancingError::EmptyCart);
		}
		self.submitting = true;
		Ok(())
	}

	/// Drop a submission whose completion will never arrive; the basket stays.
	pub fn cancel_submit(&mut self) {
		self.submitting = false;
	}

	/// Complete a submission and build the request.
	pub fn finish_submit(&mut self) -> Result<StructuredRequest, FinancingError> {
		if !self.submitting {
			return Err(FinancingError::InvalidTransition {
				from: self.step,
				action: "finish a submission",
			});
		}
		self.submitting = false;
		self.step = FinancingStep::Pending;
		Ok(StructuredRequest::from_cart(&self.cart))
	}

	/// Step back and abandon any submission in flight.
	pub fn back(&mut self) {
		self.submitting = false;
		self.step = self.step.back();
	}

	/// After a declined request, pick a different shop.
	pub fn try_another_shop(&mut self) -> Result<(), FinancingError> {
		self.require(FinancingStep::Pending, "try another shop")?;
		self.step = FinancingStep::ShopSelection;
		Ok(())
	}

	/// Close the flow from the pending step.
	pub fn done(&mut self) -> Result<(), FinancingError> {
		self.require(FinancingStep::Pending, "finish")?;
		self.step = FinancingStep::Inactive;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn at_items() -> FinancingFlow {
		let mut flow = FinancingFlow::default();
		flow.activate(LoanStatus::Rejected).unwrap();
		flow.find_shops().unwrap();
		flow.choose_shop(1).unwrap();
		flow
	}

	#[test]
	fn activation_requires_rejection() {
		let mut flow = FinancingFlow::default();
		assert_eq!(
			flow.activate(LoanStatus::Review),
			Err(FinancingError::NotRejected(LoanStatus::Review))
		);
		assert_eq!(flow.step(), FinancingStep::Inactive);
		flow.activate(LoanStatus::Rejected).unwrap();
		assert_eq!(flow.step(), FinancingStep::Intro);
	}

	#[test]
	fn full_happy_path() {
		let mut flow = at_items();
		assert_eq!(flow.shop().map(|s| s.name), Some("Kisan Sewa Kendra"));
		flow.add_item("s1").unwrap();
		flow.add_item("s1").unwrap();
		flow.add_item("f1").unwrap();
		assert_eq!(flow.cart().total(), 3250);

		flow.begin_submit().unwrap();
		assert!(flow.is_submitting());
		assert_eq!(flow.begin_submit(), Err(FinancingError::AlreadySubmitting));
		let req = flow.finish_submit().unwrap();
		assert_eq!(flow.step(), FinancingStep::Pending);
		assert_eq!(req.total, 3250);
		assert_eq!(req.items.len(), 2);
		assert_eq!(req.user_name, "Rajesh Kumar");
		assert_eq!(req.tcn_stability, 0.79);

		flow.try_another_shop().unwrap();
		assert_eq!(flow.step(), FinancingStep::ShopSelection);
	}

	#[test]
	fn cancelled_submission_can_be_retried() {
		let mut flow = at_items();
		flow.add_item("f2").unwrap();
		flow.begin_submit().unwrap();
		flow.cancel_submit();

		assert!(!flow.is_submitting());
		assert_eq!(flow.step(), FinancingStep::ItemSelection);
		assert_eq!(flow.cart().quantity("f2"), 1);
		assert!(flow.finish_submit().is_err());
		flow.begin_submit().unwrap();
		assert_eq!(flow.finish_submit().unwrap().items.len(), 1);
	}

	#[test]
	fn empty_cart_cannot_submit() {
		let mut flow = at_items();
		assert_eq!(flow.begin_submit(), Err(FinancingError::EmptyCart));
		flow.add_item("p1").unwrap();
		flow.remove_item("p1").unwrap();
		assert_eq!(flow.begin_submit(), Err(FinancingError::EmptyCart));
	}

	#[test]
	fn cart_rules() {
		let mut cart = Cart::default();
		assert_eq!(cart.remove("s1"), 0);
		assert_eq!(cart.add("t1"), Err(FinancingError::CashOnly("Spread Sprayer")));
		assert_eq!(cart.add("zz"), Err(FinancingError::UnknownItem("zz".into())));
		cart.add("f2").unwrap();
		assert_eq!(cart.remove("f2"), 0);
		assert_eq!(cart.remove("f2"), 0);
		assert!(cart.line_items().is_empty());

		cart.add("f2").unwrap();
		cart.add("s1").unwrap();
		let lines = cart.line_items();
		assert_eq!(lines[0].name, "Hybrid Wheat Seeds (20kg)");
		assert_eq!(lines[1].line_total(), 1350);
		assert_eq!(cart.total(), 2550);
	}

	#[test]
	fn back_floors_at_inactive() {
		let mut flow = at_items();
		flow.back();
		assert_eq!(flow.step(), FinancingStep::ShopSelection);
		flow.back();
		flow.back();
		flow.back();
		assert_eq!(flow.step(), FinancingStep::Inactive);
		assert_eq!(FinancingStep::Pending.back().index(), 3);
	}

	#[test]
	fn out_of_order_actions_are_rejected() {
		let mut flow = FinancingFlow::default();
		assert!(matches!(
			flow.choose_shop(1),
			Err(FinancingError::InvalidTransition { from: FinancingStep::Inactive, .. })
		));
		let mut flow = at_items();
		assert!(flow.done().is_err());
		assert!(flow.finish_submit().is_err());

		let mut flow = FinancingFlow::default();
		flow.activate(LoanStatus::Rejected).unwrap();
		flow.find_shops().unwrap();
		assert_eq!(flow.choose_shop(9), Err(FinancingError::UnknownShop(9)));
	}

	#[test]
	fn done_returns_to_inactive() {
		let mut flow = at_items();
		flow.add_item("s1").unwrap();
		flow.begin_submit().unwrap();
		flow.finish_submit().unwrap();
		flow.done().unwrap();
		assert!(!flow.is_active());
	}

	#[test]
	fn fallback_request_matches_its_total() {
		let req = StructuredRequest::default();
		let sum: u32 = req.items.iter().map(RequestItem::line_total).sum();
		assert_eq!(sum, 6650);
		assert_eq!(req.total, 6650);
	}

	#[test]
	fn request_serializes_camel_case() {
		let json = serde_json::to_value(StructuredRequest::default()).unwrap();
		assert_eq!(json["userName"], "Rajesh Kumar");
		assert_eq!(json["userLocation"], "Village-2, Sector B");
		assert_eq!(json["items"][1]["qty"], 5);
	}

	#[test]
	fn loan_amount_parsing() {
		assert_eq!(parse_loan_amount(DEFAULT_LOAN_AMOUNT), Ok(50_000));
		assert_eq!(parse_loan_amount(" 1200 "), Ok(1200));
		assert!(parse_loan_amount("0").is_err());
		assert!(parse_loan_amount("-5").is_err());
		assert!(parse_loan_amount("").is_err());
	}

	#[test]
	fn rupee_grouping() {
		assert_eq!(format_rupees(450), "450");
		assert_eq!(format_rupees(6650), "6,650");
		assert_eq!(format_rupees(50_000), "50,000");
		assert_eq!(format_rupees(250_000), "2,50,000");
		assert_eq!(format_rupees(12_345_678), "1,23,45,678");
	}
}
