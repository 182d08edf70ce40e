//! Static panels of the Decision Engine page.

pub const APPLICATION_ID: &str = "#APP-2024-8892";
/// How long the sanction celebration stays up.
pub const CELEBRATION_MS: u64 = 3000;

pub const GNN_HISTORY: [f64; 6] = [0.7, 0.75, 0.72, 0.8, 0.82, 0.84];
pub const TCN_HISTORY: [f64; 6] = [0.65, 0.68, 0.7, 0.75, 0.78, 0.79];

pub const TCN_STATUS: &str = "Good";
pub const TCN_DETAILS: [(&str, &str); 3] = [
	("Savings Consistency", "Improving"),
	("Spending Volatility", "Moderate"),
	("Payment Discipline", "Strong"),
];

pub const RECOMMENDATION: &str = "Strong relational income network and consistent payment discipline outweigh moderate spending volatility.";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapFeature {
	pub name: &'static str,
	pub value: f64,
}

impl ShapFeature {
	pub fn is_positive(&self) -> bool {
		self.value > 0.0
	}
}

const SHAP_FEATURES: [ShapFeature; 5] = [
	ShapFeature {
		name: "Consistent Rent",
		value: 0.18,
	},
	ShapFeature {
		name: "Stable Income",
		value: 0.12,
	},
	ShapFeature {
		name: "Savings Growth",
		value: 0.09,
	},
	ShapFeature {
		name: "Spending Volatility",
		value: -0.07,
	},
	ShapFeature {
		name: "Income Variability",
		value: -0.04,
	},
];

/// Feature contributions, largest first.
pub fn shap_contributions() -> Vec<ShapFeature> {
	let mut features = SHAP_FEATURES.to_vec();
	features.sort_by(|a, b| b.value.total_cmp(&a.value));
	features
}

/// Horizontal domain of the SHAP bar chart.
pub const SHAP_DOMAIN: (f64, f64) = (-0.1, 0.2);

/// Left offset and width of a SHAP bar as fractions of the track.
pub fn shap_bar(value: f64) -> (f64, f64) {
	let (lo, hi) = SHAP_DOMAIN;
	let span = hi - lo;
	let zero = -lo / span;
	let end = ((value - lo) / span).clamp(0.0, 1.0);
	if end >= zero {
		(zero, end - zero)
	} else {
		(end, zero - end)
	}
}

pub struct LoanTerms {
	pub term: &'static str,
	pub rate: &'static str,
	pub amount: &'static str,
}

pub const TERMS: LoanTerms = LoanTerms {
	term: "12 Months",
	rate: "1.2% / month",
	amount: "₹50,000",
};

/// Stroke offset of the safety ring (circumference 552) for a risk value.
pub fn risk_ring_offset(risk: f64) -> f64 {
	552.0 - 552.0 * (1.0 - risk)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shap_sorted_descending() {
		let f = shap_contributions();
		assert_eq!(f[0].name, "Consistent Rent");
		assert!(f.windows(2).all(|w| w[0].value >= w[1].value));
		assert_eq!(f[3].name, "Income Variability");
		assert!(!f[4].is_positive());
	}

	#[test]
	fn shap_bars_grow_from_zero() {
		let (left, width) = shap_bar(0.2);
		assert!((left - 1.0 / 3.0).abs() < 1e-9);
		assert!((width - 2.0 / 3.0).abs() < 1e-9);

		let (left, width) = shap_bar(-0.1);
		assert!(left.abs() < 1e-9);
		assert!((width - 1.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn risk_ring() {
		assert!((risk_ring_offset(0.28) - 154.56).abs() < 1e-9);
		assert_eq!(risk_ring_offset(0.0), 0.0);
	}
}
