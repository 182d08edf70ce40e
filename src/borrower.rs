//! Borrower dashboard history and headline metrics.

use crate::simulator::WeekSample;

/// Delay before the improvement toggle takes effect.
pub const IMPROVEMENT_DELAY_MS: u64 = 800;

/// Weeks after this index get the improvement adjustment.
const IMPROVED_FROM: usize = 8;
const SAVINGS_GAIN: f64 = 500.0;
const SPENDING_CUT: f64 = 300.0;

const BASELINE: [(f64, f64, f64); 12] = [
	(4000.0, 3800.0, 200.0),
	(4200.0, 4000.0, 200.0),
	(3800.0, 4100.0, -300.0),
	(4500.0, 3500.0, 1000.0),
	(4100.0, 3900.0, 200.0),
	(4300.0, 4200.0, 100.0),
	(4000.0, 3800.0, 200.0),
	(4600.0, 3600.0, 1000.0),
	(4200.0, 4000.0, 200.0),
	(4400.0, 4100.0, 300.0),
	(4100.0, 3900.0, 200.0),
	(4500.0, 3700.0, 800.0),
];

/// The recorded 12 weeks of income, spending and savings.
pub fn baseline_history() -> Vec<WeekSample> {
	BASELINE
		.iter()
		.enumerate()
		.map(|(i, &(income, spending, savings))| WeekSample::new(i + 1, income, spending, savings))
		.collect()
}

/// Baseline with the last weeks showing more savings and less spending.
pub fn improved_history() -> Vec<WeekSample> {
	baseline_history()
		.into_iter()
		.enumerate()
		.map(|(i, mut w)| {
			if i > IMPROVED_FROM {
				w.savings += SAVINGS_GAIN;
				w.spending -= SPENDING_CUT;
			}
			w
		})
		.collect()
}

pub fn history(improved: bool) -> Vec<WeekSample> {
	if improved {
		improved_history()
	} else {
		baseline_history()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
	Good,
	Warning,
	Bad,
}

impl Tone {
	pub fn color(self) -> &'static str {
		match self {
			Self::Good => "#4ade80",
			Self::Warning => "#facc15",
			Self::Bad => "#f87171",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadlineMetric {
	pub label: &'static str,
	pub value: &'static str,
	pub subtext: &'static str,
	pub tone: Tone,
}

const fn metric(
	label: &'static str,
	value: &'static str,
	subtext: &'static str,
	tone: Tone,
) -> HeadlineMetric {
	HeadlineMetric {
		label,
		value,
		subtext,
		tone,
	}
}

/// The four cards under the history chart.
pub fn headline_metrics(improved: bool) -> [HeadlineMetric; 4] {
	if improved {
		[
			metric("Income Stability", "82%", "High", Tone::Good),
			metric("Spending Volatility", "Low", "Controlled", Tone::Good),
			metric("Savings Rate", "15%", "Excellent", Tone::Good),
			metric("Payment Reliability", "98%", "Strong", Tone::Good),
		]
	} else {
		[
			metric("Income Stability", "78%", "Moderate", Tone::Warning),
			metric("Spending Volatility", "Med-High", "Fluctuating", Tone::Warning),
			metric("Savings Rate", "4%", "Low", Tone::Bad),
			metric("Payment Reliability", "98%", "Strong", Tone::Good),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn baseline_has_twelve_labelled_weeks() {
		let h = baseline_history();
		assert_eq!(h.len(), 12);
		assert_eq!(h[0].week, "W1");
		assert_eq!(h[2].savings, -300.0);
		assert_eq!(h[11].week, "W12");
	}

	#[test]
	fn improvement_only_touches_last_three_weeks() {
		let base = baseline_history();
		let better = improved_history();
		for (i, (b, g)) in base.iter().zip(&better).enumerate() {
			assert_eq!(b.income, g.income);
			if i > 8 {
				assert_eq!(g.savings, b.savings + 500.0);
				assert_eq!(g.spending, b.spending - 300.0);
			} else {
				assert_eq!(b, g);
			}
		}
		assert_eq!(better[9].week, "W10");
	}

	#[test]
	fn metrics_follow_mode() {
		let before = headline_metrics(false);
		let after = headline_metrics(true);
		assert_eq!(before[0].value, "78%");
		assert_eq!(after[0].value, "82%");
		assert_eq!(before[2].tone, Tone::Bad);
		assert_eq!(before[3], after[3]);
	}
}
