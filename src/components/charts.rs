//! Small SVG charts: weekly cash-flow lines and sparklines.

use leptos::prelude::*;

use crate::simulator::WeekSample;

const CHART_W: f64 = 600.0;
const CHART_H: f64 = 220.0;
const CHART_PAD: f64 = 12.0;

pub const INCOME_COLOR: &str = "#3b82f6";
pub const SPENDING_COLOR: &str = "#ef4444";
pub const SAVINGS_COLOR: &str = "#10b981";
const MARKER_COLOR: &str = "#eab308";

/// Min and max over every series; a flat range is widened by one.
pub fn extent<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> (f64, f64) {
	let (lo, hi) = series
		.into_iter()
		.flatten()
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
			(lo.min(v), hi.max(v))
		});
	if !lo.is_finite() || !hi.is_finite() {
		(0.0, 1.0)
	} else if lo == hi {
		(lo - 0.5, hi + 0.5)
	} else {
		(lo, hi)
	}
}

/// X position of sample `i` of `n` across `width`.
pub fn x_at(i: usize, n: usize, width: f64) -> f64 {
	if n <= 1 {
		width / 2.0
	} else {
		i as f64 * width / (n - 1) as f64
	}
}

/// Map values into a `width` x `height` box, larger values higher up.
pub fn scale_points(values: &[f64], width: f64, height: f64, (lo, hi): (f64, f64)) -> Vec<(f64, f64)> {
	let span = hi - lo;
	values
		.iter()
		.enumerate()
		.map(|(i, &v)| {
			let t = if span == 0.0 { 0.5 } else { (v - lo) / span };
			(x_at(i, values.len(), width), height - t * height)
		})
		.collect()
}

/// SVG `points` attribute.
pub fn polyline(points: &[(f64, f64)]) -> String {
	points
		.iter()
		.map(|(x, y)| format!("{x:.1},{y:.1}"))
		.collect::<Vec<_>>()
		.join(" ")
}

/// Closed area path under a line, down to the bottom edge.
pub fn area_path(points: &[(f64, f64)], height: f64) -> String {
	let (Some(first), Some(last)) = (points.first(), points.last()) else {
		return String::new();
	};
	let mut d = format!("M{:.1},{height:.1}", first.0);
	for (x, y) in points {
		d.push_str(&format!(" L{x:.1},{y:.1}"));
	}
	d.push_str(&format!(" L{:.1},{height:.1} Z", last.0));
	d
}

#[derive(PartialEq)]
struct Lines {
	income: Vec<(f64, f64)>,
	spending: Vec<(f64, f64)>,
	savings: Vec<(f64, f64)>,
	labels: Vec<(f64, String)>,
}

fn layout_lines(series: &[WeekSample]) -> Lines {
	let income: Vec<f64> = series.iter().map(|w| w.income).collect();
	let spending: Vec<f64> = series.iter().map(|w| w.spending).collect();
	let savings: Vec<f64> = series.iter().map(|w| w.savings).collect();
	let range = extent([income.as_slice(), spending.as_slice(), savings.as_slice()]);
	let (w, h) = (CHART_W - 2.0 * CHART_PAD, CHART_H - 2.0 * CHART_PAD);
	let shift = |pts: Vec<(f64, f64)>| -> Vec<(f64, f64)> {
		pts.into_iter()
			.map(|(x, y)| (x + CHART_PAD, y + CHART_PAD))
			.collect()
	};
	Lines {
		income: shift(scale_points(&income, w, h, range)),
		spending: shift(scale_points(&spending, w, h, range)),
		savings: shift(scale_points(&savings, w, h, range)),
		labels: series
			.iter()
			.enumerate()
			.map(|(i, s)| (x_at(i, series.len(), w) + CHART_PAD, s.week.clone()))
			.collect(),
	}
}

/// Income, spending and savings lines over weeks, with an optional dashed
/// marker at a week label.
#[component]
pub fn CashFlowChart(
	#[prop(into)] series: Signal<Vec<WeekSample>>,
	#[prop(into, optional)] marker: MaybeProp<String>,
	#[prop(default = false)] filled: bool,
) -> impl IntoView {
	let lines = Memo::new(move |_| series.with(|s| layout_lines(s)));
	let marker_x = move || {
		let label = marker.get()?;
		lines.with(|l| l.labels.iter().find(|(_, w)| *w == label).map(|(x, _)| *x))
	};

	view! {
		<svg
			class="cash-flow-chart"
			viewBox=format!("0 0 {CHART_W} {}", CHART_H + 24.0)
			preserveAspectRatio="none"
		>
			{move || {
				filled
					.then(|| {
						lines
							.with(|l| {
								view! {
									<path d=area_path(&l.income, CHART_H - CHART_PAD) fill=INCOME_COLOR fill-opacity="0.15" />
									<path d=area_path(&l.savings, CHART_H - CHART_PAD) fill=SAVINGS_COLOR fill-opacity="0.15" />
								}
							})
					})
			}}
			<polyline
				points=move || lines.with(|l| polyline(&l.income))
				fill="none"
				stroke=INCOME_COLOR
				stroke-width="2"
			/>
			<polyline
				points=move || lines.with(|l| polyline(&l.spending))
				fill="none"
				stroke=SPENDING_COLOR
				stroke-width="2"
				stroke-dasharray=if filled { "5 5" } else { "" }
			/>
			<polyline
				points=move || lines.with(|l| polyline(&l.savings))
				fill="none"
				stroke=SAVINGS_COLOR
				stroke-width="2"
			/>
			{move || {
				marker_x()
					.map(|x| {
						view! {
							<line
								x1=x.to_string()
								x2=x.to_string()
								y1=CHART_PAD.to_string()
								y2=(CHART_H - CHART_PAD).to_string()
								stroke=MARKER_COLOR
								stroke-dasharray="3 3"
							/>
							<text x=(x - 4.0).to_string() y=(CHART_PAD + 10.0).to_string() text-anchor="end" fill=MARKER_COLOR font-size="10">
								"PROJECTION EXTENDED"
							</text>
						}
					})
			}}
			{move || {
				lines
					.with(|l| {
						l.labels
							.iter()
							.map(|(x, label)| {
								view! {
									<text x=x.to_string() y=(CHART_H + 14.0).to_string() text-anchor="middle" fill="#64748b" font-size="10">
										{label.clone()}
									</text>
								}
							})
							.collect_view()
					})
			}}
		</svg>
	}
}

/// Tiny trend line without axes.
#[component]
pub fn Sparkline(values: Vec<f64>, color: &'static str) -> impl IntoView {
	let (w, h) = (96.0, 40.0);
	let points = polyline(&scale_points(&values, w, h - 4.0, extent([values.as_slice()])));
	view! {
		<svg class="sparkline" viewBox=format!("0 -2 {w} {h}") preserveAspectRatio="none">
			<polyline points=points fill="none" stroke=color stroke-width="2" />
		</svg>
	}
}

/// Sparkline with a soft fill, used on the model score cards.
#[component]
pub fn AreaSparkline(values: Vec<f64>, color: &'static str) -> impl IntoView {
	let (w, h) = (120.0, 48.0);
	let pts = scale_points(&values, w, h, extent([values.as_slice()]));
	view! {
		<svg class="sparkline" viewBox=format!("0 0 {w} {h}") preserveAspectRatio="none">
			<path d=area_path(&pts, h) fill=color fill-opacity="0.2" />
			<polyline points=polyline(&pts) fill="none" stroke=color stroke-width="2" />
		</svg>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extent_handles_flat_and_empty() {
		assert_eq!(extent([[1.0, 5.0].as_slice(), [-2.0].as_slice()]), (-2.0, 5.0));
		assert_eq!(extent([[3.0, 3.0].as_slice()]), (2.5, 3.5));
		assert_eq!(extent(std::iter::empty::<&[f64]>()), (0.0, 1.0));
	}

	#[test]
	fn points_span_the_box() {
		let pts = scale_points(&[0.0, 5.0, 10.0], 100.0, 50.0, (0.0, 10.0));
		assert_eq!(pts, vec![(0.0, 50.0), (50.0, 25.0), (100.0, 0.0)]);
		assert_eq!(x_at(0, 1, 100.0), 50.0);
	}

	#[test]
	fn svg_strings() {
		assert_eq!(polyline(&[(0.0, 1.0), (2.5, 3.26)]), "0.0,1.0 2.5,3.3");
		assert_eq!(area_path(&[(0.0, 1.0), (4.0, 2.0)], 10.0), "M0.0,10.0 L0.0,1.0 L4.0,2.0 L4.0,10.0 Z");
		assert_eq!(area_path(&[], 10.0), "");
	}
}
