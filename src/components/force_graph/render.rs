use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::layout::LayoutEngine;
use super::state::ForceGraphState;
use super::types::NodeRole;

const BACKGROUND: &str = "#0B0E14";
const STABLE_RGB: &str = "34, 197, 94";
const UNSTABLE_RGB: &str = "239, 68, 68";
const LABEL_COLOR: &str = "#e2e8f0";
const SELECTED_RING: &str = "#22d3ee";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Opacity of a pulsing edge: 0.2 → 0.7 → 0.2 every two seconds.
fn pulse(flow_time: f64) -> f64 {
	0.45 - 0.25 * (PI * flow_time).cos()
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, selected: Option<usize>) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = state.layout.positions();
	draw_edges(state, ctx, &positions);
	draw_nodes(state, ctx, &positions, selected);
	ctx.restore();
}

/// Stroke opacity of edge `i` joining nodes `s` and `d` at highlight
/// progress `t`. Hovering a node brightens its edges and dims the rest.
fn edge_alpha(state: &ForceGraphState, i: usize, (s, d): (usize, usize), t: f64) -> f64 {
	let base = if state.data.edges[i].active {
		pulse(state.flow_time)
	} else {
		0.2
	};
	if state.hover.edge == Some(i) {
		0.9
	} else if !state.has_active_highlight() {
		base
	} else if state.is_highlighted(s) && state.is_highlighted(d) {
		base + (0.8 - base) * t
	} else {
		base * (1.0 - 0.6 * t)
	}
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, positions: &[(f64, f64)]) {
	let t = ease_out_cubic(state.hover.highlight_t);
	ctx.set_line_cap("round");

	for (i, edge) in state.data.edges.iter().enumerate() {
		let (Some(s), Some(d)) = (
			state.data.index_of(&edge.source),
			state.data.index_of(&edge.target),
		) else {
			continue;
		};
		let ((x1, y1), (x2, y2)) = (positions[s], positions[d]);

		let alpha = edge_alpha(state, i, (s, d), t);
		let rgb = if edge.stable { STABLE_RGB } else { UNSTABLE_RGB };
		ctx.set_stroke_style_str(&format!("rgba({rgb}, {alpha})"));
		ctx.set_line_width(edge.weight * 1.5);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	positions: &[(f64, f64)],
	selected: Option<usize>,
) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	for (idx, node) in state.data.nodes.iter().enumerate() {
		let (x, y) = positions[idx];
		let highlighted = state.is_highlighted(idx);
		let alpha = if has_highlight && !highlighted {
			1.0 - 0.5 * t
		} else {
			1.0
		};
		let radius = if state.is_hovered(idx) {
			node.radius * (1.0 + 0.15 * t)
		} else {
			node.radius
		};

		if state.is_hovered(idx) && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, radius * 2.2) {
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.35 * t));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", 0.1 * t));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius * 2.2, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(alpha);
		ctx.set_shadow_color(node.status.color());
		ctx.set_shadow_blur(8.0);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color());
		ctx.fill();
		ctx.set_shadow_blur(0.0);

		ctx.set_stroke_style_str("#ffffff");
		ctx.set_line_width(if node.is_hub() { 3.0 } else { 1.5 });
		ctx.stroke();

		if selected == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 5.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(SELECTED_RING);
			ctx.set_line_width(2.0);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(&4.0.into(), &3.0.into()));
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let font = match node.role {
			NodeRole::Hub => "bold 12px sans-serif",
			_ => "500 10px sans-serif",
		};
		ctx.set_font(font);
		ctx.set_text_align("center");
		ctx.set_fill_style_str(LABEL_COLOR);
		let _ = ctx.fill_text(&node.label, x, y + node.radius + 15.0);
		ctx.set_global_alpha(1.0);
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::builder::credit_mesh;
	use super::*;

	fn state() -> ForceGraphState {
		ForceGraphState::new(credit_mesh(&mut StdRng::seed_from_u64(3)), 800.0, 600.0)
	}

	fn endpoints(state: &ForceGraphState, i: usize) -> (usize, usize) {
		let edge = &state.data.edges[i];
		(
			state.data.index_of(&edge.source).unwrap(),
			state.data.index_of(&edge.target).unwrap(),
		)
	}

	#[test]
	fn frame_positions_cover_every_node() {
		let s = state();
		let positions = s.layout.positions();
		assert_eq!(positions.len(), s.data.nodes.len());
		assert!(positions.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
	}

	#[test]
	fn hovered_edge_is_brightest() {
		let mut s = state();
		let i = s.data.edges.iter().position(|e| !e.active).unwrap();
		let ends = endpoints(&s, i);
		assert!((edge_alpha(&s, i, ends, 0.0) - 0.2).abs() < 1e-9);

		s.set_hover_edge(Some(i));
		assert_eq!(edge_alpha(&s, i, ends, 0.0), 0.9);
	}

	#[test]
	fn node_hover_dims_unrelated_edges() {
		let mut s = state();
		let leaf = s.data.index_of("rd").unwrap();
		s.set_hover(Some(leaf));
		let far = (0..s.data.edges.len())
			.find(|&i| {
				let (a, b) = endpoints(&s, i);
				!(s.is_highlighted(a) && s.is_highlighted(b)) && !s.data.edges[i].active
			})
			.unwrap();
		let ends = endpoints(&s, far);
		assert!(edge_alpha(&s, far, ends, 1.0) < 0.2);
	}

	#[test]
	fn pulse_spans_css_keyframes() {
		assert!((pulse(0.0) - 0.2).abs() < 1e-9);
		assert!((pulse(1.0) - 0.7).abs() < 1e-9);
		assert!((pulse(2.0) - 0.2).abs() < 1e-9);
	}
}
