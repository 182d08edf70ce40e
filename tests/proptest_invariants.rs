//! Property tests across the simulator, the mesh interaction model, the
//! structured financing cart and the risk feed.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use purposepay::components::force_graph::{ForceGraphState, InteractionState, credit_mesh};
use purposepay::financing::{Cart, SHOP_ITEMS};
use purposepay::risk::{RiskBoard, RiskResponse};
use purposepay::simulator::{SliderInputs, liquidity_buffer, simulate, stability_score};

fn inputs_strategy() -> impl Strategy<Value = SliderInputs> {
	(0u8..=100, 0u8..=100, 0u8..=100, 0u8..=100).prop_map(|(s, v, i, p)| SliderInputs {
		savings: s,
		spending_volatility: v,
		income_stability: i,
		payment_reliability: p,
	})
}

fn mesh_state(seed: u64) -> ForceGraphState {
	ForceGraphState::new(credit_mesh(&mut StdRng::seed_from_u64(seed)), 800.0, 600.0)
}

// ── Simulator ───────────────────────────────────────────────────────────

proptest! {
	#[test]
	fn score_stays_in_band(inputs in inputs_strategy()) {
		let score = stability_score(&inputs);
		prop_assert!((0.10..=0.99).contains(&score), "score {} for {:?}", score, inputs);
	}

	#[test]
	fn liquidity_ignores_income_and_payment(
		a in inputs_strategy(),
		income in 0u8..=100,
		payment in 0u8..=100,
		seed in any::<u64>()
	) {
		let b = SliderInputs { income_stability: income, payment_reliability: payment, ..a };
		let mut rng = StdRng::seed_from_u64(seed);
		let sa = simulate(&a, 12, &mut rng);
		let sb = simulate(&b, 12, &mut rng);
		prop_assert_eq!(sa.liquidity, sb.liquidity);
		prop_assert_eq!(sa.liquidity, liquidity_buffer(a.savings, a.spending_volatility));
	}

	#[test]
	fn series_length_follows_horizon(inputs in inputs_strategy(), steps in 0u32..5) {
		let weeks = 12 + 4 * steps;
		let sim = simulate(&inputs, weeks, &mut StdRng::seed_from_u64(1));
		prop_assert_eq!(sim.series.len(), weeks as usize);
		prop_assert_eq!(sim.projection_marker().is_some(), steps > 0);
		prop_assert!(sim.series.iter().all(|w| w.income >= 0.0 && w.spending >= 0.0));
	}
}

// ── Mesh interaction ────────────────────────────────────────────────────

proptest! {
	#[test]
	fn selecting_a_node_hides_tooltips(seed in any::<u64>(), hover in 0usize..64, pick in 0usize..64) {
		let state = mesh_state(seed);
		let n = state.data.nodes.len();
		let mut ui = InteractionState::default();
		ui.hover_node(state.node_snapshot(hover % n).unwrap());
		ui.hover_edge(state.edge_snapshot(hover % state.data.edges.len(), 5.0, 5.0).unwrap());

		ui.select(state.node_snapshot(pick % n).unwrap());
		prop_assert!(ui.node_tooltip().is_none());
		prop_assert!(ui.edge_tooltip().is_none());
		prop_assert!(ui.is_selected(pick % n));
	}

	#[test]
	fn background_click_clears_selection(seed in any::<u64>(), pick in 0usize..64, jitter in 0.0f64..2.0) {
		let mut state = mesh_state(seed);
		let mut ui = InteractionState::default();
		ui.select(state.node_snapshot(pick % state.data.nodes.len()).unwrap());

		let (sx, sy) = (-500.0, -500.0);
		prop_assert_eq!(state.node_at_position(sx, sy), None);
		state.begin_pan(sx, sy);
		state.pan_to(sx + jitter, sy);
		if state.end_pan() {
			ui.clear_selection();
		}
		prop_assert!(ui.selected().is_none());
	}

	#[test]
	fn released_node_is_unpinned(seed in any::<u64>(), pick in 0usize..64, dx in -80.0f64..80.0) {
		let mut state = mesh_state(seed);
		let idx = pick % state.data.nodes.len();
		let (x, y) = state.layout.position(idx).unwrap();

		state.begin_drag(idx, x, y);
		state.drag_to(x + dx, y);
		prop_assert!(state.layout.is_pinned(idx));
		state.end_drag();
		prop_assert!(!state.layout.is_pinned(idx));
	}

	#[test]
	fn mesh_topology_is_seed_independent(a in any::<u64>(), b in any::<u64>()) {
		let (ga, gb) = (
			credit_mesh(&mut StdRng::seed_from_u64(a)),
			credit_mesh(&mut StdRng::seed_from_u64(b)),
		);
		prop_assert!(ga.validate().is_ok());
		let ids = |g: &purposepay::components::force_graph::GraphData| {
			g.nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>()
		};
		prop_assert_eq!(ids(&ga), ids(&gb));
		prop_assert_eq!(ga.edge_indices(), gb.edge_indices());
	}
}

// ── Financing cart ──────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum CartOp {
	Add(usize),
	Remove(usize),
}

fn cart_op() -> impl Strategy<Value = CartOp> {
	prop_oneof![
		(0..SHOP_ITEMS.len()).prop_map(CartOp::Add),
		(0..SHOP_ITEMS.len()).prop_map(CartOp::Remove),
	]
}

proptest! {
	#[test]
	fn cart_matches_a_counting_model(ops in prop::collection::vec(cart_op(), 0..40)) {
		let mut cart = Cart::default();
		let mut model = [0u32; 5];
		for op in ops {
			match op {
				CartOp::Add(i) => {
					if cart.add(SHOP_ITEMS[i].id).is_ok() {
						model[i] += 1;
					}
				}
				CartOp::Remove(i) => {
					cart.remove(SHOP_ITEMS[i].id);
					model[i] = model[i].saturating_sub(1);
				}
			}
		}

		for (item, qty) in SHOP_ITEMS.iter().zip(model) {
			prop_assert_eq!(cart.quantity(item.id), qty);
			if !item.credit {
				prop_assert_eq!(qty, 0);
			}
		}
		let expected: u32 = SHOP_ITEMS.iter().zip(model).map(|(item, q)| item.price * q).sum();
		prop_assert_eq!(cart.total(), expected);
		prop_assert!(cart.line_items().iter().all(|l| l.qty > 0));
	}
}

// ── Risk feed ───────────────────────────────────────────────────────────

proptest! {
	#[test]
	fn unusable_replies_leave_board_unchanged(body in ".{0,64}") {
		let mut board = RiskBoard::default();
		if !board.record(RiskResponse::parse(&body), 0.79) {
			prop_assert_eq!(board, RiskBoard::default());
		}
	}
}
