use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::interaction::InteractionState;
use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;

const FRAME_DT: f32 = 0.016;

/// Size the canvas should take: the window when fullscreen, else its parent.
fn measure(canvas: &HtmlCanvasElement, fullscreen: bool) -> (f64, f64) {
	if fullscreen {
		let Some(window) = web_sys::window() else {
			return (0.0, 0.0);
		};
		let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		(dim(window.inner_width()), dim(window.inner_height()))
	} else {
		canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.unwrap_or((0.0, 0.0))
	}
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive mesh canvas. Pointer events write into `interaction`; the
/// page draws tooltips and the detail panel from it.
#[component]
pub fn ForceGraphCanvas(
	/// Mesh to lay out, read once when the canvas first measures.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Selection and hover cells shared with the page.
	interaction: RwSignal<InteractionState>,
	/// Size to the window instead of the parent element.
	#[prop(default = false)]
	fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let started = Rc::new(Cell::new(false));
	let alive = Arc::new(AtomicBool::new(true));

	let alive_cleanup = alive.clone();
	on_cleanup(move || alive_cleanup.store(false, Ordering::Relaxed));

	let (state_init, animate_init) = (state.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if started.replace(true) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("canvas has no 2d context");
				return;
			}
		};
		let graph = data.get_untracked();

		let (state_anim, animate_inner, alive) =
			(state_init.clone(), animate_init.clone(), alive.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive.load(Ordering::Relaxed) {
				debug!("mesh canvas unmounted, stopping animation");
				return;
			}

			let (w, h) = measure(&canvas, fullscreen);
			{
				let mut slot = state_anim.borrow_mut();
				match slot.as_mut() {
					// Layout waits for a non-zero container
					None if w > 0.0 && h > 0.0 => {
						canvas.set_width(w as u32);
						canvas.set_height(h as u32);
						debug!("mesh layout starting at {w}x{h}");
						*slot = Some(ForceGraphState::new(graph.clone(), w, h));
					}
					Some(s) if (s.width, s.height) != (w, h) => {
						canvas.set_width(w as u32);
						canvas.set_height(h as u32);
						s.resize(w, h);
					}
					_ => {}
				}
				if let Some(s) = slot.as_mut() {
					s.tick(FRAME_DT);
					let selected = interaction.with_untracked(|i| i.selected().map(|n| n.index));
					render::render(s, &ctx, selected);
				}
			}

			if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(cb), Some(window)) = (animate_init.borrow().as_ref(), web_sys::window()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.begin_drag(idx, x, y);
				s.set_hover_edge(None);
				if let Some(snap) = s.node_snapshot(idx) {
					interaction.update(|i| i.select(snap));
				}
			} else {
				s.begin_pan(x, y);
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
				return;
			}
			s.pan_to(x, y);

			let hovered = s.node_at_position(x, y);
			if s.set_hover(hovered) {
				match hovered.and_then(|i| s.node_snapshot(i)) {
					Some(snap) => interaction.update(|i| i.hover_node(snap)),
					None => interaction.update(|i| i.leave_node()),
				}
			}

			let edge = if hovered.is_none() {
				s.edge_at_position(x, y)
			} else {
				None
			};
			if s.set_hover_edge(edge) {
				let snap = edge.and_then(|e| {
					s.edge_snapshot(e, ev.client_x() as f64, ev.client_y() as f64)
				});
				match snap {
					Some(snap) => interaction.update(|i| i.hover_edge(snap)),
					None => interaction.update(|i| i.leave_edge()),
				}
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				s.end_drag();
			} else if s.end_pan() {
				interaction.update(|i| i.clear_selection());
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_drag();
			s.end_pan();
			if s.set_hover(None) {
				interaction.update(|i| i.leave_node());
			}
			if s.set_hover_edge(None) {
				interaction.update(|i| i.leave_edge());
			}
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
