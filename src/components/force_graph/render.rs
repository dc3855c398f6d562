use std::collections::HashSet;
use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, FrameView};
use super::style::{PEACH, SAGE};
use super::types::NodeSnapshot;

const BACKGROUND: &str = "#1a1625";

pub fn render(
	state: &mut ForceGraphState,
	view: &FrameView,
	now_ms: f64,
	ctx: &CanvasRenderingContext2d,
) {
	let (width, height) = state.engine.size();
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);

	state.refresh(view);
	let state = &*state;
	let visible = state.visible(view);
	let matches = state.search_matches(view);
	let now = DateTime::<Utc>::from_timestamp_millis(now_ms as i64).unwrap_or_else(Utc::now);

	draw_links(state, view, visible, now, ctx);
	draw_nodes(state, view, visible, matches, now_ms, now, ctx);
}

fn endpoint<'a>(state: &'a ForceGraphState, id: &str) -> Option<&'a NodeSnapshot> {
	state
		.engine
		.index_of(id)
		.and_then(|i| state.snapshot.nodes.get(i))
}

fn is_shown(visible: Option<&HashSet<String>>, id: &str) -> bool {
	visible.is_none_or(|v| v.contains(id))
}

fn draw_links(
	state: &ForceGraphState,
	view: &FrameView,
	visible: Option<&HashSet<String>>,
	now: DateTime<Utc>,
	ctx: &CanvasRenderingContext2d,
) {
	let local = visible.is_some();
	ctx.set_global_alpha(if local { 0.8 } else { 0.6 });

	for link in state.engine.links() {
		if !is_shown(visible, &link.source) || !is_shown(visible, &link.target) {
			continue;
		}
		let (Some(a), Some(b)) = (endpoint(state, &link.source), endpoint(state, &link.target)) else {
			continue;
		};

		let on_path = view.is_highlighted(&link.source) && view.is_highlighted(&link.target);
		let gradient = ctx.create_linear_gradient(a.x, a.y, b.x, b.y);
		let _ = gradient.add_color_stop(0.0, state.color_of(&a.id, view.color_mode, now));
		let _ = gradient.add_color_stop(1.0, state.color_of(&b.id, view.color_mode, now));
		#[allow(deprecated)]
		ctx.set_stroke_style(&gradient);
		ctx.set_line_width(match (on_path, local) {
			(true, _) => 5.0,
			(false, true) => 3.0,
			(false, false) => 2.0,
		});
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(
	state: &ForceGraphState,
	view: &FrameView,
	visible: Option<&HashSet<String>>,
	matches: Option<&HashSet<String>>,
	now_ms: f64,
	now: DateTime<Utc>,
	ctx: &CanvasRenderingContext2d,
) {
	let time = now_ms * 0.001;
	let settling = state.engine.is_settling(now_ms);

	for node in state.snapshot.nodes.iter() {
		if !is_shown(visible, &node.id) {
			continue;
		}
		let (x, y) = (node.x, node.y);
		let seed = node.id.chars().next().map_or(0.0, |c| c as u32 as f64);
		let pulse = 1.0 + (time + seed).sin() * 0.1;
		let size = state
			.radius_of(&node.id, view.color_mode)
			.unwrap_or(node.radius);
		let color = state.color_of(&node.id, view.color_mode, now);
		let dimmed = matches.is_some_and(|m| !m.contains(&*node.id));

		ctx.set_global_alpha(if dimmed { 0.25 } else { 1.0 });

		let glow = size * if settling { 2.6 } else { 2.0 } * pulse;
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, 0.0, x, y, glow) {
			let _ = gradient.add_color_stop(0.0, color);
			let _ = gradient.add_color_stop(1.0, "transparent");
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow, 0.0, 2.0 * PI);
			ctx.fill();
		}

		ctx.set_fill_style_str(color);
		ctx.begin_path();
		let _ = ctx.arc(x, y, size * pulse, 0.0, 2.0 * PI);
		ctx.fill();

		if view.selected.as_deref() == Some(&*node.id) || view.is_highlighted(&node.id) {
			ring(ctx, x, y, size * pulse + 5.0, SAGE, 3.0);
		}

		if view.focus.as_deref() == Some(&*node.id) && visible.is_some() {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(5.0),
				&JsValue::from_f64(5.0),
			));
			ring(ctx, x, y, size * pulse + 10.0, PEACH, 4.0);
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
	ctx.set_global_alpha(1.0);
}

fn ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: &str, width: f64) {
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.stroke();
}
