use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::animation::SimulationHandle;
use super::render;
use super::state::{ForceGraphState, FrameView};
use super::style::ColorMode;
use crate::error::CanvasError;
use crate::notes::Note;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

/// Canvas graph of `notes`. Click selects a node, double click focuses the
/// local graph on it.
#[component]
pub fn NoteGraph(
	#[prop(into)] notes: Signal<Vec<Note>>,
	#[prop(into)] color_mode: Signal<ColorMode>,
	selected: RwSignal<Option<String>>,
	focus: RwSignal<Option<String>>,
	#[prop(into)] highlight: Signal<Vec<String>>,
	#[prop(into)] query: Signal<String>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let handle: Rc<RefCell<Option<SimulationHandle>>> = Rc::new(RefCell::new(None));

	let frame_view = move || FrameView {
		color_mode: color_mode.get_untracked(),
		selected: selected.get_untracked(),
		focus: focus.get_untracked(),
		highlight: highlight.get_untracked(),
		query: query.get_untracked(),
	};

	let (state_init, handle_init) = (state.clone(), handle.clone());
	Effect::new(move |_| {
		let notes = notes.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let now = js_sys::Date::now();

		{
			let mut slot = state_init.borrow_mut();
			match slot.as_mut() {
				Some(s) => s.set_notes(&notes, now),
				None => {
					let (w, h) = canvas_size(&canvas, width, height);
					canvas.set_width(w as u32);
					canvas.set_height(h as u32);
					*slot = Some(ForceGraphState::new(&notes, w, h, now as u64, now));
				}
			}
		}

		// an empty garden never starts the loop
		if notes.is_empty() || handle_init.borrow().is_some() {
			return;
		}
		let follow_parent = width.is_none() && height.is_none();
		match start_loop(&canvas, state_init.clone(), follow_parent, frame_view) {
			Ok(h) => *handle_init.borrow_mut() = Some(h),
			Err(err) => error!("graph canvas unavailable: {err}"),
		}
	});

	let handle_cleanup = SendWrapper::new(handle);
	on_cleanup(move || {
		if let Some(h) = handle_cleanup.take().borrow_mut().take() {
			h.stop();
		}
	});

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(ref mut s) = *state_click.borrow_mut() {
			selected.set(s.node_at(x, y, &frame_view()));
		}
	};

	let state_dbl = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev, canvas_ref) else {
			return;
		};
		if let Some(ref mut s) = *state_dbl.borrow_mut() {
			if let Some(id) = s.node_at(x, y, &frame_view()) {
				focus.set(Some(id));
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="note-graph-canvas"
			on:click=on_click
			on:dblclick=on_dblclick
			style="display: block; width: 100%; height: 100%; cursor: pointer; background: #1a1625;"
		/>
	}
}

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn pointer(ev: &MouseEvent, canvas_ref: NodeRef<leptos::html::Canvas>) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn start_loop(
	canvas: &HtmlCanvasElement,
	state: SharedState,
	follow_parent: bool,
	frame_view: impl Fn() -> FrameView + 'static,
) -> Result<SimulationHandle, CanvasError> {
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(CanvasError::NoContext)?
		.dyn_into()
		.map_err(|_| CanvasError::NoContext)?;
	let canvas = canvas.clone();

	SimulationHandle::start(move || {
		let Ok(mut slot) = state.try_borrow_mut() else {
			return;
		};
		let Some(ref mut s) = *slot else {
			return;
		};
		if let Some(parent) = canvas.parent_element().filter(|_| follow_parent) {
			let (w, h) = (parent.client_width() as f64, parent.client_height() as f64);
			if w > 0.0 && h > 0.0 && (w, h) != s.engine.size() {
				canvas.set_width(w as u32);
				canvas.set_height(h as u32);
				s.resize(w, h);
			}
		}
		let now = js_sys::Date::now();
		s.tick();
		render::render(s, &frame_view(), now, &ctx);
	})
}
