use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::error::CanvasError;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running `requestAnimationFrame` loop. Dropping or stopping the handle
/// cancels the pending frame and frees the callback.
pub struct SimulationHandle {
	frame: Rc<Cell<Option<i32>>>,
	callback: FrameCallback,
}

impl SimulationHandle {
	/// Call `tick` once per display frame until stopped.
	pub fn start(mut tick: impl FnMut() + 'static) -> Result<Self, CanvasError> {
		let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
		let frame = Rc::new(Cell::new(None));
		let callback: FrameCallback = Rc::new(RefCell::new(None));

		let (frame_inner, callback_inner, window_inner) =
			(frame.clone(), Rc::downgrade(&callback), window.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			frame_inner.set(None);
			tick();
			// upgrade fails once the handle is gone
			let Some(cell) = callback_inner.upgrade() else {
				return;
			};
			let slot = cell.borrow();
			if let Some(cb) = slot.as_ref() {
				match window_inner.request_animation_frame(cb.as_ref().unchecked_ref()) {
					Ok(id) => frame_inner.set(Some(id)),
					Err(err) => warn!("animation frame request failed: {err:?}"),
				}
			}
		}));

		if let Some(ref cb) = *callback.borrow() {
			frame.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
		}
		debug!("simulation started");
		Ok(Self { frame, callback })
	}

	/// Cancel the loop.
	pub fn stop(mut self) {
		self.cancel();
	}

	fn cancel(&mut self) {
		if let (Some(id), Some(window)) = (self.frame.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		if self.callback.borrow_mut().take().is_some() {
			debug!("simulation stopped");
		}
	}
}

impl Drop for SimulationHandle {
	fn drop(&mut self) {
		self.cancel();
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use wasm_bindgen_futures::JsFuture;
	use wasm_bindgen_test::*;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	async fn frames(n: u32) {
		for _ in 0..n {
			let next = js_sys::Promise::new(&mut |resolve, _| {
				let window = web_sys::window().expect("window");
				window.request_animation_frame(&resolve).expect("frame request");
			});
			JsFuture::from(next).await.expect("frame");
		}
	}

	fn counting() -> (Rc<Cell<u32>>, SimulationHandle) {
		let ticks = Rc::new(Cell::new(0));
		let counter = ticks.clone();
		let handle = SimulationHandle::start(move || counter.set(counter.get() + 1))
			.expect("loop starts");
		(ticks, handle)
	}

	#[wasm_bindgen_test]
	async fn ticks_until_stopped() {
		let (ticks, handle) = counting();
		frames(3).await;
		assert!(ticks.get() >= 2, "only {} ticks", ticks.get());

		handle.stop();
		let seen = ticks.get();
		frames(5).await;
		assert_eq!(ticks.get(), seen);
	}

	#[wasm_bindgen_test]
	async fn dropping_the_handle_cancels_the_loop() {
		let (ticks, handle) = counting();
		frames(2).await;
		drop(handle);
		let seen = ticks.get();
		frames(5).await;
		assert_eq!(ticks.get(), seen);
	}
}
