use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while wiring the graph canvas into the page.
#[derive(Debug, Error)]
pub enum CanvasError {
	/// Not running inside a browser window.
	#[error("no global window")]
	NoWindow,
	/// The canvas refused to hand out a 2d context.
	#[error("canvas has no 2d rendering context")]
	NoContext,
	/// A browser API threw.
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<JsValue> for CanvasError {
	fn from(value: JsValue) -> Self {
		CanvasError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
