//! BrainBloom note graph: force-directed layout, local graph view and
//! shortest-path search over an in-memory note garden, as a Leptos CSR app.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod error;
pub mod notes;
mod pages;

pub use components::force_graph::{
	ColorMode, GraphLink, GraphNode, LOCAL_GRAPH_HOPS, LayoutEngine, LayoutParams, NodeSnapshot,
	SimulationHandle, Snapshot, Vec2, display_radius, ego_network, node_color, title_radius,
};
pub use components::path_finder::find_path;
pub use error::CanvasError;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Root component: page metadata plus the router.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="BrainBloom" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
