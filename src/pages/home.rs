use leptos::prelude::*;
use log::info;
use web_sys::MouseEvent;

use crate::components::force_graph::{ColorMode, NoteGraph};
use crate::components::note_panel::NotePanel;
use crate::notes::NoteStore;

/// Graph page over the demo garden.
#[component]
pub fn Home() -> impl IntoView {
	let store = RwSignal::new(NoteStore::with_sample_notes());
	let notes = Signal::derive(move || store.with(|s| s.all().to_vec()));
	let color_mode = RwSignal::new(ColorMode::default());
	let selected = RwSignal::new(None::<String>);
	let focus = RwSignal::new(None::<String>);
	let path = RwSignal::new(Vec::<String>::new());
	let query = RwSignal::new(String::new());

	// a path belongs to the selection it was found from
	Effect::new(move |_| {
		selected.track();
		path.set(Vec::new());
	});

	let new_note = move |_: MouseEvent| {
		let note = store.write().create("", "");
		info!("created note {}", note.id);
		selected.set(Some(note.id));
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<div class="graph-error">
					<h1>"The graph could not be drawn"</h1>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <p>{e.to_string()}</p> })
							.collect_view()
					}}
				</div>
			}
		}>
			<div class="graph-page">
				<header class="graph-header">
					<h1>"Graph"</h1>
					<button class="new-note" on:click=new_note>
						"New note"
					</button>
					<Show when=move || focus.get().is_some()>
						<button class="local-mode" on:click=move |_| focus.set(None)>
							"Local mode (exit)"
						</button>
					</Show>
					<input
						class="graph-search"
						placeholder="Search..."
						prop:value=move || query.get()
						on:input=move |ev| query.set(event_target_value(&ev))
					/>
					<div class="color-modes">
						{ColorMode::ALL
							.into_iter()
							.map(|mode| {
								view! {
									<button
										class:active=move || color_mode.get() == mode
										on:click=move |_| color_mode.set(mode)
									>
										{mode.label()}
									</button>
								}
							})
							.collect_view()}
					</div>
				</header>

				<div class="graph-canvas" class:open=move || selected.get().is_some()>
					<NoteGraph
						notes=notes
						color_mode=color_mode
						selected=selected
						focus=focus
						highlight=path
						query=query
					/>
				</div>

				<Show when=move || selected.get().is_some()>
					<NotePanel store=store selected=selected path=path />
				</Show>
			</div>
		</ErrorBoundary>
	}
}
