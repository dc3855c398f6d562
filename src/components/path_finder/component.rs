use leptos::prelude::*;
use log::info;
use web_sys::MouseEvent;

use super::search::find_path;
use crate::notes::Note;

/// What the finder shows and what the graph highlights. Starting from a new
/// note resets both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathOutcome {
	/// Listed result; `Some(vec![])` means "no path".
	pub found: Option<Vec<Note>>,
	/// Ids the graph draws as the path.
	pub highlight: Vec<String>,
}

impl PathOutcome {
	/// Nothing found yet.
	pub fn cleared() -> Self {
		Self::default()
	}

	/// Run the search from `from` to `to` over `notes`.
	pub fn search(notes: &[Note], from: &str, to: &str) -> Self {
		match find_path(notes, from, to) {
			Some(hops) => {
				info!("path {from} -> {to}: {} notes", hops.len());
				Self {
					highlight: hops.iter().map(|n| n.id.clone()).collect(),
					found: Some(hops.into_iter().cloned().collect()),
				}
			}
			None => Self::cleared(),
		}
	}
}

/// Source/target pickers plus the shortest path between them. The ids of the
/// found path are written to `path` so the graph can highlight them.
#[component]
pub fn PathFinder(
	#[prop(into)] notes: Signal<Vec<Note>>,
	#[prop(into)] start: Signal<Option<String>>,
	path: RwSignal<Vec<String>>,
) -> impl IntoView {
	let source = RwSignal::new(start.get_untracked().unwrap_or_default());
	let target = RwSignal::new(String::new());
	let found = RwSignal::new(None::<Vec<Note>>);

	let apply = move |outcome: PathOutcome| {
		path.set(outcome.highlight);
		found.set(outcome.found);
	};

	// follow the selected node
	Effect::new(move |_| {
		if let Some(id) = start.get() {
			source.set(id);
			apply(PathOutcome::cleared());
		}
	});

	let search = move |_: MouseEvent| {
		let (from, to) = (source.get_untracked(), target.get_untracked());
		apply(notes.with_untracked(|all| PathOutcome::search(all, &from, &to)));
	};

	let options = move |exclude: Option<String>| {
		notes
			.get()
			.into_iter()
			.filter(|n| exclude.as_deref() != Some(n.id.as_str()))
			.map(|n| view! { <option value=n.id.clone()>{n.title.clone()}</option> })
			.collect_view()
	};

	view! {
		<div class="path-finder">
			<h4>"Path finder"</h4>
			<label>"From"</label>
			<select
				prop:value=move || source.get()
				on:change=move |ev| source.set(event_target_value(&ev))
			>
				<option value="">"Select a note..."</option>
				{move || options(None)}
			</select>
			<label>"To"</label>
			<select
				prop:value=move || target.get()
				on:change=move |ev| target.set(event_target_value(&ev))
			>
				<option value="">"Select a note..."</option>
				{move || options(Some(source.get()))}
			</select>
			<button
				on:click=search
				disabled=move || source.get().is_empty() || target.get().is_empty()
			>
				"Find path"
			</button>
			{move || match found.get() {
				None => ().into_any(),
				Some(hops) if hops.is_empty() => {
					view! { <p class="path-empty">"No path between these notes."</p> }.into_any()
				}
				Some(hops) => {
					view! {
						<ol class="path-result">
							{hops
								.into_iter()
								.map(|n| view! { <li>{n.title}</li> })
								.collect_view()}
						</ol>
					}
						.into_any()
				}
			}}
		</div>
	}
}
