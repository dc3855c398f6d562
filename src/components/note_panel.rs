use chrono::{DateTime, Utc};
use leptos::prelude::*;
use log::info;
use web_sys::MouseEvent;

use crate::components::path_finder::PathFinder;
use crate::notes::{NoteStore, NoteUpdate};
use crate::notes::suggest::suggest_connections;

/// "3 days ago" style age.
pub fn relative_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
	let age = now - at;
	let (n, unit) = if age.num_days() >= 365 {
		(age.num_days() / 365, "year")
	} else if age.num_days() >= 30 {
		(age.num_days() / 30, "month")
	} else if age.num_days() >= 1 {
		(age.num_days(), "day")
	} else if age.num_hours() >= 1 {
		(age.num_hours(), "hour")
	} else if age.num_minutes() >= 1 {
		(age.num_minutes(), "minute")
	} else {
		return "just now".to_string();
	};
	format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" })
}

/// Details for the selected note: metadata, path finder and link suggestions.
#[component]
pub fn NotePanel(
	store: RwSignal<NoteStore>,
	selected: RwSignal<Option<String>>,
	path: RwSignal<Vec<String>>,
) -> impl IntoView {
	let note = move || selected.get().and_then(|id| store.with(|s| s.get(&id).cloned()));
	let notes = Signal::derive(move || store.with(|s| s.all().to_vec()));

	let suggestions = move || {
		let Some(note) = note() else {
			return Vec::new();
		};
		store.with(|s| {
			suggest_connections(&note, s.all())
				.into_iter()
				.map(|sg| (sg.note.id.clone(), sg.note.title.clone(), sg.note.excerpt.clone()))
				.collect::<Vec<_>>()
		})
	};

	let link = move |to: String| {
		let Some(from) = selected.get_untracked() else {
			return;
		};
		store.update(|s| {
			if s.link(&from, &to) {
				info!("linked {from} -> {to}");
			}
		});
	};

	let rename = move |title: String| {
		let Some(id) = selected.get_untracked() else {
			return;
		};
		let title = title.trim().to_string();
		if title.is_empty() {
			return;
		}
		store.update(|s| {
			s.update(
				&id,
				NoteUpdate {
					title: Some(title),
					..Default::default()
				},
			);
		});
	};

	let delete = move |_: MouseEvent| {
		let Some(id) = selected.get_untracked() else {
			return;
		};
		if store.write().delete(&id).is_some() {
			info!("deleted note {id}");
		}
		path.set(Vec::new());
		selected.set(None);
	};

	let linked = move || {
		let Some(id) = selected.get() else {
			return Vec::new();
		};
		store.with(|s| {
			s.connected(&id)
				.into_iter()
				.map(|n| (n.id.clone(), n.title.clone()))
				.collect::<Vec<_>>()
		})
	};

	view! {
		<aside class="note-panel">
			<div class="note-panel-header">
				<h2>"Note details"</h2>
				<button
					class="close"
					on:click=move |_| {
						path.set(Vec::new());
						selected.set(None);
					}
				>
					"×"
				</button>
			</div>
			{move || {
				note()
					.map(|n| {
						let tags = n.tags.clone();
						view! {
							<input
								class="title"
								prop:value=n.title.clone()
								on:change=move |ev| rename(event_target_value(&ev))
							/>
							<p class="excerpt">{n.excerpt.clone()}</p>
							<p class="updated">
								"Updated " {relative_age(n.updated_at, Utc::now())}
							</p>
							<ul class="tags">
								{tags.into_iter().map(|t| view! { <li>{t}</li> }).collect_view()}
							</ul>
						}
					})
			}}
			<div class="linked">
				{move || {
					let items = linked();
					(!items.is_empty())
						.then(|| {
							view! {
								<h4>"Linked notes"</h4>
								<ul>
									{items
										.into_iter()
										.map(|(id, title)| {
											view! {
												<li on:click=move |_| selected.set(Some(id.clone()))>
													{title}
												</li>
											}
										})
										.collect_view()}
								</ul>
							}
						})
				}}
			</div>
			<PathFinder notes=notes start=selected path=path />
			<div class="suggestions">
				{move || {
					let items = suggestions();
					(!items.is_empty())
						.then(|| {
							view! {
								<h4>"Possible connections"</h4>
								{items
									.into_iter()
									.map(|(id, title, excerpt)| {
										view! {
											<div class="suggestion">
												<div>
													<div class="title">{title}</div>
													<div class="excerpt">{excerpt}</div>
												</div>
												<button on:click=move |_| link(id.clone())>"Link"</button>
											</div>
										}
									})
									.collect_view()}
							}
						})
				}}
			</div>
			<button class="delete" on:click=delete>
				"Delete note"
			</button>
		</aside>
	}
}
