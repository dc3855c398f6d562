use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::ego::{LOCAL_GRAPH_HOPS, ego_network};
use super::layout::{LayoutEngine, LayoutParams};
use super::style::{ColorMode, HONEY, display_radius, node_color};
use super::types::Snapshot;
use crate::notes::{Note, search};

/// Per-frame inputs owned by the host view rather than the simulation.
#[derive(Clone, Debug, Default)]
pub struct FrameView {
	pub color_mode: ColorMode,
	pub selected: Option<String>,
	pub focus: Option<String>,
	pub highlight: Vec<String>,
	pub query: String,
}

impl FrameView {
	pub fn is_highlighted(&self, id: &str) -> bool {
		self.highlight.iter().any(|h| h == id)
	}
}

pub struct ForceGraphState {
	pub engine: LayoutEngine,
	pub snapshot: Snapshot,
	notes: HashMap<Rc<str>, Note>,
	ordered: Vec<Note>,
	/// Ego set for the current focus, cached per focus id.
	local: Option<(String, Option<HashSet<String>>)>,
	matches: Option<(String, HashSet<String>)>,
}

impl ForceGraphState {
	pub fn new(notes: &[Note], width: f64, height: f64, seed: u64, now_ms: f64) -> Self {
		let mut state = Self {
			engine: LayoutEngine::new(LayoutParams::default(), width, height, seed),
			snapshot: Snapshot::default(),
			notes: HashMap::new(),
			ordered: Vec::new(),
			local: None,
			matches: None,
		};
		state.set_notes(notes, now_ms);
		state
	}

	/// Replace the note set. Layout restarts from the center.
	pub fn set_notes(&mut self, notes: &[Note], now_ms: f64) {
		self.engine.rebuild(notes, now_ms);
		self.notes = self
			.engine
			.nodes()
			.iter()
			.filter_map(|n| {
				let note = notes.iter().find(|note| note.id.as_str() == &*n.id)?;
				Some((n.id.clone(), note.clone()))
			})
			.collect();
		self.ordered = notes.to_vec();
		self.snapshot = self.engine.snapshot();
		self.local = None;
		self.matches = None;
	}

	pub fn note(&self, id: &str) -> Option<&Note> {
		self.notes.get(id)
	}

	pub fn tick(&mut self) {
		self.snapshot = self.engine.step();
	}

	/// Bring the local-view and search caches up to date with `view`.
	pub fn refresh(&mut self, view: &FrameView) {
		if let Some(focus) = view.focus.as_deref() {
			if self.local.as_ref().is_none_or(|(id, _)| id != focus) {
				let set = ego_network(&self.ordered, focus, LOCAL_GRAPH_HOPS);
				self.local = Some((focus.to_string(), set));
			}
		}

		let query = view.query.trim().to_lowercase();
		if !query.is_empty() && self.matches.as_ref().is_none_or(|(q, _)| *q != query) {
			let hits = search(&self.ordered, &query)
				.into_iter()
				.map(|n| n.id.clone())
				.collect();
			self.matches = Some((query, hits));
		}
	}

	/// Ids shown under `view`. `None` means every node. Call [`Self::refresh`]
	/// first.
	pub fn visible(&self, view: &FrameView) -> Option<&HashSet<String>> {
		let focus = view.focus.as_deref()?;
		self.local
			.as_ref()
			.filter(|(id, _)| id == focus)
			.and_then(|(_, set)| set.as_ref())
	}

	/// Ids matching the search box. `None` when the box is blank.
	pub fn search_matches(&self, view: &FrameView) -> Option<&HashSet<String>> {
		let query = view.query.trim().to_lowercase();
		if query.is_empty() {
			return None;
		}
		self.matches
			.as_ref()
			.filter(|(q, _)| *q == query)
			.map(|(_, hits)| hits)
	}

	pub fn radius_of(&self, id: &str, mode: ColorMode) -> Option<f64> {
		let node = self.engine.node(id)?;
		let note = self.notes.get(id)?;
		Some(display_radius(node, note, mode))
	}

	/// First visible node whose display radius covers the point.
	pub fn node_at(&mut self, x: f64, y: f64, view: &FrameView) -> Option<String> {
		self.refresh(view);
		let visible = self.visible(view);
		self.engine
			.nodes()
			.iter()
			.filter(|n| visible.as_ref().is_none_or(|v| v.contains(&*n.id)))
			.find(|n| {
				let (dx, dy) = (x - n.position.x, y - n.position.y);
				let radius = self.radius_of(&n.id, view.color_mode).unwrap_or(n.radius);
				(dx * dx + dy * dy).sqrt() <= radius
			})
			.map(|n| n.id.to_string())
	}

	pub fn color_of(&self, id: &str, mode: ColorMode, now: DateTime<Utc>) -> &'static str {
		self.note(id)
			.map(|note| node_color(note, mode, now))
			.unwrap_or(HONEY)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.engine.resize(width, height);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> ForceGraphState {
		let notes = vec![
			Note::new("x", "Focus").with_connections(["y", "z"]),
			Note::new("y", "Y").with_connections(["w"]),
			Note::new("z", "Z"),
			Note::new("w", "W"),
			Note::new("lone", "Lonely note").with_tags(["island"]),
		];
		ForceGraphState::new(&notes, 800.0, 600.0, 1, 0.0)
	}

	#[test]
	fn hit_test_respects_display_radius() {
		let mut s = state();
		let view = FrameView::default();
		let z = s.engine.node("z").unwrap().position;
		// jittered spawns may overlap, any covering node counts
		let hit = s.node_at(z.x, z.y, &view).unwrap();
		assert!(s.engine.node(&hit).is_some());
		assert!(s.node_at(-100.0, -100.0, &view).is_none());
	}

	#[test]
	fn connection_mode_grows_the_hit_area() {
		// dangling links still count toward the size bonus
		let notes = vec![Note::new("hub", "Hub").with_connections(["gone", "lost"])];
		let mut s = ForceGraphState::new(&notes, 800.0, 600.0, 3, 0.0);
		let hub = s.engine.node("hub").unwrap();
		let (base, at) = (hub.radius, hub.position);
		assert_eq!(base, 8.0);

		let boosted = FrameView {
			color_mode: ColorMode::ByConnections,
			..Default::default()
		};
		assert_eq!(s.radius_of("hub", ColorMode::ByConnections), Some(12.0));
		let (x, y) = (at.x + 10.0, at.y);
		assert_eq!(s.node_at(x, y, &FrameView::default()), None);
		assert_eq!(s.node_at(x, y, &boosted).as_deref(), Some("hub"));
	}

	#[test]
	fn hidden_nodes_cannot_be_hit() {
		let mut s = state();
		let lone = s.engine.node("lone").unwrap().position;
		let view = FrameView {
			focus: Some("x".into()),
			..Default::default()
		};
		s.refresh(&view);
		let visible = s.visible(&view).unwrap().clone();
		assert_eq!(visible.len(), 4);
		assert!(!visible.contains("lone"));
		assert_ne!(s.node_at(lone.x, lone.y, &view).as_deref(), Some("lone"));
	}

	#[test]
	fn unknown_focus_shows_everything() {
		let mut s = state();
		let view = FrameView {
			focus: Some("nope".into()),
			..Default::default()
		};
		s.refresh(&view);
		assert!(s.visible(&view).is_none());
	}

	#[test]
	fn search_matches_tags() {
		let mut s = state();
		let view = |query: &str| FrameView {
			query: query.into(),
			..Default::default()
		};
		s.refresh(&view("ISLAND"));
		let hits = s.search_matches(&view("ISLAND")).unwrap();
		assert_eq!(hits.len(), 1);
		assert!(hits.contains("lone"));
		assert!(s.search_matches(&view("  ")).is_none());
		// stale cache is never served for another query
		assert!(s.search_matches(&view("focus")).is_none());
	}

	#[test]
	fn store_edits_flow_into_the_graph() {
		use crate::notes::{NoteStore, NoteUpdate};

		let mut store = NoteStore::with_sample_notes();
		let mut s = ForceGraphState::new(store.all(), 800.0, 600.0, 4, 0.0);
		assert_eq!(s.snapshot.len(), 4);

		let fresh = store.create("", "");
		assert!(store.link(&fresh.id, "1"));
		store.update(
			&fresh.id,
			NoteUpdate {
				title: Some("A rather long working title".into()),
				..Default::default()
			},
		);
		s.set_notes(store.all(), 10.0);
		assert_eq!(s.snapshot.len(), 5);
		assert_eq!(s.engine.node(&fresh.id).unwrap().radius, 13.5);
		assert!(s.engine.link_pairs().any(|(a, b)| a == fresh.id && b == "1"));

		// links into a deleted note vanish with it
		store.delete("1");
		s.set_notes(store.all(), 20.0);
		assert_eq!(s.snapshot.len(), 4);
		assert!(s.engine.link_pairs().all(|(a, b)| a != "1" && b != "1"));
		assert!(s.note("1").is_none());
	}

	#[test]
	fn rebuild_resets_snapshot() {
		let mut s = state();
		s.tick();
		assert_eq!(s.snapshot.len(), 5);
		s.set_notes(&[Note::new("only", "Only")], 10.0);
		assert_eq!(s.snapshot.len(), 1);
		assert!(s.note("x").is_none());
	}
}
