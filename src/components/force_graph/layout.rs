//! Damped spring/repulsion layout over the note graph.
//!
//! Every step accumulates forces from the previous positions for all nodes,
//! then integrates. Nodes push each other apart with an inverse-square force,
//! each link pulls its source toward its target around an ideal length, and a
//! weak spring keeps the whole graph near the canvas center.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{GraphLink, GraphNode, NodeSnapshot, Snapshot, Vec2};
use crate::notes::Note;

/// Smallest base node radius.
pub const MIN_NODE_RADIUS: f64 = 8.0;
/// Largest base node radius.
pub const MAX_NODE_RADIUS: f64 = 16.0;
/// Length of the cosmetic settling phase after a rebuild.
pub const SETTLE_MS: f64 = 2000.0;

/// Force model constants.
#[derive(Clone, Debug)]
pub struct LayoutParams {
	/// Inverse-square push between every pair of nodes.
	pub repulsion: f64,
	/// Spring constant along links.
	pub attraction: f64,
	/// Strength given to every new link.
	pub link_strength: f64,
	/// Rest length of a link.
	pub ideal_distance: f64,
	/// Spring constant toward the canvas center.
	pub center_pull: f64,
	/// Force to velocity scale per step.
	pub time_step: f64,
	/// Velocity kept after each step.
	pub damping: f64,
	/// Fraction of speed kept (and reversed) when a node hits an edge.
	pub restitution: f64,
	/// Gap kept between a node's rim and the canvas edge.
	pub margin: f64,
	/// Velocity magnitude cap applied after damping. The damped integrator
	/// alone never reaches it on ordinary graphs; it only bounds the kick two
	/// nearly coincident nodes give each other. `f64::INFINITY` turns it off.
	pub max_speed: f64,
	/// Max offset from the center on spawn, per axis.
	pub spawn_jitter: f64,
	/// Max initial speed on spawn, per axis.
	pub spawn_speed: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			repulsion: 1000.0,
			attraction: 0.1,
			link_strength: 0.5,
			ideal_distance: 100.0,
			center_pull: 0.001,
			time_step: 0.01,
			damping: 0.95,
			restitution: 0.5,
			margin: 10.0,
			max_speed: 40.0,
			spawn_jitter: 10.0,
			spawn_speed: 1.0,
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
}

/// Owns node positions and velocities for one note set.
pub struct LayoutEngine {
	params: LayoutParams,
	width: f64,
	height: f64,
	nodes: Vec<GraphNode>,
	index: HashMap<Rc<str>, usize>,
	links: Vec<GraphLink>,
	springs: Vec<Spring>,
	rng: SmallRng,
	settle_until: f64,
	last_displacement: f64,
}

/// Base node radius from the title length.
pub fn title_radius(title: &str) -> f64 {
	(title.chars().count() as f64 / 2.0).clamp(MIN_NODE_RADIUS, MAX_NODE_RADIUS)
}

impl LayoutEngine {
	/// Empty engine for a `width` x `height` canvas. `seed` drives spawn jitter.
	pub fn new(params: LayoutParams, width: f64, height: f64, seed: u64) -> Self {
		Self {
			params,
			width,
			height,
			nodes: Vec::new(),
			index: HashMap::new(),
			links: Vec::new(),
			springs: Vec::new(),
			rng: SmallRng::seed_from_u64(seed),
			settle_until: f64::NEG_INFINITY,
			last_displacement: 0.0,
		}
	}

	/// Throw away every node and link and respawn from `notes` near the center.
	pub fn rebuild(&mut self, notes: &[Note], now_ms: f64) {
		self.nodes.clear();
		self.index.clear();
		self.links.clear();
		self.springs.clear();
		self.last_displacement = 0.0;

		let center = self.center();
		let (jitter, speed) = (self.params.spawn_jitter, self.params.spawn_speed);
		let mut accepted = Vec::with_capacity(notes.len());
		for note in notes {
			if self.index.contains_key(note.id.as_str()) {
				debug!("duplicate note id {} ignored", note.id);
				continue;
			}
			let id: Rc<str> = note.id.as_str().into();
			let mut node = GraphNode {
				id: id.clone(),
				position: center
					+ Vec2::new(
						self.rng.gen_range(-jitter..=jitter),
						self.rng.gen_range(-jitter..=jitter),
					),
				velocity: Vec2::new(
					self.rng.gen_range(-speed..=speed),
					self.rng.gen_range(-speed..=speed),
				),
				radius: title_radius(&note.title),
			};
			self.contain(&mut node);
			self.index.insert(id, self.nodes.len());
			self.nodes.push(node);
			accepted.push(note);
		}

		let mut dropped = 0usize;
		for (source, note) in accepted.into_iter().enumerate() {
			for target_id in &note.connections {
				let Some(&target) = self.index.get(target_id.as_str()) else {
					dropped += 1;
					continue;
				};
				self.springs.push(Spring {
					source,
					target,
					strength: self.params.link_strength,
				});
				self.links.push(GraphLink {
					source: self.nodes[source].id.clone(),
					target: self.nodes[target].id.clone(),
					strength: self.params.link_strength,
				});
			}
		}
		if dropped > 0 {
			debug!("dropped {dropped} links to missing notes");
		}

		self.settle_until = now_ms + SETTLE_MS;
		info!(
			"graph rebuilt: {} nodes, {} links",
			self.nodes.len(),
			self.links.len()
		);
	}

	/// Advance one frame and return the new positions.
	pub fn step(&mut self) -> Snapshot {
		if self.nodes.is_empty() {
			return Snapshot::default();
		}

		let forces = self.forces();
		let (dt, damping, max_speed) = (
			self.params.time_step,
			self.params.damping,
			self.params.max_speed,
		);

		let mut nodes = std::mem::take(&mut self.nodes);
		let mut moved = 0.0f64;
		for (node, force) in nodes.iter_mut().zip(forces) {
			let before = node.position;
			let mut velocity = (node.velocity + force * dt) * damping;
			let speed = velocity.length();
			if speed > max_speed {
				velocity = velocity * (max_speed / speed);
			}
			node.velocity = velocity;
			node.position += velocity;
			self.contain(node);
			moved = moved.max((node.position - before).length());
		}
		self.nodes = nodes;
		self.last_displacement = moved;

		self.snapshot()
	}

	fn forces(&self) -> Vec<Vec2> {
		let p = &self.params;
		let mut forces = vec![Vec2::ZERO; self.nodes.len()];

		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let delta = self.nodes[i].position - self.nodes[j].position;
				let distance = delta.length();
				if distance <= f64::EPSILON {
					continue;
				}
				let push = delta * (p.repulsion / (distance * distance * distance));
				forces[i] += push;
				forces[j] += push * -1.0;
			}
		}

		for spring in &self.springs {
			let delta = self.nodes[spring.target].position - self.nodes[spring.source].position;
			let distance = delta.length();
			if distance <= f64::EPSILON {
				continue;
			}
			let pull = (distance - p.ideal_distance) * p.attraction * spring.strength;
			forces[spring.source] += delta * (pull / distance);
		}

		let center = self.center();
		for (force, node) in forces.iter_mut().zip(&self.nodes) {
			*force += (center - node.position) * p.center_pull;
		}

		forces
	}

	fn contain(&self, node: &mut GraphNode) {
		let inset = node.radius + self.params.margin;
		let r = self.params.restitution;
		reflect(&mut node.position.x, &mut node.velocity.x, inset, self.width, r);
		reflect(&mut node.position.y, &mut node.velocity.y, inset, self.height, r);
	}

	/// Current positions without stepping.
	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			nodes: self
				.nodes
				.iter()
				.map(|n| NodeSnapshot {
					id: n.id.clone(),
					x: n.position.x,
					y: n.position.y,
					radius: n.radius,
				})
				.collect(),
		}
	}

	/// New canvas bounds, applied from the next step.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// True during the first seconds after a rebuild.
	pub fn is_settling(&self, now_ms: f64) -> bool {
		now_ms < self.settle_until
	}

	/// Nodes in arena order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Node by note id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	/// Arena slot of a note id. Also indexes the latest [`Snapshot`].
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Retained links in declaration order.
	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	/// `(source, target)` id pairs of every retained link.
	pub fn link_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
		self.links.iter().map(|l| (&*l.source, &*l.target))
	}

	/// Largest distance any node moved during the last step.
	pub fn last_displacement(&self) -> f64 {
		self.last_displacement
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True when there is nothing to simulate.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Canvas bounds.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn center(&self) -> Vec2 {
		Vec2::new(self.width / 2.0, self.height / 2.0)
	}
}

fn reflect(pos: &mut f64, vel: &mut f64, inset: f64, extent: f64, restitution: f64) {
	if extent <= 2.0 * inset {
		*pos = extent / 2.0;
		*vel = 0.0;
	} else if *pos < inset {
		*pos = inset;
		*vel *= -restitution;
	} else if *pos > extent - inset {
		*pos = extent - inset;
		*vel *= -restitution;
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	#[cfg(not(target_arch = "wasm32"))]
	use proptest::prelude::*;

	use super::*;

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	fn engine(notes: &[Note], seed: u64) -> LayoutEngine {
		let mut e = LayoutEngine::new(LayoutParams::default(), W, H, seed);
		e.rebuild(notes, 0.0);
		e
	}

	fn triangle() -> Vec<Note> {
		vec![
			Note::new("a", "Alpha").with_connections(["b", "c"]),
			Note::new("b", "Beta").with_connections(["a", "c"]),
			Note::new("c", "Gamma").with_connections(["a", "b"]),
		]
	}

	fn assert_inside(e: &LayoutEngine) {
		let margin = e.params.margin;
		for n in e.nodes() {
			let inset = n.radius + margin;
			assert!(n.position.is_finite() && n.velocity.is_finite());
			assert!(n.position.x >= inset && n.position.x <= e.width - inset);
			assert!(n.position.y >= inset && n.position.y <= e.height - inset);
		}
	}

	#[test]
	fn spawns_near_center() {
		let e = engine(&triangle(), 1);
		for n in e.nodes() {
			assert!((n.position.x - W / 2.0).abs() <= 10.0);
			assert!((n.position.y - H / 2.0).abs() <= 10.0);
			assert!(n.velocity.x.abs() <= 1.0 && n.velocity.y.abs() <= 1.0);
		}
	}

	#[test]
	fn radius_follows_title_length() {
		assert_eq!(title_radius("abc"), MIN_NODE_RADIUS);
		assert_eq!(title_radius(&"x".repeat(24)), 12.0);
		assert_eq!(title_radius(&"x".repeat(80)), MAX_NODE_RADIUS);
	}

	#[test]
	fn settles_into_quasi_equilibrium() {
		let mut e = engine(&triangle(), 42);
		for _ in 0..1500 {
			e.step();
			assert_inside(&e);
		}
		assert!(
			e.last_displacement() < 0.25,
			"still moving {}",
			e.last_displacement()
		);

		let snap = e.snapshot();
		let a = snap.get("a").unwrap();
		let b = snap.get("b").unwrap();
		let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
		assert!(d > 50.0 && d < 200.0, "link length {d}");
	}

	#[test]
	fn dangling_links_are_dropped() {
		let notes = vec![
			Note::new("a", "A").with_connections(["b", "ghost"]),
			Note::new("b", "B").with_connections(["ghost", "a"]),
		];
		let e = engine(&notes, 3);

		assert_eq!(e.links().len(), 2);
		assert!(e.link_pairs().all(|(s, t)| s != "ghost" && t != "ghost"));
		assert!(e.links().iter().all(|l| l.strength == 0.5));
	}

	#[test]
	fn rebuild_is_deterministic_for_links_only() {
		let notes = triangle();
		let mut e = LayoutEngine::new(LayoutParams::default(), W, H, 9);
		e.rebuild(&notes, 0.0);
		let first: HashSet<(String, String)> = e
			.link_pairs()
			.map(|(s, t)| (s.to_string(), t.to_string()))
			.collect();
		let first_pos: Vec<_> = e.nodes().iter().map(|n| n.position).collect();

		e.rebuild(&notes, 0.0);
		let second: HashSet<(String, String)> = e
			.link_pairs()
			.map(|(s, t)| (s.to_string(), t.to_string()))
			.collect();
		let second_pos: Vec<_> = e.nodes().iter().map(|n| n.position).collect();

		assert_eq!(first, second);
		assert_eq!(e.links().len(), 6);
		assert_ne!(first_pos, second_pos);
	}

	#[test]
	fn duplicate_ids_keep_one_node() {
		let notes = vec![
			Note::new("a", "First"),
			Note::new("a", "A much longer second title").with_connections(["b"]),
			Note::new("b", "B"),
		];
		let e = engine(&notes, 5);
		assert_eq!(e.len(), 2);
		assert_eq!(e.node("a").unwrap().radius, title_radius("First"));
		assert!(e.links().is_empty());
	}

	#[test]
	fn empty_set_does_nothing() {
		let mut e = engine(&[], 1);
		assert!(e.is_empty());
		assert!(e.step().is_empty());
		assert_eq!(e.last_displacement(), 0.0);
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let notes = vec![Note::new("a", "A"), Note::new("b", "B")];
		let mut e = engine(&notes, 11);
		let shared = e.nodes[0].position;
		for n in &mut e.nodes {
			n.position = shared;
			n.velocity = Vec2::ZERO;
		}
		for _ in 0..10 {
			e.step();
		}
		assert!(e.nodes().iter().all(|n| n.position.is_finite()));
	}

	#[test]
	fn self_links_are_harmless() {
		let notes = vec![Note::new("a", "A").with_connections(["a"])];
		let mut e = engine(&notes, 2);
		for _ in 0..50 {
			e.step();
		}
		assert_eq!(e.links().len(), 1);
		assert_inside(&e);
	}

	#[test]
	fn edge_hit_reverses_and_halves_velocity() {
		let notes = vec![Note::new("a", "A")];
		let mut e = engine(&notes, 4);
		e.params.damping = 1.0;
		e.params.center_pull = 0.0;
		e.nodes[0].position = Vec2::new(20.0, 300.0);
		e.nodes[0].velocity = Vec2::new(-10.0, 0.0);

		e.step();
		let n = &e.nodes()[0];
		assert_eq!(n.position.x, n.radius + 10.0);
		assert_eq!(n.velocity.x, 5.0);
	}

	#[test]
	fn uncapped_step_is_plain_damped_euler() {
		let notes = vec![Note::new("a", "A")];
		let mut e = engine(&notes, 6);
		e.params.max_speed = f64::INFINITY;
		e.nodes[0].position = Vec2::new(300.0, 200.0);
		e.nodes[0].velocity = Vec2::new(2.0, -1.0);

		e.step();
		// only the center pull acts on a lone node
		let force = (Vec2::new(W / 2.0, H / 2.0) - Vec2::new(300.0, 200.0)) * 0.001;
		let expected = (Vec2::new(2.0, -1.0) + force * 0.01) * 0.95;
		let n = &e.nodes()[0];
		assert!((n.velocity - expected).length() < 1e-12);
		assert!((n.position - (Vec2::new(300.0, 200.0) + expected)).length() < 1e-12);
	}

	#[test]
	fn speed_cap_bounds_runaway_velocity() {
		let notes = vec![Note::new("a", "A")];
		let mut e = engine(&notes, 6);
		e.nodes[0].position = Vec2::new(W / 2.0, H / 2.0);
		e.nodes[0].velocity = Vec2::new(300.0, 400.0);

		e.step();
		let v = e.nodes()[0].velocity;
		assert!((v.length() - e.params.max_speed).abs() < 1e-9);
		assert!((v.x / v.y - 0.75).abs() < 1e-9);
	}

	#[test]
	fn resize_moves_the_walls() {
		let mut e = engine(&triangle(), 8);
		e.resize(200.0, 100.0);
		assert_eq!(e.size(), (200.0, 100.0));
		e.step();
		assert_inside(&e);
		assert_eq!(e.index_of("b"), Some(1));
		assert_eq!(e.index_of("ghost"), None);
	}

	#[test]
	fn settling_window_lasts_two_seconds() {
		let mut e = LayoutEngine::new(LayoutParams::default(), W, H, 1);
		assert!(!e.is_settling(0.0));
		e.rebuild(&triangle(), 1000.0);
		assert!(e.is_settling(2999.0));
		assert!(!e.is_settling(3000.0));
	}

	#[cfg(not(target_arch = "wasm32"))]
	proptest! {
		#[test]
		fn nodes_never_leave_the_canvas(
			seed in any::<u64>(),
			count in 1usize..16,
			width in 60.0f64..1200.0,
			height in 60.0f64..900.0,
		) {
			let notes: Vec<Note> = (0..count)
				.map(|i| {
					Note::new(i.to_string(), "x".repeat(i * 3))
						.with_connections([((i + 1) % count).to_string()])
				})
				.collect();
			let mut e = LayoutEngine::new(LayoutParams::default(), width, height, seed);
			e.rebuild(&notes, 0.0);
			for _ in 0..200 {
				e.step();
				for n in e.nodes() {
					let inset = n.radius + 10.0;
					prop_assert!(n.position.is_finite());
					prop_assert!(n.position.x >= inset && n.position.x <= width - inset);
					prop_assert!(n.position.y >= inset && n.position.y <= height - inset);
				}
			}
		}
	}
}
