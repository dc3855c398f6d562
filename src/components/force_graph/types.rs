use std::ops::{Add, AddAssign, Mul, Sub};
use std::rc::Rc;

/// 2-D vector in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	/// Horizontal, growing rightwards.
	pub x: f64,
	/// Vertical, growing downwards.
	pub y: f64,
}

impl Vec2 {
	/// Origin.
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	/// Vector from components.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean norm.
	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	/// Neither component is NaN or infinite.
	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Vec2 {
	type Output = Vec2;
	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Vec2 {
	type Output = Vec2;
	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;
	fn mul(self, k: f64) -> Vec2 {
		Vec2::new(self.x * k, self.y * k)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

/// One simulated note. Lives in the engine's arena; its slot index is stable
/// until the next rebuild.
#[derive(Clone, Debug)]
pub struct GraphNode {
	/// Note id.
	pub id: Rc<str>,
	/// Center in canvas pixels.
	pub position: Vec2,
	/// Displacement per step.
	pub velocity: Vec2,
	/// Base radius from the title.
	pub radius: f64,
}

/// A directed note link whose endpoints both exist.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Declaring note.
	pub source: Rc<str>,
	/// Linked note.
	pub target: Rc<str>,
	/// Spring multiplier.
	pub strength: f64,
}

/// Render data for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
	/// Note id.
	pub id: Rc<str>,
	/// Center x in canvas pixels.
	pub x: f64,
	/// Center y in canvas pixels.
	pub y: f64,
	/// Base radius before any color-mode bonus.
	pub radius: f64,
}

/// Immutable per-frame view of every node, in arena order.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
	/// Shared so renderers can hold a frame cheaply.
	pub nodes: Rc<[NodeSnapshot]>,
}

impl Snapshot {
	/// Node by id.
	pub fn get(&self, id: &str) -> Option<&NodeSnapshot> {
		self.nodes.iter().find(|n| &*n.id == id)
	}

	/// Node count.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True for a frame with no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
