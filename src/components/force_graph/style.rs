use chrono::{DateTime, Utc};

use super::layout::title_radius;
use super::types::GraphNode;
use crate::notes::Note;

/// Palette shared with the rest of the app.
pub const PEACH: &str = "#f3ab9a";
pub const LAVENDER: &str = "#b9b2d8";
pub const HONEY: &str = "#faddaf";
pub const SAGE: &str = "#a4bfa0";

const TAG_COLORS: &[&str] = &[PEACH, LAVENDER, HONEY, SAGE];

/// How nodes are colored (and, for connections, sized).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
	/// Everything honey.
	#[default]
	Default,
	/// Hash of the first tag.
	ByTag,
	/// Time since the last update.
	ByAge,
	/// Outbound link count; also grows the node.
	ByConnections,
}

impl ColorMode {
	/// Button order in the toolbar.
	pub const ALL: [ColorMode; 4] = [
		ColorMode::ByTag,
		ColorMode::ByAge,
		ColorMode::ByConnections,
		ColorMode::Default,
	];

	/// Toolbar caption.
	pub fn label(self) -> &'static str {
		match self {
			ColorMode::Default => "Default",
			ColorMode::ByTag => "By tag",
			ColorMode::ByAge => "By age",
			ColorMode::ByConnections => "By connections",
		}
	}
}

/// Java-style 32-bit string hash over UTF-16 code units.
pub fn tag_hash(tag: &str) -> i32 {
	tag.encode_utf16().fold(0i32, |h, c| {
		h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32)
	})
}

/// Fill color of a note's node under `mode`.
pub fn node_color(note: &Note, mode: ColorMode, now: DateTime<Utc>) -> &'static str {
	match mode {
		ColorMode::Default => HONEY,
		ColorMode::ByTag => match note.tags.first() {
			Some(tag) => TAG_COLORS[tag_hash(tag).unsigned_abs() as usize % TAG_COLORS.len()],
			None => HONEY,
		},
		ColorMode::ByAge => {
			let days = (now - note.updated_at).num_milliseconds() as f64 / 86_400_000.0;
			if days < 7.0 {
				SAGE
			} else if days < 30.0 {
				HONEY
			} else if days < 90.0 {
				PEACH
			} else {
				LAVENDER
			}
		}
		ColorMode::ByConnections => match note.connections.len() {
			n if n > 5 => SAGE,
			n if n > 2 => HONEY,
			n if n > 0 => PEACH,
			_ => LAVENDER,
		},
	}
}

/// Radius used for drawing and hit testing.
pub fn display_radius(node: &GraphNode, note: &Note, mode: ColorMode) -> f64 {
	match mode {
		ColorMode::ByConnections => {
			title_radius(&note.title) + (note.connections.len() as f64 * 2.0).min(8.0)
		}
		ColorMode::Default | ColorMode::ByTag | ColorMode::ByAge => node.radius,
	}
}
