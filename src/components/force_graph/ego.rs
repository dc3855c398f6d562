use std::collections::{HashMap, HashSet, VecDeque};

use crate::notes::Note;

/// Hop radius of the local graph view.
pub const LOCAL_GRAPH_HOPS: usize = 2;

/// Ids within `hops` outbound links of `focus`, including `focus` itself.
///
/// Returns `None` when `focus` is not in the note set, in which case callers
/// show the whole graph. Links to missing notes never add ids.
pub fn ego_network(notes: &[Note], focus: &str, hops: usize) -> Option<HashSet<String>> {
	let by_id: HashMap<&str, &Note> = notes.iter().map(|n| (n.id.as_str(), n)).collect();
	by_id.get(focus)?;

	let mut seen: HashSet<String> = HashSet::from([focus.to_string()]);
	let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(focus, 0)]);
	while let Some((cur, depth)) = queue.pop_front() {
		if depth >= hops {
			continue;
		}
		let Some(note) = by_id.get(cur) else {
			continue;
		};
		for next in &note.connections {
			if by_id.contains_key(next.as_str()) && seen.insert(next.clone()) {
				queue.push_back((next.as_str(), depth + 1));
			}
		}
	}
	Some(seen)
}
