use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::notes::Note;

/// One pending BFS expansion: the note to visit and how we got there.
#[derive(Clone, Debug)]
struct PathStep<'a> {
	id: &'a str,
	trail: Vec<&'a str>,
}

impl<'a> PathStep<'a> {
	fn start(id: &'a str) -> Self {
		Self { id, trail: vec![id] }
	}

	fn extend(&self, next: &'a str) -> Self {
		let mut trail = self.trail.clone();
		trail.push(next);
		Self { id: next, trail }
	}
}

/// Shortest hop-count path from `source` to `target` following each note's
/// outbound `connections`.
///
/// Returns `None` without searching when the ids are equal or either is not in
/// `notes`. Returns `Some` with an empty path when `target` is unreachable.
/// Among equally short paths the first discovered wins, which depends on the
/// order of each note's connections.
pub fn find_path<'a>(notes: &'a [Note], source: &str, target: &str) -> Option<Vec<&'a Note>> {
	if source == target {
		return None;
	}
	let by_id: HashMap<&str, &Note> = notes.iter().map(|n| (n.id.as_str(), n)).collect();
	let (&source, _) = by_id.get_key_value(source)?;
	let (&target, _) = by_id.get_key_value(target)?;

	let mut visited: HashSet<&str> = HashSet::from([source]);
	let mut queue = VecDeque::from([PathStep::start(source)]);
	while let Some(step) = queue.pop_front() {
		if step.id == target {
			debug!("path {source} -> {target}: {} hops", step.trail.len() - 1);
			return Some(step.trail.iter().filter_map(|id| by_id.get(id).copied()).collect());
		}
		let Some(note) = by_id.get(step.id) else {
			continue;
		};
		for next in &note.connections {
			let Some((&next, _)) = by_id.get_key_value(next.as_str()) else {
				continue;
			};
			if visited.insert(next) {
				queue.push_back(step.extend(next));
			}
		}
	}

	debug!("no path {source} -> {target}");
	Some(Vec::new())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(path: Option<Vec<&Note>>) -> Option<Vec<&str>> {
		path.map(|p| p.iter().map(|n| n.id.as_str()).collect())
	}

	#[test]
	fn follows_a_chain() {
		let notes = vec![
			Note::new("a", "A").with_connections(["b"]),
			Note::new("b", "B").with_connections(["c"]),
			Note::new("c", "C").with_connections(["d"]),
			Note::new("d", "D"),
		];
		assert_eq!(ids(find_path(&notes, "a", "d")), Some(vec!["a", "b", "c", "d"]));
	}

	#[test]
	fn unreachable_is_empty() {
		let notes = vec![
			Note::new("a", "A").with_connections(["b"]),
			Note::new("b", "B"),
			Note::new("c", "C"),
		];
		assert_eq!(ids(find_path(&notes, "a", "c")), Some(vec![]));
	}

	#[test]
	fn links_are_followed_forward_only() {
		let notes = vec![Note::new("a", "A").with_connections(["b"]), Note::new("b", "B")];
		assert_eq!(ids(find_path(&notes, "b", "a")), Some(vec![]));
	}

	#[test]
	fn same_or_unknown_ids_do_nothing() {
		let notes = vec![Note::new("a", "A").with_connections(["b"]), Note::new("b", "B")];
		assert!(find_path(&notes, "a", "a").is_none());
		assert!(find_path(&notes, "a", "zz").is_none());
		assert!(find_path(&notes, "zz", "a").is_none());
		assert!(find_path(&notes, "", "a").is_none());
	}

	#[test]
	fn cycles_yield_the_short_way_round() {
		let notes = vec![
			Note::new("a", "A").with_connections(["a", "b"]),
			Note::new("b", "B").with_connections(["c"]),
			Note::new("c", "C").with_connections(["a"]),
		];
		assert_eq!(ids(find_path(&notes, "a", "c")), Some(vec!["a", "b", "c"]));
	}

	#[test]
	fn first_found_wins_ties_and_skips_dangling() {
		let notes = vec![
			Note::new("s", "S").with_connections(["ghost", "x", "y"]),
			Note::new("x", "X").with_connections(["t"]),
			Note::new("y", "Y").with_connections(["t"]),
			Note::new("t", "T"),
		];
		assert_eq!(ids(find_path(&notes, "s", "t")), Some(vec!["s", "x", "t"]));
	}
}
