//! Link suggestions from shared vocabulary and tags.

use super::Note;

const WORD_WEIGHT: f64 = 0.7;
const TAG_WEIGHT: f64 = 1.5;
const MIN_SIMILARITY: f64 = 1.0;
const MAX_SUGGESTIONS: usize = 3;

/// A note worth linking to, with its score.
#[derive(Clone, Debug)]
pub struct Suggestion<'a> {
	/// Candidate note.
	pub note: &'a Note,
	/// Weighted overlap score.
	pub similarity: f64,
}

/// Up to three unlinked notes that share words or tags with `note`, best first.
pub fn suggest_connections<'a>(note: &Note, all: &'a [Note]) -> Vec<Suggestion<'a>> {
	let content = note.content.to_lowercase();
	let words: Vec<&str> = content.split_whitespace().collect();

	let mut out: Vec<_> = all
		.iter()
		.filter(|n| n.id != note.id && !note.connections.contains(&n.id))
		.map(|candidate| {
			let other = candidate.content.to_lowercase();
			let other_words: Vec<&str> = other.split_whitespace().collect();
			// counted per occurrence in the source note
			let common_words = words
				.iter()
				.filter(|w| w.chars().count() > 3 && other_words.contains(w))
				.count();
			let common_tags = note
				.tags
				.iter()
				.filter(|t| candidate.tags.contains(t))
				.count();
			Suggestion {
				note: candidate,
				similarity: common_words as f64 * WORD_WEIGHT + common_tags as f64 * TAG_WEIGHT,
			}
		})
		.filter(|s| s.similarity > MIN_SIMILARITY)
		.collect();

	out.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
	out.truncate(MAX_SUGGESTIONS);
	out
}
