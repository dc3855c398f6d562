//! In-memory note collection shared by every view.

pub mod suggest;

use chrono::{DateTime, Duration, Utc};

const EXCERPT_CHARS: usize = 100;

/// A single note in the garden.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
	/// Unique identifier.
	pub id: String,
	/// Display title, also drives the base node size in the graph.
	pub title: String,
	/// Plain text body.
	pub content: String,
	/// Short preview derived from the content.
	pub excerpt: String,
	/// Creation time.
	pub created_at: DateTime<Utc>,
	/// Last modification time.
	pub updated_at: DateTime<Utc>,
	/// Free-form tags.
	pub tags: Vec<String>,
	/// Ordered ids of notes this note links to.
	pub connections: Vec<String>,
}

impl Note {
	/// Create an empty note stamped with the current time.
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: id.into(),
			title: title.into(),
			content: String::new(),
			excerpt: String::new(),
			created_at: now,
			updated_at: now,
			tags: Vec::new(),
			connections: Vec::new(),
		}
	}

	/// Replace the body and recompute the excerpt.
	pub fn with_content(mut self, content: impl Into<String>) -> Self {
		self.content = content.into();
		self.excerpt = excerpt_of(&self.content);
		self
	}

	/// Replace the outbound links.
	pub fn with_connections<I, S>(mut self, connections: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.connections = connections.into_iter().map(Into::into).collect();
		self
	}

	/// Replace the tags.
	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags = tags.into_iter().map(Into::into).collect();
		self
	}

	/// Override both timestamps.
	pub fn with_dates(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
		self.created_at = created_at;
		self.updated_at = updated_at;
		self
	}

	fn matches(&self, query: &str) -> bool {
		self.title.to_lowercase().contains(query)
			|| self.content.to_lowercase().contains(query)
			|| self.tags.iter().any(|t| t.to_lowercase().contains(query))
	}
}

/// Partial update applied by [`NoteStore::update`].
#[derive(Clone, Debug, Default)]
pub struct NoteUpdate {
	/// New title, if any.
	pub title: Option<String>,
	/// New body, if any. The excerpt follows it.
	pub content: Option<String>,
	/// New tag list, if any.
	pub tags: Option<Vec<String>>,
}

/// Owned, ordered list of notes. Newest notes are kept first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteStore {
	notes: Vec<Note>,
	minted: u64,
}

impl NoteStore {
	/// Build a store around an existing collection.
	pub fn new(notes: Vec<Note>) -> Self {
		Self { notes, minted: 0 }
	}

	/// Store seeded with the demo garden.
	pub fn with_sample_notes() -> Self {
		Self::new(sample_notes(Utc::now()))
	}

	/// Every note, in store order.
	pub fn all(&self) -> &[Note] {
		&self.notes
	}

	/// Notes whose title, content or tags contain `query`, ignoring case.
	/// A blank query returns everything.
	pub fn search(&self, query: &str) -> Vec<&Note> {
		search(&self.notes, query)
	}

	/// Add a note at the front and return a copy of it.
	pub fn create(&mut self, title: &str, content: &str) -> Note {
		let title = if title.trim().is_empty() { "Untitled Note" } else { title };
		self.minted += 1;
		let id = format!("{}-{}", Utc::now().timestamp_millis(), self.minted);
		let note = Note::new(id, title).with_content(content);
		self.notes.insert(0, note.clone());
		note
	}

	/// Apply `update` to the note with `id`. Returns false when it does not exist.
	pub fn update(&mut self, id: &str, update: NoteUpdate) -> bool {
		let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
			return false;
		};
		if let Some(title) = update.title {
			note.title = title;
		}
		if let Some(content) = update.content {
			note.excerpt = excerpt_of(&content);
			note.content = content;
		}
		if let Some(tags) = update.tags {
			note.tags = tags;
		}
		note.updated_at = Utc::now();
		true
	}

	/// Remove the note with `id`. Links pointing at it are left dangling.
	pub fn delete(&mut self, id: &str) -> Option<Note> {
		let pos = self.notes.iter().position(|n| n.id == id)?;
		Some(self.notes.remove(pos))
	}

	/// Look up a note.
	pub fn get(&self, id: &str) -> Option<&Note> {
		self.notes.iter().find(|n| n.id == id)
	}

	/// Notes that `id` links to, in store order.
	pub fn connected(&self, id: &str) -> Vec<&Note> {
		let Some(note) = self.get(id) else {
			return Vec::new();
		};
		self.notes
			.iter()
			.filter(|n| note.connections.contains(&n.id))
			.collect()
	}

	/// Add a `from -> to` link. No-op for unknown ids, self links and
	/// links that already exist.
	pub fn link(&mut self, from: &str, to: &str) -> bool {
		if from == to || self.get(to).is_none() {
			return false;
		}
		let Some(note) = self.notes.iter_mut().find(|n| n.id == from) else {
			return false;
		};
		if note.connections.iter().any(|c| c == to) {
			return false;
		}
		note.connections.push(to.to_string());
		note.updated_at = Utc::now();
		true
	}
}

/// Notes whose title, content or tags contain `query`, ignoring case.
pub fn search<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
	let query = query.trim().to_lowercase();
	if query.is_empty() {
		return notes.iter().collect();
	}
	notes.iter().filter(|n| n.matches(&query)).collect()
}

fn excerpt_of(content: &str) -> String {
	let mut excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
	if content.chars().count() > EXCERPT_CHARS {
		excerpt.push_str("...");
	}
	excerpt
}

/// The four-note demo garden, dated relative to `now`.
pub fn sample_notes(now: DateTime<Utc>) -> Vec<Note> {
	let days = |d: i64| now - Duration::days(d);
	vec![
		Note::new("1", "Morning Reflections")
			.with_content(
				"Today I discovered the beauty in small moments. The way sunlight filters \
				 through leaves, creating dancing shadows on the ground. These micro-moments \
				 of wonder remind me to stay present and appreciate the simple joys that \
				 surround us daily.",
			)
			.with_dates(days(2), days(2))
			.with_tags(["reflection", "mindfulness"])
			.with_connections(["2", "4"]),
		Note::new("2", "Project Ideas")
			.with_content(
				"A collection of creative projects that spark joy:\n\n1. Digital garden for \
				 knowledge management\n2. Meditation app with nature sounds\n3. Community art \
				 installation\n4. Sustainable living blog\n\nEach project should focus on \
				 bringing people together and creating positive impact.",
			)
			.with_dates(days(5), days(1))
			.with_tags(["projects", "creativity", "ideas"])
			.with_connections(["1", "3"]),
		Note::new("3", "Reading Notes: The Art of Living")
			.with_content(
				"Key insights from Epictetus:\n\n- Focus on what you can control\n- Accept what \
				 you cannot change\n- Practice gratitude daily\n- Virtue is the only true \
				 good\n\n'You have power over your mind - not outside events. Realize this, and \
				 you will find strength.'",
			)
			.with_dates(days(7), days(3))
			.with_tags(["philosophy", "stoicism", "reading"])
			.with_connections(["1"]),
		Note::new("4", "Garden Planning")
			.with_content(
				"Planning the layout for this spring's vegetable garden:\n\nNorth section: \
				 tomatoes, peppers, basil and oregano.\nSouth section: lettuce and spinach, \
				 radishes and carrots, thyme, rosemary, sage.\n\nCompanion planting: tomatoes \
				 with basil, carrots with chives.",
			)
			.with_dates(days(10), days(4))
			.with_tags(["gardening", "planning", "nature"])
			.with_connections(["1"]),
	]
}
