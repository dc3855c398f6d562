pub mod force_graph;
pub mod note_panel;
pub mod path_finder;
