mod component;
mod search;

pub use component::PathFinder;
pub use search::find_path;
