pub mod modules;

pub use modules::config::SearchConfig;
pub use modules::error::{ConfigError, Endpoint, Result};
pub use modules::frontier::{ClosedSet, OpenSet};
pub use modules::generator::{random_position, ObstacleGenerator};
pub use modules::grid::{Grid, Tile};
pub use modules::node::{Node, NodeArena, NodeId};
pub use modules::path_builder::{ParentChain, PathBuilder};
pub use modules::path_finder::{manhattan_distance, SearchSession, SearchStatus};
pub use modules::position::Position;
