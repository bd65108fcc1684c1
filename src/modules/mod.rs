pub mod config;
pub mod error;
pub mod frontier;
pub mod generator;
pub mod grid;
pub mod node;
pub mod path_builder;
pub mod path_finder;
pub mod position;
