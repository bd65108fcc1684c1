use super::config::check_probability;
use super::error::Result;
use super::grid::{Grid, Tile};
use super::position::Position;
use log::trace;
use rand::Rng;

pub const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.05;
pub const DEFAULT_ADJACENT_BOOST_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleGenerator {
    obstacle_probability: f64,
    adjacent_boost_probability: f64,
}

impl Default for ObstacleGenerator {
    fn default() -> Self {
        ObstacleGenerator {
            obstacle_probability: DEFAULT_OBSTACLE_PROBABILITY,
            adjacent_boost_probability: DEFAULT_ADJACENT_BOOST_PROBABILITY,
        }
    }
}

impl ObstacleGenerator {
    pub fn new(obstacle_probability: f64, adjacent_boost_probability: f64) -> Result<Self> {
        check_probability("obstacle_probability", obstacle_probability)?;
        check_probability("adjacent_boost_probability", adjacent_boost_probability)?;
        Ok(ObstacleGenerator {
            obstacle_probability,
            adjacent_boost_probability,
        })
    }

    pub fn generate<R: Rng + ?Sized>(&self, width: usize, height: usize, rng: &mut R) -> Grid {
        let mut grid = Grid::blank(width, height);
        scatter(&mut grid, self.obstacle_probability, rng);
        reinforce(&mut grid, self.adjacent_boost_probability, rng);
        trace!(
            "generated {}x{} grid with {} obstacles",
            width,
            height,
            grid.obstacle_count()
        );
        grid
    }
}

// first pass: independent random dots. Cells go x outer, y inner, which
// fixes the draw order for a seeded rng.
fn scatter<R: Rng + ?Sized>(grid: &mut Grid, probability: f64, rng: &mut R) {
    let cells: Vec<Position> = grid.positions().collect();
    for position in cells {
        if rng.gen_bool(probability) && grid[position] == Tile::Blank {
            grid[position] = Tile::Obstacle;
        }
    }
}

// second pass: thicken the dots. Adjacency is judged against the grid as the
// first pass left it, so clusters grow by at most one cell per seed.
fn reinforce<R: Rng + ?Sized>(grid: &mut Grid, probability: f64, rng: &mut R) {
    let seeded = grid.clone();
    for position in seeded.positions() {
        if seeded[position] == Tile::Blank
            && adjacent_to_obstacle(&seeded, position)
            && rng.gen_bool(probability)
        {
            grid[position] = Tile::Obstacle;
        }
    }
}

fn adjacent_to_obstacle(grid: &Grid, position: Position) -> bool {
    grid.neighbors(position)
        .into_iter()
        .any(|neighbor| grid[neighbor].is_obstacle())
}

/// Uniformly random cell of a `width` x `height` grid.
///
/// # Panics
///
/// Panics if `width` or `height` is zero.
pub fn random_position<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Position {
    Position::new(rng.gen_range(0..width), rng.gen_range(0..height))
}
