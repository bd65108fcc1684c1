use super::position::Position;
use std::ops::{Index, IndexMut};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Tile {
    Blank,
    Obstacle,
}

impl Tile {
    pub fn is_obstacle(&self) -> bool {
        matches!(self, Tile::Obstacle)
    }
}

type Plane = Vec<Tile>;

/// Fixed-size rectangular map of tiles, stored row by row. Indexing by a
/// position outside the grid is a logic error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    plane: Plane,
}

impl Index<Position> for Grid {
    type Output = Tile;

    fn index(&self, position: Position) -> &Self::Output {
        debug_assert!(self.contains(position), "{} outside grid", position);
        &self.plane[self.width * position.y + position.x]
    }
}

impl IndexMut<Position> for Grid {
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        debug_assert!(self.contains(position), "{} outside grid", position);
        &mut self.plane[self.width * position.y + position.x]
    }
}

impl Grid {
    pub fn blank(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            plane: vec![Tile::Blank; width * height],
        }
    }

    /// Blank grid with the given cells marked as obstacles. Out-of-bounds
    /// positions are ignored.
    pub fn with_obstacles(width: usize, height: usize, obstacles: &[Position]) -> Grid {
        let mut grid = Grid::blank(width, height);
        for &position in obstacles {
            if grid.contains(position) {
                grid[position] = Tile::Obstacle;
            }
        }
        grid
    }

    pub fn get_plane(&self) -> &Plane {
        &self.plane
    }

    pub fn get_dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    pub fn is_obstacle(&self, position: Position) -> bool {
        self.contains(position) && self[position].is_obstacle()
    }

    pub fn obstacle_count(&self) -> usize {
        self.plane.iter().filter(|tile| tile.is_obstacle()).count()
    }

    /// In-bounds orthogonal neighbors in north, east, south, west order.
    /// North is toward `y = 0`.
    pub fn neighbors(&self, position: Position) -> Vec<Position> {
        let Position { x, y } = position;
        let mut neighbors = Vec::with_capacity(4);

        // north
        if y > 0 {
            neighbors.push(Position::new(x, y - 1));
        }

        // east
        if x + 1 < self.width {
            neighbors.push(Position::new(x + 1, y));
        }

        // south
        if y + 1 < self.height {
            neighbors.push(Position::new(x, y + 1));
        }

        // west
        if x > 0 {
            neighbors.push(Position::new(x - 1, y));
        }

        neighbors
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Position::new(x, y)))
    }
}
