use super::config::SearchConfig;
use super::error::{ConfigError, Endpoint, Result};
use super::frontier::{ClosedSet, OpenSet};
use super::generator::{random_position, ObstacleGenerator};
use super::grid::{Grid, Tile};
use super::node::{Node, NodeArena, NodeId};
use super::path_builder::PathBuilder;
use super::position::Position;
use log::{debug, trace};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Open nodes remain and the goal is not yet closed
    Running,
    /// The goal has been closed
    Found,
    /// Open set drained without closing the goal; no path exists
    Exhausted,
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchStatus::Running)
    }
}

/// Heuristic for 4-connected unit-cost movement.
pub fn manhattan_distance(a: Position, b: Position) -> u32 {
    a.manhattan(&b)
}

/// One A* search over a fixed grid, advanced one expansion at a time.
pub struct SearchSession {
    grid: Grid,
    start: Position,
    goal: Position,
    arena: NodeArena,
    open: OpenSet,
    closed: ClosedSet,
    last_expanded: Option<NodeId>,
    ticks: usize,
    tick_limit: Option<usize>,
}

impl SearchSession {
    /// Generates a grid from `config` and seeds the open set with `start`.
    pub fn initialize<R: Rng + ?Sized>(
        config: &SearchConfig,
        start: Position,
        goal: Position,
        rng: &mut R,
    ) -> Result<SearchSession> {
        config.validate()?;
        check_endpoint(Endpoint::Start, start, config.width, config.height)?;
        check_endpoint(Endpoint::Goal, goal, config.width, config.height)?;

        let generator = ObstacleGenerator::new(
            config.obstacle_probability,
            config.adjacent_boost_probability,
        )?;
        let grid = generator.generate(config.width, config.height, rng);
        Ok(SearchSession::from_grid(grid, start, goal)?.with_tick_limit(config.max_ticks))
    }

    /// Like [`SearchSession::initialize`], with start and goal drawn
    /// uniformly from the grid. They may coincide.
    pub fn random<R: Rng + ?Sized>(config: &SearchConfig, rng: &mut R) -> Result<SearchSession> {
        config.validate()?;
        let grid = ObstacleGenerator::new(
            config.obstacle_probability,
            config.adjacent_boost_probability,
        )?
        .generate(config.width, config.height, rng);
        let start = random_position(config.width, config.height, rng);
        let goal = random_position(config.width, config.height, rng);
        Ok(SearchSession::from_grid(grid, start, goal)?.with_tick_limit(config.max_ticks))
    }

    /// Starts a search over an existing grid. Start and goal cells are
    /// cleared so both endpoints are always traversable.
    pub fn from_grid(mut grid: Grid, start: Position, goal: Position) -> Result<SearchSession> {
        let (width, height) = grid.get_dimensions();
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }
        check_endpoint(Endpoint::Start, start, width, height)?;
        check_endpoint(Endpoint::Goal, goal, width, height)?;

        grid[goal] = Tile::Blank;
        grid[start] = Tile::Blank;

        let mut arena = NodeArena::new();
        let mut open = OpenSet::new();
        let root = arena.push(Node::start(start));
        open.insert(root, &arena[root]);

        debug!(
            "search initialized: {}x{} grid, {} obstacles, start={} goal={}",
            width,
            height,
            grid.obstacle_count(),
            start,
            goal
        );

        Ok(SearchSession {
            grid,
            start,
            goal,
            arena,
            open,
            closed: ClosedSet::new(),
            last_expanded: None,
            ticks: 0,
            tick_limit: None,
        })
    }

    /// Cap used by [`SearchSession::run_to_limit`]. Sessions built from a
    /// [`SearchConfig`] take it from `max_ticks`.
    pub fn with_tick_limit(mut self, tick_limit: Option<usize>) -> SearchSession {
        self.tick_limit = tick_limit;
        self
    }

    pub fn tick_limit(&self) -> Option<usize> {
        self.tick_limit
    }

    /// Expands the best open node and returns it, or `None` once the open
    /// set is empty. An empty open set is left untouched.
    pub fn step(&mut self) -> Option<Node> {
        let current_id = self.open.pop_best()?;
        let current = self.arena[current_id];
        self.closed.insert(current_id, current.get_position());
        self.last_expanded = Some(current_id);
        self.ticks += 1;

        trace!(
            "expanding {} g={} h={} f={}",
            current.get_position(),
            current.g(),
            current.h(),
            current.f()
        );

        for neighbor in self.grid.neighbors(current.get_position()) {
            if self.closed.contains(neighbor) || self.grid[neighbor].is_obstacle() {
                continue;
            }

            let g = current.g() + 1;
            let h = manhattan_distance(neighbor, self.goal);

            match self.open.find(neighbor) {
                None => {
                    let id = self.arena.push(Node::new(neighbor, current_id, g, h));
                    self.open.insert(id, &self.arena[id]);
                }
                // only a strictly cheaper route displaces the existing node
                Some(existing) if self.arena[existing].g() > g => {
                    self.open.remove_by_position(neighbor);
                    let id = self.arena.push(Node::new(neighbor, current_id, g, h));
                    self.open.insert(id, &self.arena[id]);
                }
                Some(_) => {}
            }
        }

        match self.status() {
            SearchStatus::Found => debug!(
                "goal {} closed after {} expansions, path cost {}",
                self.goal,
                self.closed.len(),
                self.goal_node().map_or(0, |node| node.g())
            ),
            SearchStatus::Exhausted => debug!(
                "open set exhausted after {} expansions, goal {} unreachable",
                self.closed.len(),
                self.goal
            ),
            SearchStatus::Running => {}
        }

        Some(current)
    }

    pub fn is_goal_reached(&self) -> bool {
        self.closed.contains(self.goal)
    }

    pub fn status(&self) -> SearchStatus {
        if self.is_goal_reached() {
            SearchStatus::Found
        } else if self.open.is_empty() {
            SearchStatus::Exhausted
        } else {
            SearchStatus::Running
        }
    }

    /// Positions from the goal back to the start; empty until the goal is closed.
    pub fn reconstruct_path(&self) -> Vec<Position> {
        PathBuilder::new(&self.arena).build(&self.closed, self.goal)
    }

    /// Caller-driven tick loop: one `step` followed by `on_tick` per tick,
    /// until the search is over or `max_ticks` ticks have been issued.
    pub fn run<F>(&mut self, max_ticks: Option<usize>, mut on_tick: F) -> SearchStatus
    where
        F: FnMut(&SearchSession, &Node),
    {
        let mut issued = 0;
        while !self.status().is_terminal() {
            if max_ticks.is_some_and(|limit| issued >= limit) {
                debug!("tick limit reached with {} open nodes", self.open.len());
                break;
            }
            let Some(current) = self.step() else {
                break;
            };
            issued += 1;
            on_tick(&*self, &current);
        }
        self.status()
    }

    /// [`SearchSession::run`] capped by the session's own tick limit.
    pub fn run_to_limit<F>(&mut self, on_tick: F) -> SearchStatus
    where
        F: FnMut(&SearchSession, &Node),
    {
        self.run(self.tick_limit, on_tick)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn open(&self) -> &OpenSet {
        &self.open
    }

    pub fn closed(&self) -> &ClosedSet {
        &self.closed
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn last_expanded(&self) -> Option<&Node> {
        self.last_expanded.map(|id| &self.arena[id])
    }

    pub fn goal_node(&self) -> Option<&Node> {
        self.closed.find(self.goal).map(|id| &self.arena[id])
    }

    /// Open nodes in insertion order.
    pub fn open_nodes(&self) -> Vec<Node> {
        self.open.iter().map(|id| self.arena[id]).collect()
    }

    /// Closed nodes in the order they were expanded.
    pub fn closed_nodes(&self) -> Vec<Node> {
        self.closed.iter().map(|id| self.arena[id]).collect()
    }
}

fn check_endpoint(
    endpoint: Endpoint,
    position: Position,
    width: usize,
    height: usize,
) -> Result<()> {
    if position.x < width && position.y < height {
        Ok(())
    } else {
        Err(ConfigError::OutOfBounds {
            endpoint,
            position,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn p(x: usize, y: usize) -> Position {
        Position::new(x, y)
    }

    fn run_to_end(session: &mut SearchSession) -> Vec<Node> {
        let mut expanded = Vec::new();
        while !session.status().is_terminal() {
            match session.step() {
                Some(node) => expanded.push(node),
                None => break,
            }
        }
        expanded
    }

    fn random_session(seed: u64, size: usize) -> SearchSession {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = SearchConfig::with_dimensions(size, size).with_probabilities(0.15, 0.4);
        SearchSession::random(&config, &mut rng).unwrap()
    }

    // reference step distance over 4-connected blank cells
    fn bfs_distance(grid: &Grid, start: Position, goal: Position) -> Option<usize> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0)]);
        while let Some((position, distance)) = queue.pop_front() {
            if position == goal {
                return Some(distance);
            }
            for next in grid.neighbors(position) {
                if !grid[next].is_obstacle() && seen.insert(next) {
                    queue.push_back((next, distance + 1));
                }
            }
        }
        None
    }

    #[test]
    fn it_finds_corner_to_corner_path() {
        let mut session = SearchSession::from_grid(Grid::blank(3, 3), p(0, 0), p(2, 2)).unwrap();
        run_to_end(&mut session);

        assert_eq!(session.status(), SearchStatus::Found);
        let path = session.reconstruct_path();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&p(2, 2)));
        assert_eq!(path.last(), Some(&p(0, 0)));
        assert_eq!(session.goal_node().map(|node| node.g()), Some(4));
    }

    #[test]
    fn it_exhausts_when_a_wall_splits_the_grid() {
        let grid = Grid::with_obstacles(3, 3, &[p(1, 0), p(1, 1), p(1, 2)]);
        let mut session = SearchSession::from_grid(grid, p(0, 1), p(2, 1)).unwrap();
        let expanded = run_to_end(&mut session);

        assert_eq!(session.status(), SearchStatus::Exhausted);
        assert!(session.open().is_empty());
        assert!(!session.is_goal_reached());
        assert!(session.reconstruct_path().is_empty());
        assert_eq!(expanded.len(), 3);
    }

    #[test]
    fn it_closes_goal_immediately_when_start_is_goal() {
        let mut session = SearchSession::from_grid(Grid::blank(4, 4), p(2, 1), p(2, 1)).unwrap();
        let first = session.step().unwrap();

        assert_eq!(first.get_position(), p(2, 1));
        assert_eq!((first.g(), first.h(), first.f()), (0, 0, 0));
        assert!(session.is_goal_reached());
        assert_eq!(session.reconstruct_path(), vec![p(2, 1)]);
    }

    #[test]
    fn it_matches_manhattan_distance_without_obstacles() {
        let endpoints = [
            (p(0, 0), p(5, 4)),
            (p(5, 0), p(0, 4)),
            (p(3, 2), p(3, 2)),
            (p(1, 4), p(4, 1)),
            (p(2, 0), p(2, 4)),
        ];
        for (start, goal) in endpoints {
            let mut session = SearchSession::from_grid(Grid::blank(6, 5), start, goal).unwrap();
            run_to_end(&mut session);

            let edges = session.reconstruct_path().len() - 1;
            assert_eq!(edges as u32, manhattan_distance(start, goal));
        }
    }

    #[test]
    fn it_expands_neighbors_north_east_south_west() {
        let mut session = SearchSession::from_grid(Grid::blank(3, 3), p(1, 1), p(1, 1)).unwrap();
        session.step();

        let open: Vec<Position> = session.open_nodes().iter().map(|n| n.get_position()).collect();
        assert_eq!(open, vec![p(1, 0), p(2, 1), p(1, 2), p(0, 1)]);
    }

    #[test]
    fn it_skips_obstacles_and_scores_neighbors() {
        let grid = Grid::with_obstacles(3, 3, &[p(1, 0)]);
        let mut session = SearchSession::from_grid(grid, p(0, 0), p(2, 0)).unwrap();
        session.step();

        let open = session.open_nodes();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].get_position(), p(0, 1));
        assert_eq!((open[0].g(), open[0].h(), open[0].f()), (1, 3, 4));
    }

    #[test]
    fn it_clears_obstacles_under_endpoints() {
        let grid = Grid::with_obstacles(2, 2, &[p(0, 0), p(1, 1)]);
        let session = SearchSession::from_grid(grid, p(0, 0), p(1, 1)).unwrap();

        assert_eq!(session.grid().obstacle_count(), 0);
    }

    #[test]
    fn it_keeps_open_positions_unique() {
        for seed in 0..10 {
            let mut session = random_session(seed, 12);
            while session.step().is_some() && !session.is_goal_reached() {
                let positions: HashSet<Position> =
                    session.open_nodes().iter().map(|n| n.get_position()).collect();
                assert_eq!(positions.len(), session.open().len());
            }
        }
    }

    #[test]
    fn it_never_reopens_closed_positions() {
        for seed in 0..10 {
            let mut session = random_session(seed, 12);
            let mut closed_so_far = HashSet::new();
            while let Some(node) = session.step() {
                assert!(closed_so_far.insert(node.get_position()));
                for open in session.open_nodes() {
                    assert!(!closed_so_far.contains(&open.get_position()));
                }
                if session.is_goal_reached() {
                    break;
                }
            }
        }
    }

    #[test]
    fn it_is_idle_once_exhausted() {
        let grid = Grid::with_obstacles(3, 1, &[p(1, 0)]);
        let mut session = SearchSession::from_grid(grid, p(0, 0), p(2, 0)).unwrap();
        run_to_end(&mut session);
        let closed_before = session.closed_nodes();
        let ticks_before = session.ticks();

        assert!(session.step().is_none());
        assert!(session.step().is_none());
        assert!(session.open().is_empty());
        assert_eq!(session.closed_nodes(), closed_before);
        assert_eq!(session.ticks(), ticks_before);
    }

    #[test]
    fn it_decrements_g_along_the_path() {
        for seed in 0..20 {
            let mut session = random_session(seed, 15);
            run_to_end(&mut session);
            let Some(goal) = session.closed().find(session.goal()) else {
                continue;
            };

            let costs: Vec<u32> = PathBuilder::new(&session.arena)
                .walk(goal)
                .map(|n| n.g())
                .collect();
            for pair in costs.windows(2) {
                assert_eq!(pair[0], pair[1] + 1);
            }
            assert_eq!(costs.last(), Some(&0));
        }
    }

    #[test]
    fn it_replays_identically_on_the_same_grid() {
        let first_session = random_session(7, 20);
        let grid = first_session.grid().clone();
        let (start, goal) = (first_session.start(), first_session.goal());

        let mut a = SearchSession::from_grid(grid.clone(), start, goal).unwrap();
        let mut b = SearchSession::from_grid(grid, start, goal).unwrap();

        assert_eq!(run_to_end(&mut a), run_to_end(&mut b));
        assert_eq!(a.reconstruct_path(), b.reconstruct_path());
    }

    #[test]
    fn it_finds_shortest_paths_on_random_grids() {
        for seed in 0..30 {
            let mut session = random_session(seed, 16);
            run_to_end(&mut session);

            let expected = bfs_distance(session.grid(), session.start(), session.goal());
            match expected {
                Some(distance) => {
                    assert_eq!(session.status(), SearchStatus::Found);
                    assert_eq!(session.reconstruct_path().len(), distance + 1);
                }
                None => assert_eq!(session.status(), SearchStatus::Exhausted),
            }
        }
    }

    #[test]
    fn it_links_consecutive_path_cells() {
        for seed in 0..10 {
            let mut session = random_session(seed, 14);
            run_to_end(&mut session);
            let path = session.reconstruct_path();

            for pair in path.windows(2) {
                assert_eq!(manhattan_distance(pair[0], pair[1]), 1);
                assert!(!session.grid()[pair[0]].is_obstacle());
            }
        }
    }

    #[test]
    fn it_rejects_endpoints_outside_the_grid() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = SearchConfig::with_dimensions(5, 5);

        let result = SearchSession::initialize(&config, p(5, 0), p(1, 1), &mut rng);
        assert!(matches!(
            result,
            Err(ConfigError::OutOfBounds {
                endpoint: Endpoint::Start,
                ..
            })
        ));

        let result = SearchSession::initialize(&config, p(0, 0), p(1, 9), &mut rng);
        assert!(matches!(
            result,
            Err(ConfigError::OutOfBounds {
                endpoint: Endpoint::Goal,
                ..
            })
        ));
    }

    #[test]
    fn it_rejects_empty_grids() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = SearchConfig::with_dimensions(0, 5);

        assert!(matches!(
            SearchSession::initialize(&config, p(0, 0), p(0, 0), &mut rng),
            Err(ConfigError::ZeroDimension { .. })
        ));
        assert!(matches!(
            SearchSession::from_grid(Grid::blank(3, 0), p(0, 0), p(0, 0)),
            Err(ConfigError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn it_initializes_with_a_single_start_node() {
        let mut rng = StdRng::seed_from_u64(11);
        let session =
            SearchSession::initialize(&SearchConfig::default(), p(0, 0), p(19, 19), &mut rng).unwrap();

        assert_eq!(session.status(), SearchStatus::Running);
        assert_eq!(session.open().len(), 1);
        assert!(session.closed().is_empty());
        assert!(session.last_expanded().is_none());
        assert_eq!(session.open_nodes()[0], Node::start(p(0, 0)));
    }

    #[test]
    fn it_runs_until_the_goal_is_closed() {
        let mut session = SearchSession::from_grid(Grid::blank(5, 5), p(0, 0), p(4, 4)).unwrap();
        let mut rendered = Vec::new();

        let status = session.run(None, |session, current| {
            assert_eq!(session.last_expanded(), Some(current));
            rendered.push(current.get_position());
        });

        assert_eq!(status, SearchStatus::Found);
        assert_eq!(rendered.len(), session.ticks());
        assert_eq!(rendered.last(), Some(&p(4, 4)));
    }

    #[test]
    fn it_stops_at_the_tick_limit() {
        let mut session = SearchSession::from_grid(Grid::blank(10, 10), p(0, 0), p(9, 9)).unwrap();
        let mut ticks = 0;

        let status = session.run(Some(3), |_, _| ticks += 1);

        assert_eq!(status, SearchStatus::Running);
        assert_eq!(ticks, 3);
        assert_eq!(session.closed().len(), 3);
    }

    #[test]
    fn it_takes_the_tick_limit_from_config() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut config = SearchConfig::with_dimensions(10, 10).with_probabilities(0.0, 0.0);
        config.max_ticks = Some(2);
        let mut session = SearchSession::initialize(&config, p(0, 0), p(9, 9), &mut rng).unwrap();
        let mut ticks = 0;

        assert_eq!(session.tick_limit(), Some(2));
        assert_eq!(session.run_to_limit(|_, _| ticks += 1), SearchStatus::Running);
        assert_eq!(ticks, 2);

        let mut unlimited = session.with_tick_limit(None);
        assert_eq!(unlimited.run_to_limit(|_, _| {}), SearchStatus::Found);
    }

    fn detour_session() -> SearchSession {
        let grid = Grid::with_obstacles(4, 4, &[p(1, 1), p(2, 3), p(3, 2)]);
        SearchSession::from_grid(grid, p(1, 0), p(3, 3)).unwrap()
    }

    fn parent_position(session: &SearchSession, node: &Node) -> Option<Position> {
        node.get_parent()
            .and_then(|id| session.node(id))
            .map(|parent| parent.get_position())
    }

    #[test]
    fn it_replaces_costlier_open_nodes() {
        let mut session = detour_session();
        for _ in 0..8 {
            session.step();
        }

        // (0, 2) was first reached the long way round, through (1, 2)
        let stale_id = session.open().find(p(0, 2)).unwrap();
        let stale = *session.node(stale_id).unwrap();
        assert_eq!((stale.g(), stale.f()), (5, 9));
        assert_eq!(parent_position(&session, &stale), Some(p(1, 2)));
        assert_eq!(session.open().len(), 3);

        let current = session.step().unwrap();
        assert_eq!(current.get_position(), p(0, 1));

        let fresh_id = session.open().find(p(0, 2)).unwrap();
        let fresh = *session.node(fresh_id).unwrap();
        assert_ne!(fresh_id, stale_id);
        assert_eq!((fresh.g(), fresh.h(), fresh.f()), (3, 4, 7));
        assert_eq!(parent_position(&session, &fresh), Some(p(0, 1)));

        // only the expanded node left the open set
        assert_eq!(session.open().len(), 2);
        let order: Vec<Position> = session.open_nodes().iter().map(|n| n.get_position()).collect();
        assert_eq!(order, vec![p(1, 3), p(0, 2)]);
    }

    #[test]
    fn it_keeps_open_nodes_on_equal_cost() {
        let mut session = detour_session();
        for _ in 0..3 {
            session.step();
        }

        let kept_id = session.open().find(p(3, 1)).unwrap();
        assert_eq!(session.node(kept_id).map(|n| n.g()), Some(3));

        // (2, 1) also reaches (3, 1) at g = 3
        let current = session.step().unwrap();
        assert_eq!(current.get_position(), p(2, 1));

        assert_eq!(session.open().find(p(3, 1)), Some(kept_id));
        let kept = *session.node(kept_id).unwrap();
        assert_eq!(parent_position(&session, &kept), Some(p(3, 0)));
        let order: Vec<Position> = session.open_nodes().iter().map(|n| n.get_position()).collect();
        assert_eq!(order, vec![p(0, 0), p(3, 1), p(2, 2)]);
    }
}
