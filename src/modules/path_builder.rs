use super::frontier::ClosedSet;
use super::node::{Node, NodeArena, NodeId};
use super::position::Position;

/// Walks parent links through a [`NodeArena`].
pub struct PathBuilder<'a> {
    arena: &'a NodeArena,
}

impl<'a> PathBuilder<'a> {
    pub fn new(arena: &'a NodeArena) -> PathBuilder<'a> {
        PathBuilder { arena }
    }

    /// Positions from `goal` back to the start, or empty while `goal` is
    /// not closed.
    pub fn build(&self, closed: &ClosedSet, goal: Position) -> Vec<Position> {
        match closed.find(goal) {
            Some(id) => self.walk(id).map(|node| node.get_position()).collect(),
            None => Vec::new(),
        }
    }

    pub fn walk(&self, from: NodeId) -> ParentChain<'a> {
        ParentChain {
            arena: self.arena,
            next: Some(from),
        }
    }
}

/// Iterator over a node and its ancestors, ending at the parentless start.
pub struct ParentChain<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl<'a> Iterator for ParentChain<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.next?)?;
        self.next = node.get_parent();
        Some(node)
    }
}
