use super::node::{Node, NodeId};
use super::position::Position;
use keyed_priority_queue::KeyedPriorityQueue;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Expansion order: lowest `f` first, then earliest insertion.
type Rank = (u32, u64);

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    node: NodeId,
    seq: u64,
}

/// Candidate nodes awaiting expansion, at most one per position.
///
/// Each insertion is stamped with a fresh sequence number, so a node that
/// replaces another one for the same position moves to the back of the
/// insertion order.
pub struct OpenSet {
    // min-heap on (f, seq)
    queue: KeyedPriorityQueue<Position, Reverse<Rank>>,
    entries: HashMap<Position, OpenEntry>,
    next_seq: u64,
}

impl Default for OpenSet {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenSet {
    pub fn new() -> OpenSet {
        OpenSet {
            queue: KeyedPriorityQueue::new(),
            entries: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Adds `node` under its position, replacing any node already there.
    /// Returns the handle that was replaced.
    pub fn insert(&mut self, id: NodeId, node: &Node) -> Option<NodeId> {
        let position = node.get_position();
        let seq = self.next_seq;
        self.next_seq += 1;

        self.queue.push(position, Reverse((node.f(), seq)));
        self.entries
            .insert(position, OpenEntry { node: id, seq })
            .map(|replaced| replaced.node)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.entries.contains_key(&position)
    }

    pub fn find(&self, position: Position) -> Option<NodeId> {
        self.entries.get(&position).map(|entry| entry.node)
    }

    pub fn remove_by_position(&mut self, position: Position) -> Option<NodeId> {
        self.queue.remove(&position);
        self.entries.remove(&position).map(|entry| entry.node)
    }

    /// Removes and returns the node with the lowest `f`; among equals, the
    /// one inserted first.
    pub fn pop_best(&mut self) -> Option<NodeId> {
        let (position, _) = self.queue.pop()?;
        self.entries.remove(&position).map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> {
        let mut entries: Vec<OpenEntry> = self.entries.values().copied().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.node)
    }
}

/// Finalized nodes, in the order they were closed.
#[derive(Debug, Default)]
pub struct ClosedSet {
    order: Vec<NodeId>,
    index: HashMap<Position, NodeId>,
}

impl ClosedSet {
    pub fn new() -> ClosedSet {
        ClosedSet::default()
    }

    /// Returns false, leaving the set unchanged, if `position` is already closed.
    pub fn insert(&mut self, id: NodeId, position: Position) -> bool {
        if self.index.contains_key(&position) {
            return false;
        }
        self.index.insert(position, id);
        self.order.push(id);
        true
    }

    pub fn contains(&self, position: Position) -> bool {
        self.index.contains_key(&position)
    }

    pub fn find(&self, position: Position) -> Option<NodeId> {
        self.index.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }
}
