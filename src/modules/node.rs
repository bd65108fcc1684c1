use super::position::Position;
use std::ops::Index;

/// Handle to a node stored in a [`NodeArena`].
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Search state for one cell. `parent` points back along the cheapest
/// known route toward the start.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Node {
    position: Position,
    parent: Option<NodeId>,
    g: u32,
    h: u32,
    f: u32,
}

impl Node {
    pub fn start(position: Position) -> Node {
        Node {
            position,
            parent: None,
            g: 0,
            h: 0,
            f: 0,
        }
    }

    pub fn new(position: Position, parent: NodeId, g: u32, h: u32) -> Node {
        Node {
            position,
            parent: Some(parent),
            g,
            h,
            f: g + h,
        }
    }

    pub fn get_position(&self) -> Position {
        self.position
    }

    pub fn get_parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.f
    }
}

/// Append-only node storage. Handles stay valid for the arena's lifetime.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}
