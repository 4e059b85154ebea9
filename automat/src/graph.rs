//! Graph form of an automaton
//!
//! Nodes live in an arena owned by the [`Automaton`] and are addressed by
//! index; edges store the index of their target. Every structural change can
//! be recorded as a [`Snapshot`] in an append-only history.

use crate::label::Label;
use crate::pattern::Pattern;
use std::fmt;

/// A node ID, equal to the node's index in the arena
pub type NodeId = usize;

/// The label an edge carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A fully decomposed label
    Atom(Label),
    /// A sub-expression the builder has not decomposed yet
    Expr(Pattern),
}

impl Transition {
    /// Whether the label is still a compound expression
    pub fn is_pending(&self) -> bool {
        matches!(self, Transition::Expr(_))
    }

    /// The atomic label, if decomposed
    pub fn label(&self) -> Option<&Label> {
        match self {
            Transition::Atom(label) => Some(label),
            Transition::Expr(_) => None,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Atom(label) => write!(f, "{}", label),
            Transition::Expr(pattern) => write!(f, "{}", pattern),
        }
    }
}

/// An outgoing edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Target node
    pub target: NodeId,
    /// Edge label
    pub transition: Transition,
}

/// A node of the automaton graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Arena index
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Whether this is a start state
    pub is_start: bool,
    /// Whether this is a final state
    pub is_final: bool,
    /// Outgoing edges, in insertion order
    pub edges: Vec<Edge>,
}

impl Node {
    fn new(id: NodeId) -> Self {
        Node {
            id,
            name: format!("q{}", id),
            is_start: false,
            is_final: false,
            edges: Vec::new(),
        }
    }
}

/// An immutable copy of the graph at one step of a construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Position in the history, starting at 0
    pub step: usize,
    /// All nodes and edges at that point
    pub nodes: Vec<Node>,
    /// What the step did
    pub comment: String,
}

/// An automaton in graph form
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    nodes: Vec<Node>,
    history: Vec<Snapshot>,
}

impl Automaton {
    /// Create an empty automaton
    pub fn new() -> Self {
        Automaton::default()
    }

    /// Allocate a new node and return its ID
    pub fn add_node(&mut self) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id));
        id
    }

    /// Allocate a new node with a custom display name
    pub fn add_named_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.add_node();
        self.nodes[id].name = name.into();
        id
    }

    /// Add an edge between nodes
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, transition: Transition) {
        self.nodes[from].edges.push(Edge {
            target: to,
            transition,
        });
    }

    /// Add an edge with an atomic label
    pub fn add_atom(&mut self, from: NodeId, to: NodeId, label: Label) {
        self.add_edge(from, to, Transition::Atom(label));
    }

    /// Remove and return the edge at `index` of node `from`
    pub(crate) fn remove_edge(&mut self, from: NodeId, index: usize) -> Edge {
        self.nodes[from].edges.remove(index)
    }

    /// Mark a node as a start state
    pub fn set_start(&mut self, id: NodeId) {
        self.nodes[id].is_start = true;
    }

    /// Mark a node as a final state
    pub fn set_final(&mut self, id: NodeId) {
        self.nodes[id].is_final = true;
    }

    /// All nodes, ordered by ID
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the automaton has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over start nodes in ID order
    pub fn start_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_start)
    }

    /// Iterate over final nodes in ID order
    pub fn final_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_final)
    }

    /// Iterate over all edges as `(source, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, &Edge)> {
        self.nodes
            .iter()
            .flat_map(|n| n.edges.iter().map(move |e| (n.id, e)))
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// First edge still carrying a compound expression, as
    /// `(source, edge index)`, scanning nodes by ID and edges in order
    pub fn first_pending(&self) -> Option<(NodeId, usize)> {
        self.nodes.iter().find_map(|n| {
            n.edges
                .iter()
                .position(|e| e.transition.is_pending())
                .map(|index| (n.id, index))
        })
    }

    /// Whether every edge label is atomic
    pub fn is_atomic(&self) -> bool {
        self.first_pending().is_none()
    }

    /// Record the current graph in the history
    pub fn snapshot(&mut self, comment: impl Into<String>) {
        let snapshot = Snapshot {
            step: self.history.len(),
            nodes: self.nodes.clone(),
            comment: comment.into(),
        };
        self.history.push(snapshot);
    }

    /// The recorded history, oldest first
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Display name of a node, or `?` for an unknown ID
    pub fn name_of(&self, id: NodeId) -> &str {
        self.nodes.get(id).map_or("?", |n| n.name.as_str())
    }
}
