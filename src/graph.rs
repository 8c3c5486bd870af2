//! Directed edge-list graph used as partitioner input
//!
//! Connections are the union of incoming and outgoing neighbours, and the
//! edge-count cost is the number of directed edges between two vertices in
//! either direction. Vertex order is preserved from construction, which keeps
//! partitioning reproducible.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, MinerResult};

/// Serialized graph: `{ "vertices": [...], "edges": [[from, to], ...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphFile<V> {
    pub vertices: Vec<V>,
    #[serde(default)]
    pub edges: Vec<(V, V)>,
}

#[derive(Debug, Clone)]
pub struct Digraph<V> {
    vertices: Vec<V>,
    outgoing: HashMap<V, Vec<V>>,
    incoming: HashMap<V, Vec<V>>,
    edge_counts: HashMap<(V, V), usize>,
}

impl<V> Digraph<V>
where
    V: Clone + Eq + Hash,
{
    /// Build a graph; edges touching unknown vertices are kept for counting
    /// but never reported as connections.
    pub fn from_edges<I, E>(vertices: I, edges: E) -> Self
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V)>,
    {
        let mut graph = Self {
            vertices: Vec::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            edge_counts: HashMap::new(),
        };

        let mut seen = HashSet::new();
        for vertex in vertices {
            if seen.insert(vertex.clone()) {
                graph.vertices.push(vertex);
            }
        }
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    /// Build from a parsed file, rejecting edges to undeclared vertices
    pub fn from_file(file: GraphFile<V>) -> MinerResult<Self> {
        let declared: HashSet<&V> = file.vertices.iter().collect();
        if declared.len() != file.vertices.len() {
            return Err(MinerError::InvalidArgument(
                "graph declares a vertex more than once".into(),
            ));
        }
        if let Some(position) = file
            .edges
            .iter()
            .position(|(from, to)| !declared.contains(from) || !declared.contains(to))
        {
            return Err(MinerError::InvalidArgument(format!(
                "edge {} references an undeclared vertex",
                position
            )));
        }
        Ok(Self::from_edges(file.vertices.clone(), file.edges))
    }

    pub fn add_edge(&mut self, from: V, to: V) {
        self.outgoing
            .entry(from.clone())
            .or_default()
            .push(to.clone());
        self.incoming
            .entry(to.clone())
            .or_default()
            .push(from.clone());
        *self.edge_counts.entry((from, to)).or_insert(0) += 1;
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn edge_total(&self) -> usize {
        self.edge_counts.values().sum()
    }

    /// Incoming and outgoing neighbours of `vertex`
    pub fn connections(&self, vertex: &V) -> HashSet<V> {
        let outgoing = self.outgoing.get(vertex).into_iter().flatten();
        let incoming = self.incoming.get(vertex).into_iter().flatten();
        outgoing.chain(incoming).cloned().collect()
    }

    /// Number of directed edges between `a` and `b`, counting both
    /// directions. A self-loop is both outgoing and incoming, so it counts twice.
    pub fn edge_count(&self, a: &V, b: &V) -> f64 {
        let forward = self.edge_counts.get(&(a.clone(), b.clone())).copied().unwrap_or(0);
        let backward = self.edge_counts.get(&(b.clone(), a.clone())).copied().unwrap_or(0);
        (forward + backward) as f64
    }
}
