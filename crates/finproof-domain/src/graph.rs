//! Taxonomy relationship networks and cycle detection.

use crate::model::{Relationship, TaxonomyPackage};
use std::collections::{BTreeMap, BTreeSet};

/// Relationship network an arc belongs to, derived from its arcrole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Network {
    Calculation,
    Presentation,
    Other,
}

impl Network {
    pub fn for_arcrole(arcrole: Option<&str>) -> Self {
        let lowered = arcrole.unwrap_or("").to_ascii_lowercase();
        if lowered.contains("calculation") || lowered.ends_with("summation-item") {
            Network::Calculation
        } else if lowered.contains("presentation") || lowered.ends_with("parent-child") {
            Network::Presentation
        } else {
            Network::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Calculation => "calculation",
            Network::Presentation => "presentation",
            Network::Other => "relationship",
        }
    }
}

/// Directed graph of concepts. Nodes and successors are kept sorted so traversal
/// order never depends on declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationshipGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    InProgress,
    Done,
}

struct Frame<'g> {
    node: &'g str,
    successors: Vec<&'g str>,
    cursor: usize,
}

impl RelationshipGraph {
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut graph = RelationshipGraph::default();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.entry(to.to_string()).or_default();
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    fn successors(&self, node: &str) -> Vec<&str> {
        self.edges
            .get(node)
            .map(|s| s.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every distinct cycle reachable by a depth-first traversal, in discovery order.
    ///
    /// Iterative three-colour DFS: an edge into an in-progress node closes a cycle whose
    /// members are the path from that node back to itself. Each member appears once, in
    /// path order starting at the revisited node. Rotations of an already reported cycle
    /// are not reported again.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut colors: BTreeMap<&str, Color> = BTreeMap::new();
        let mut seen: BTreeSet<Vec<&str>> = BTreeSet::new();
        let mut cycles = Vec::new();

        for start in self.edges.keys() {
            if colors.contains_key(start.as_str()) {
                continue;
            }

            let mut path: Vec<&str> = vec![start.as_str()];
            let mut stack = vec![Frame {
                node: start.as_str(),
                successors: self.successors(start),
                cursor: 0,
            }];
            colors.insert(start.as_str(), Color::InProgress);

            while let Some(frame) = stack.last_mut() {
                if frame.cursor == frame.successors.len() {
                    colors.insert(frame.node, Color::Done);
                    stack.pop();
                    path.pop();
                    continue;
                }
                let next = frame.successors[frame.cursor];
                frame.cursor += 1;

                match colors.get(next) {
                    None => {
                        colors.insert(next, Color::InProgress);
                        path.push(next);
                        stack.push(Frame {
                            node: next,
                            successors: self.successors(next),
                            cursor: 0,
                        });
                    }
                    Some(Color::InProgress) => {
                        let Some(pos) = path.iter().position(|n| *n == next) else {
                            continue;
                        };
                        let members = path[pos..].to_vec();
                        if seen.insert(canonical_rotation(&members)) {
                            cycles.push(members.into_iter().map(str::to_string).collect());
                        }
                    }
                    Some(Color::Done) => {}
                }
            }
        }

        cycles
    }
}

/// Rotation of a cycle starting at its smallest member.
fn canonical_rotation<'a>(members: &[&'a str]) -> Vec<&'a str> {
    let Some(min_pos) = members
        .iter()
        .enumerate()
        .min_by_key(|(_, m)| **m)
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    members[min_pos..]
        .iter()
        .chain(members[..min_pos].iter())
        .copied()
        .collect()
}

/// Split a package's relationships into one graph per network.
///
/// Relationships with an empty endpoint are skipped; they are reported elsewhere.
pub fn networks(package: &TaxonomyPackage) -> BTreeMap<Network, RelationshipGraph> {
    let mut out: BTreeMap<Network, RelationshipGraph> = BTreeMap::new();
    for rel in &package.relationships {
        let (from, to) = endpoints(rel);
        if from.is_empty() || to.is_empty() {
            continue;
        }
        out.entry(Network::for_arcrole(rel.arcrole.as_deref()))
            .or_default()
            .add_edge(from, to);
    }
    out
}

pub fn endpoints(rel: &Relationship) -> (&str, &str) {
    (rel.from.trim(), rel.to.trim())
}
