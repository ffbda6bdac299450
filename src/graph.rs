//! The Graph Adapter: a read-only view the search engine consumes, plus one
//! concrete implementation (`AttributeGraph`) for tests, benchmarks, and
//! callers without a graph type of their own.
//!
//! The engine never touches `petgraph` (or any other graph library) directly;
//! it is written against [`GraphView`] alone, the same way this codebase's
//! query algorithms are written against `OmtsGraph` rather than a bare
//! `StableDiGraph`.

use std::fmt;
use std::hash::Hash;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;

use crate::attributes::AttributeBag;

/// Read-only adjacency and attribute access the search engine needs.
///
/// `Vertex` is the caller's own vertex identifier type (it need not be
/// `petgraph`'s `NodeIndex`); implementors translate it to whatever internal
/// representation they use.
///
/// # Contract
///
/// - `vertices()` and the two `neighbors_*` iterators must be stable across
///   calls made during the same search (the engine may call them more than
///   once for the same vertex).
/// - For an undirected graph, `neighbors_out` and `neighbors_in` must yield
///   the same set, and `degree_out`, `degree_in`, `degree` must all agree.
/// - `has_edge(u, v)` must agree with what `neighbors_out(u)` reports.
pub trait GraphView {
    type Vertex: Clone + Eq + Hash + Ord + fmt::Debug;

    fn is_directed(&self) -> bool;

    fn vertices(&self) -> impl Iterator<Item = Self::Vertex> + '_;

    fn neighbors_out(&self, v: &Self::Vertex) -> impl Iterator<Item = Self::Vertex> + '_;

    fn neighbors_in(&self, v: &Self::Vertex) -> impl Iterator<Item = Self::Vertex> + '_;

    fn degree_out(&self, v: &Self::Vertex) -> usize;

    fn degree_in(&self, v: &Self::Vertex) -> usize;

    /// Undirected degree. For a directed graph this is implementation's
    /// choice (typically `degree_out + degree_in`); the search engine only
    /// calls it when the effective graph is undirected, where it must equal
    /// both directed degrees.
    fn degree(&self, v: &Self::Vertex) -> usize;

    fn has_edge(&self, u: &Self::Vertex, v: &Self::Vertex) -> bool;

    fn vertex_attrs(&self, v: &Self::Vertex) -> &AttributeBag;

    fn edge_attrs(&self, u: &Self::Vertex, v: &Self::Vertex) -> Option<&AttributeBag>;
}

/// Errors constructing an [`AttributeGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphBuildError<V: fmt::Debug> {
    /// A vertex identifier was inserted more than once.
    DuplicateVertex(V),
    /// An edge referenced a vertex identifier never inserted.
    DanglingEdgeRef {
        /// The endpoint that could not be resolved.
        missing_vertex: V,
    },
}

impl<V: fmt::Debug> fmt::Display for GraphBuildError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateVertex(v) => write!(f, "duplicate vertex id: {v:?}"),
            Self::DanglingEdgeRef { missing_vertex } => {
                write!(f, "edge references unknown vertex: {missing_vertex:?}")
            }
        }
    }
}

impl<V: fmt::Debug> std::error::Error for GraphBuildError<V> {}

struct VertexData<V> {
    id: V,
    attrs: AttributeBag,
}

/// A `petgraph`-backed [`GraphView`] implementation, built incrementally.
///
/// Internally a `StableGraph<VertexData<V>, AttributeBag>` plus an
/// `id -> NodeIndex` map, following this codebase's own two-pass
/// graph-builder pattern (insert vertices first, recording the index map;
/// then insert edges, resolving endpoints through that map).
pub struct AttributeGraph<V: Clone + Eq + Hash + Ord + fmt::Debug> {
    graph: StableGraph<VertexData<V>, AttributeBag>,
    index: std::collections::HashMap<V, NodeIndex>,
    directed: bool,
    empty_attrs: AttributeBag,
}

impl<V: Clone + Eq + Hash + Ord + fmt::Debug> AttributeGraph<V> {
    pub fn new(directed: bool) -> Self {
        Self {
            graph: StableGraph::new(),
            index: std::collections::HashMap::new(),
            directed,
            empty_attrs: AttributeBag::new(),
        }
    }

    /// Inserts a vertex with the given attributes.
    ///
    /// # Errors
    /// Returns [`GraphBuildError::DuplicateVertex`] if `id` was already
    /// inserted.
    pub fn add_vertex(&mut self, id: V, attrs: AttributeBag) -> Result<(), GraphBuildError<V>> {
        if self.index.contains_key(&id) {
            return Err(GraphBuildError::DuplicateVertex(id));
        }
        let idx = self.graph.add_node(VertexData {
            id: id.clone(),
            attrs,
        });
        self.index.insert(id, idx);
        Ok(())
    }

    /// Inserts an edge `u -> v` (or, for undirected graphs, `u - v`).
    ///
    /// # Errors
    /// Returns [`GraphBuildError::DanglingEdgeRef`] if either endpoint was
    /// never inserted via [`Self::add_vertex`].
    pub fn add_edge(
        &mut self,
        u: &V,
        v: &V,
        attrs: AttributeBag,
    ) -> Result<(), GraphBuildError<V>> {
        let ui = *self
            .index
            .get(u)
            .ok_or_else(|| GraphBuildError::DanglingEdgeRef {
                missing_vertex: u.clone(),
            })?;
        let vi = *self
            .index
            .get(v)
            .ok_or_else(|| GraphBuildError::DanglingEdgeRef {
                missing_vertex: v.clone(),
            })?;
        self.graph.add_edge(ui, vi, attrs);
        Ok(())
    }

    fn index_of(&self, v: &V) -> Option<NodeIndex> {
        self.index.get(v).copied()
    }
}

impl<V: Clone + Eq + Hash + Ord + fmt::Debug> GraphView for AttributeGraph<V> {
    type Vertex = V;

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.graph.node_weights().map(|data| data.id.clone())
    }

    fn neighbors_out(&self, v: &V) -> impl Iterator<Item = V> + '_ {
        let idx = self.index_of(v);
        idx.into_iter().flat_map(move |idx| {
            let both = !self.directed;
            self.graph
                .edges_directed(idx, Direction::Outgoing)
                .map(|e| e.target())
                .chain(
                    both.then(|| self.graph.edges_directed(idx, Direction::Incoming))
                        .into_iter()
                        .flatten()
                        .map(|e| e.source()),
                )
                .map(|ni| self.graph[ni].id.clone())
        })
    }

    fn neighbors_in(&self, v: &V) -> impl Iterator<Item = V> + '_ {
        let idx = self.index_of(v);
        idx.into_iter().flat_map(move |idx| {
            let both = !self.directed;
            self.graph
                .edges_directed(idx, Direction::Incoming)
                .map(|e| e.source())
                .chain(
                    both.then(|| self.graph.edges_directed(idx, Direction::Outgoing))
                        .into_iter()
                        .flatten()
                        .map(|e| e.target()),
                )
                .map(|ni| self.graph[ni].id.clone())
        })
    }

    fn degree_out(&self, v: &V) -> usize {
        self.neighbors_out(v).count()
    }

    fn degree_in(&self, v: &V) -> usize {
        self.neighbors_in(v).count()
    }

    fn degree(&self, v: &V) -> usize {
        if self.directed {
            self.degree_out(v) + self.degree_in(v)
        } else {
            self.degree_out(v)
        }
    }

    fn has_edge(&self, u: &V, v: &V) -> bool {
        let (Some(ui), Some(vi)) = (self.index_of(u), self.index_of(v)) else {
            return false;
        };
        self.graph.find_edge(ui, vi).is_some()
            || (!self.directed && self.graph.find_edge(vi, ui).is_some())
    }

    fn vertex_attrs(&self, v: &V) -> &AttributeBag {
        self.index_of(v)
            .map(|idx| &self.graph[idx].attrs)
            .unwrap_or(&self.empty_attrs)
    }

    fn edge_attrs(&self, u: &V, v: &V) -> Option<&AttributeBag> {
        let ui = self.index_of(u)?;
        let vi = self.index_of(v)?;
        let edge = self
            .graph
            .find_edge(ui, vi)
            .or_else(|| (!self.directed).then(|| self.graph.find_edge(vi, ui)).flatten())?;
        self.graph.edge_weight(edge)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn triangle() -> AttributeGraph<&'static str> {
        let mut g = AttributeGraph::new(true);
        g.add_vertex("a", AttributeBag::new()).expect("insert a");
        g.add_vertex("b", AttributeBag::new()).expect("insert b");
        g.add_vertex("c", AttributeBag::new()).expect("insert c");
        g.add_edge(&"a", &"b", AttributeBag::new()).expect("edge a->b");
        g.add_edge(&"b", &"c", AttributeBag::new()).expect("edge b->c");
        g.add_edge(&"c", &"a", AttributeBag::new()).expect("edge c->a");
        g
    }

    #[test]
    fn duplicate_vertex_is_rejected() {
        let mut g: AttributeGraph<&'static str> = AttributeGraph::new(true);
        g.add_vertex("a", AttributeBag::new()).expect("first insert");
        let err = g.add_vertex("a", AttributeBag::new()).unwrap_err();
        assert_eq!(err, GraphBuildError::DuplicateVertex("a"));
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let mut g: AttributeGraph<&'static str> = AttributeGraph::new(true);
        g.add_vertex("a", AttributeBag::new()).expect("insert a");
        let err = g.add_edge(&"a", &"z", AttributeBag::new()).unwrap_err();
        assert_eq!(
            err,
            GraphBuildError::DanglingEdgeRef {
                missing_vertex: "z"
            }
        );
    }

    #[test]
    fn directed_triangle_has_single_successor() {
        let g = triangle();
        let succ: Vec<_> = g.neighbors_out(&"a").collect();
        assert_eq!(succ, vec!["b"]);
        let pred: Vec<_> = g.neighbors_in(&"a").collect();
        assert_eq!(pred, vec!["c"]);
        assert_eq!(g.degree_out(&"a"), 1);
        assert_eq!(g.degree_in(&"a"), 1);
    }

    #[test]
    fn has_edge_respects_direction() {
        let g = triangle();
        assert!(g.has_edge(&"a", &"b"));
        assert!(!g.has_edge(&"b", &"a"));
    }

    #[test]
    fn undirected_graph_mirrors_both_directions() {
        let mut g: AttributeGraph<&'static str> = AttributeGraph::new(false);
        g.add_vertex("x", AttributeBag::new()).expect("insert x");
        g.add_vertex("y", AttributeBag::new()).expect("insert y");
        g.add_edge(&"x", &"y", AttributeBag::new()).expect("edge x-y");
        assert!(g.has_edge(&"x", &"y"));
        assert!(g.has_edge(&"y", &"x"));
        assert_eq!(g.degree(&"x"), 1);
        assert_eq!(g.degree(&"y"), 1);
    }
}
