//! Structural and attribute match predicates, plus the per-search
//! attribute-match cache.
//!
//! The engine treats all three predicates as pluggable callbacks, mirroring
//! this codebase's `SelectorSet` (property predicates composed externally,
//! not hardwired into the traversal that uses them). Unlike a `bool`-valued
//! selector, these predicates are fallible: a predicate error aborts the
//! search and is reported to the caller with the offending backbone attached
//! (see [`crate::engine::SearchError::Predicate`]).

use std::collections::HashMap;
use std::fmt;

use crate::graph::GraphView;

/// An error raised by a user-supplied predicate.
///
/// The default predicates never produce one; this exists for callers that
/// plug in predicates which can fail (e.g. an attribute lookup against an
/// external store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateError(pub String);

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "predicate failed: {}", self.0)
    }
}

impl std::error::Error for PredicateError {}

/// `struct(u, x)` of §4.2: a host vertex must have at least as much
/// in/out-degree as the motif vertex it would stand in for.
///
/// Degenerates to comparing a single undirected degree when either graph
/// reports itself as undirected.
pub fn default_structural_match<M, H>(
    motif: &M,
    host: &H,
    directed: bool,
    mu: &M::Vertex,
    hv: &M::Vertex,
) -> bool
where
    M: GraphView,
    H: GraphView<Vertex = M::Vertex>,
{
    if directed {
        host.degree_in(hv) >= motif.degree_in(mu) && host.degree_out(hv) >= motif.degree_out(mu)
    } else {
        host.degree(hv) >= motif.degree(mu)
    }
}

/// `attr(u, x)` of §4.2: every motif vertex attribute must be present on the
/// host vertex with an equal value. Motif attributes absent entirely impose
/// no constraint.
pub fn default_node_attr_match<M, H>(motif: &M, host: &H, mu: &M::Vertex, hv: &M::Vertex) -> bool
where
    M: GraphView,
    H: GraphView<Vertex = M::Vertex>,
{
    motif.vertex_attrs(mu).is_subset_of(host.vertex_attrs(hv))
}

/// `edge_attr((u1,u2), (x1,x2))` of §4.2: every attribute on the motif edge
/// must exist with an equal value on the host edge. A motif edge with no
/// host counterpart fails trivially (the structural filter should already
/// have excluded this case by the time this is consulted).
pub fn default_edge_attr_match<M, H>(
    motif: &M,
    host: &H,
    mu1: &M::Vertex,
    mu2: &M::Vertex,
    hv1: &M::Vertex,
    hv2: &M::Vertex,
) -> bool
where
    M: GraphView,
    H: GraphView<Vertex = M::Vertex>,
{
    let Some(motif_attrs) = motif.edge_attrs(mu1, mu2) else {
        return false;
    };
    let Some(host_attrs) = host.edge_attrs(hv1, hv2) else {
        return false;
    };
    motif_attrs.is_subset_of(host_attrs)
}

/// Memoizes the node-attribute predicate's result for `(motif_vertex,
/// host_vertex)` pairs for the lifetime of one search (§3, "Attribute-match
/// cache"). The predicate is pure and the cache is discarded with the
/// search, so no invalidation logic is needed.
pub struct AttributeMatchCache<V> {
    entries: HashMap<(V, V), Result<bool, PredicateError>>,
}

impl<V: Eq + std::hash::Hash + Clone> AttributeMatchCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached result for `(mu, hv)`, computing and storing it via
    /// `compute` on a miss.
    pub fn get_or_compute(
        &mut self,
        mu: &V,
        hv: &V,
        compute: impl FnOnce() -> Result<bool, PredicateError>,
    ) -> Result<bool, PredicateError> {
        if let Some(cached) = self.entries.get(&(mu.clone(), hv.clone())) {
            return cached.clone();
        }
        let result = compute();
        self.entries.insert((mu.clone(), hv.clone()), result.clone());
        result
    }
}

impl<V: Eq + std::hash::Hash + Clone> Default for AttributeMatchCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::attributes::AttributeBag;
    use crate::graph::AttributeGraph;

    fn vertex(attrs: &[(&str, &str)]) -> AttributeGraph<&'static str> {
        let mut g = AttributeGraph::new(true);
        let mut bag = AttributeBag::new();
        for (k, v) in attrs {
            bag.insert(*k, *v);
        }
        g.add_vertex("u", bag).expect("single vertex insert cannot collide");
        g
    }

    #[test]
    fn structural_match_checks_directed_degrees() {
        let mut motif: AttributeGraph<&'static str> = AttributeGraph::new(true);
        motif.add_vertex("m", AttributeBag::new()).expect("insert m");
        motif.add_vertex("n", AttributeBag::new()).expect("insert n");
        motif
            .add_edge(&"m", &"n", AttributeBag::new())
            .expect("edge m->n");

        let mut host: AttributeGraph<&'static str> = AttributeGraph::new(true);
        host.add_vertex("x", AttributeBag::new()).expect("insert x");
        host.add_vertex("y", AttributeBag::new()).expect("insert y");
        host.add_edge(&"x", &"y", AttributeBag::new()).expect("edge x->y");

        assert!(default_structural_match(&motif, &host, true, &"m", &"x"));
        assert!(!default_structural_match(&motif, &host, true, &"n", &"x"));
    }

    #[test]
    fn node_attr_match_ignores_unspecified_motif_attrs() {
        let motif = vertex(&[]);
        let host = vertex(&[("color", "red")]);
        assert!(default_node_attr_match(&motif, &host, &"u", &"u"));
    }

    #[test]
    fn node_attr_match_requires_present_attrs_to_match() {
        let motif = vertex(&[("color", "red")]);
        let host = vertex(&[("color", "blue")]);
        assert!(!default_node_attr_match(&motif, &host, &"u", &"u"));
    }

    #[test]
    fn cache_memoizes_and_returns_consistent_results() {
        let mut cache: AttributeMatchCache<&'static str> = AttributeMatchCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let result = cache.get_or_compute(&"m", &"x", || {
                calls += 1;
                Ok(true)
            });
            assert_eq!(result, Ok(true));
        }
        assert_eq!(calls, 1, "predicate should only run once per pair");
    }
}
