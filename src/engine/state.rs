//! The driver loop shared by list mode and stream mode: seed, then
//! repeatedly pop-and-expand until a completion surfaces or the queue is
//! empty. Mirrors this codebase's explicit-stack traversal style (see
//! `all_paths`'s `Frame` stack) in spirit, but drives a [`WorkQueue`]
//! instead of an explicit call stack, since the queue's own policy (not a
//! fixed DFS/BFS choice) determines traversal order here.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use super::{SearchConfig, SearchError};
use crate::backbone::Backbone;
use crate::graph::GraphView;
use crate::interestingness::{Interestingness, most_interesting, uniform_node_interestingness};
use crate::predicates::{AttributeMatchCache, PredicateError};
use crate::queue::WorkQueue;

/// Vertex identifier requirements used throughout the engine: hashable and
/// totally ordered (deterministic tie-break, §4.3), cheap to clone
/// (backbones copy vertices on every branch), and `'static` because the
/// queue's `Box<dyn WorkQueue<_>>` needs it.
pub trait VertexBound: Clone + Eq + Hash + Ord + fmt::Debug + 'static {}
impl<T: Clone + Eq + Hash + Ord + fmt::Debug + 'static> VertexBound for T {}

fn intersect_or_init<V: Eq + Hash + Clone>(existing: Option<HashSet<V>>, new_set: HashSet<V>) -> HashSet<V> {
    match existing {
        None => new_set,
        Some(current) => current.intersection(&new_set).cloned().collect(),
    }
}

pub struct SearchState<'g, V, M, H, FS, FN, FE> {
    motif: &'g M,
    host: &'g H,
    effective_directed: bool,
    isomorphisms_only: bool,
    interestingness: Interestingness<V>,
    queue: Box<dyn WorkQueue<Backbone<V>>>,
    cache: AttributeMatchCache<V>,
    struct_match: FS,
    node_attr_match: FN,
    edge_attr_match: FE,
    motif_vertices: Vec<V>,
}

impl<'g, V, M, H, FS, FN, FE> SearchState<'g, V, M, H, FS, FN, FE>
where
    V: VertexBound,
    M: GraphView<Vertex = V>,
    H: GraphView<Vertex = V>,
    FS: Fn(&M, &H, bool, &V, &V) -> bool,
    FN: Fn(&M, &H, &V, &V) -> Result<bool, PredicateError>,
    FE: Fn(&M, &H, &V, &V, &V, &V) -> Result<bool, PredicateError>,
{
    pub fn new(
        motif: &'g M,
        host: &'g H,
        config: &SearchConfig<V>,
        struct_match: FS,
        node_attr_match: FN,
        edge_attr_match: FE,
    ) -> Result<Self, SearchError<V>> {
        let effective_directed = match config.directed {
            Some(directed) => directed,
            None => {
                if motif.is_directed() != host.is_directed() {
                    return Err(SearchError::InvalidInput(format!(
                        "motif is_directed={} disagrees with host is_directed={}; pass `directed` to override",
                        motif.is_directed(),
                        host.is_directed()
                    )));
                }
                motif.is_directed()
            }
        };

        let interestingness = config
            .interestingness
            .clone()
            .unwrap_or_else(|| uniform_node_interestingness(motif));

        let mut motif_vertices: Vec<V> = motif.vertices().collect();
        motif_vertices.sort();

        let mut state = Self {
            motif,
            host,
            effective_directed,
            isomorphisms_only: config.isomorphisms_only,
            interestingness,
            queue: config.queue_policy.build(),
            cache: AttributeMatchCache::new(),
            struct_match,
            node_attr_match,
            edge_attr_match,
            motif_vertices,
        };

        if config.hints.is_empty() {
            state.seed_default()?;
        } else {
            state.seed_from_hints(&config.hints)?;
        }

        Ok(state)
    }

    /// Pops and expands backbones until a completion surfaces or the queue
    /// empties. Returns `Ok(None)` on exhaustion (§4.5.3), never an error for
    /// normal termination.
    pub fn advance(&mut self) -> Result<Option<Backbone<V>>, SearchError<V>> {
        loop {
            let Some(backbone) = self.queue.pop() else {
                return Ok(None);
            };
            if backbone.len() == self.motif_vertices.len() {
                return Ok(Some(backbone));
            }
            self.expand(backbone)?;
        }
    }

    fn motif_adjacent_any_direction(&self, a: &V, b: &V) -> bool {
        self.motif.has_edge(a, b) || self.motif.has_edge(b, a)
    }

    /// Whether the host has an edge between `a`/`b` in either direction.
    ///
    /// Used by the undirected branches below instead of a bare
    /// `self.host.has_edge(a, b)`: `GraphView::has_edge` only symmetrizes
    /// when the adapter's own *native* directedness is `false`, not when
    /// `effective_directed` overrides a natively-directed graph to be
    /// treated as undirected. Mirrors how `candidate_hosts` unions
    /// `neighbors_out`/`neighbors_in` itself rather than trusting the
    /// adapter's native flag.
    fn host_adjacent_any_direction(&self, a: &V, b: &V) -> bool {
        self.host.has_edge(a, b) || self.host.has_edge(b, a)
    }

    fn seed_default(&mut self) -> Result<(), SearchError<V>> {
        let Some(m1) = most_interesting(self.motif_vertices.iter(), &self.interestingness).cloned()
        else {
            return Ok(());
        };
        for x in self.host.vertices() {
            if !(self.struct_match)(self.motif, self.host, self.effective_directed, &m1, &x) {
                continue;
            }
            let ok = self
                .cache
                .get_or_compute(&m1, &x, || (self.node_attr_match)(self.motif, self.host, &m1, &x))
                .map_err(|source| SearchError::Predicate {
                    backbone: vec![],
                    source,
                })?;
            if ok {
                self.queue.push(Backbone::singleton(m1.clone(), x));
            }
        }
        Ok(())
    }

    fn seed_from_hints(&mut self, hints: &[Backbone<V>]) -> Result<(), SearchError<V>> {
        for hint in hints {
            if self.validate_hint(hint)? {
                self.queue.push(hint.clone());
            }
            // An invalid hint is dropped silently rather than rejected; see
            // DESIGN.md, "Open Question Decisions".
        }
        Ok(())
    }

    /// Checks a caller-supplied hint against every invariant of §3:
    /// injective, locally consistent (including the induced-isomorphism
    /// extra filter when enabled), and attribute-consistent.
    fn validate_hint(&mut self, hint: &Backbone<V>) -> Result<bool, SearchError<V>> {
        let mut seen_hosts = HashSet::new();
        for (_, hv) in hint.pairs() {
            if !seen_hosts.insert(hv.clone()) {
                return Ok(false);
            }
        }

        let pairs: Vec<(&V, &V)> = hint.pairs().collect();
        for (i, &(mu_i, hv_i)) in pairs.iter().enumerate() {
            let attr_ok = self
                .cache
                .get_or_compute(mu_i, hv_i, || {
                    (self.node_attr_match)(self.motif, self.host, mu_i, hv_i)
                })
                .map_err(|source| SearchError::Predicate {
                    backbone: hint.clone().into_mapping(),
                    source,
                })?;
            if !attr_ok {
                return Ok(false);
            }

            for &(mu_j, hv_j) in &pairs[i + 1..] {
                if !self.edges_locally_consistent(mu_i, mu_j, hv_i, hv_j) {
                    return Ok(false);
                }
                if self.isomorphisms_only && !self.induced_non_edge_consistent(mu_i, mu_j, hv_i, hv_j) {
                    return Ok(false);
                }
                let edge_attrs_ok = self
                    .edge_predicate_ok(mu_i, mu_j, hv_i, hv_j)
                    .map_err(|source| SearchError::Predicate {
                        backbone: hint.clone().into_mapping(),
                        source,
                    })?;
                if !edge_attrs_ok {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Every motif edge between `mu_a` and `mu_b` (in whichever direction(s)
    /// it exists) must have a corresponding host edge between `hv_a`/`hv_b`.
    fn edges_locally_consistent(&self, mu_a: &V, mu_b: &V, hv_a: &V, hv_b: &V) -> bool {
        if self.effective_directed {
            if self.motif.has_edge(mu_a, mu_b) && !self.host.has_edge(hv_a, hv_b) {
                return false;
            }
            if self.motif.has_edge(mu_b, mu_a) && !self.host.has_edge(hv_b, hv_a) {
                return false;
            }
            true
        } else {
            !self.motif_adjacent_any_direction(mu_a, mu_b) || self.host_adjacent_any_direction(hv_a, hv_b)
        }
    }

    /// Induced-isomorphism extra filter (§4.5.2 step 4): a motif
    /// non-edge between two mapped vertices forbids the corresponding host
    /// edge, checked per direction when directed.
    fn induced_non_edge_consistent(&self, mu_a: &V, mu_b: &V, hv_a: &V, hv_b: &V) -> bool {
        if self.effective_directed {
            if !self.motif.has_edge(mu_a, mu_b) && self.host.has_edge(hv_a, hv_b) {
                return false;
            }
            if !self.motif.has_edge(mu_b, mu_a) && self.host.has_edge(hv_b, hv_a) {
                return false;
            }
            true
        } else {
            self.motif_adjacent_any_direction(mu_a, mu_b) || !self.host_adjacent_any_direction(hv_a, hv_b)
        }
    }

    /// Applies the user edge-attribute predicate to whichever direction(s)
    /// a motif edge between `mu_a`/`mu_b` actually exists in. Does not
    /// re-verify existence (callers that need that check call
    /// [`Self::edges_locally_consistent`] separately).
    ///
    /// In the undirected branch, the host's stored edge may be in either
    /// order regardless of which order the motif's own edge was found in
    /// (the same native-vs-effective directedness gap `host_adjacent_any_direction`
    /// guards against), so both `(hv_a, hv_b)` and `(hv_b, hv_a)` are tried
    /// and either satisfying the predicate is accepted.
    fn edge_predicate_ok(&self, mu_a: &V, mu_b: &V, hv_a: &V, hv_b: &V) -> Result<bool, PredicateError> {
        let mut ok = true;
        if self.effective_directed {
            if self.motif.has_edge(mu_a, mu_b) {
                ok &= (self.edge_attr_match)(self.motif, self.host, mu_a, mu_b, hv_a, hv_b)?;
            }
            if self.motif.has_edge(mu_b, mu_a) {
                ok &= (self.edge_attr_match)(self.motif, self.host, mu_b, mu_a, hv_b, hv_a)?;
            }
        } else if self.motif_adjacent_any_direction(mu_a, mu_b) {
            let (motif_u, motif_v) = if self.motif.edge_attrs(mu_a, mu_b).is_some() {
                (mu_a, mu_b)
            } else {
                (mu_b, mu_a)
            };
            let forward = (self.edge_attr_match)(self.motif, self.host, motif_u, motif_v, hv_a, hv_b)?;
            let backward = (self.edge_attr_match)(self.motif, self.host, motif_u, motif_v, hv_b, hv_a)?;
            ok &= forward || backward;
        }
        Ok(ok)
    }

    /// Selection rule of §4.5.2 step 2: the most interesting unmapped motif
    /// vertex adjacent to the mapped set, falling back to the most
    /// interesting unmapped vertex globally when no such neighbor exists.
    fn choose_next_vertex(&self, backbone: &Backbone<V>) -> Option<V> {
        let adjacent_unmapped: Vec<&V> = self
            .motif_vertices
            .iter()
            .filter(|v| !backbone.domain_contains(v))
            .filter(|v| {
                backbone
                    .domain()
                    .any(|mapped| self.motif_adjacent_any_direction(mapped, v))
            })
            .collect();

        if let Some(choice) = most_interesting(adjacent_unmapped, &self.interestingness) {
            return Some(choice.clone());
        }

        let all_unmapped: Vec<&V> = self
            .motif_vertices
            .iter()
            .filter(|v| !backbone.domain_contains(v))
            .collect();
        most_interesting(all_unmapped, &self.interestingness).cloned()
    }

    /// Candidate host vertex set of §4.5.2 step 3, before the filters of
    /// step 4 are applied.
    fn candidate_hosts(&self, backbone: &Backbone<V>, m_next: &V) -> Vec<V> {
        let mut candidates: Option<HashSet<V>> = None;
        for (mu_k, hv_k) in backbone.pairs() {
            if self.effective_directed {
                if self.motif.has_edge(m_next, mu_k) {
                    let set: HashSet<V> = self.host.neighbors_in(hv_k).collect();
                    candidates = Some(intersect_or_init(candidates, set));
                }
                if self.motif.has_edge(mu_k, m_next) {
                    let set: HashSet<V> = self.host.neighbors_out(hv_k).collect();
                    candidates = Some(intersect_or_init(candidates, set));
                }
            } else if self.motif_adjacent_any_direction(m_next, mu_k) {
                let set: HashSet<V> = self
                    .host
                    .neighbors_out(hv_k)
                    .chain(self.host.neighbors_in(hv_k))
                    .collect();
                candidates = Some(intersect_or_init(candidates, set));
            }
        }
        match candidates {
            Some(set) => set.into_iter().collect(),
            None => self.host.vertices().collect(),
        }
    }

    /// The extension step of §4.5.2: expands one popped (incomplete)
    /// backbone, pushing every surviving candidate extension.
    fn expand(&mut self, backbone: Backbone<V>) -> Result<(), SearchError<V>> {
        let Some(m_next) = self.choose_next_vertex(&backbone) else {
            // Unreachable in practice: `advance` only calls `expand` when
            // `backbone.len() < motif_vertices.len()`, so an unmapped
            // vertex always exists.
            return Ok(());
        };

        for hv in self.candidate_hosts(&backbone, &m_next) {
            if backbone.image_contains(&hv) {
                continue;
            }
            if !(self.struct_match)(self.motif, self.host, self.effective_directed, &m_next, &hv) {
                continue;
            }
            let attr_ok = self
                .cache
                .get_or_compute(&m_next, &hv, || {
                    (self.node_attr_match)(self.motif, self.host, &m_next, &hv)
                })
                .map_err(|source| SearchError::Predicate {
                    backbone: backbone.clone().into_mapping(),
                    source,
                })?;
            if !attr_ok {
                continue;
            }

            if self.extension_rejected(&backbone, &m_next, &hv)? {
                continue;
            }

            self.queue.push(backbone.extended(m_next.clone(), hv));
        }
        Ok(())
    }

    fn extension_rejected(&self, backbone: &Backbone<V>, m_next: &V, hv: &V) -> Result<bool, SearchError<V>> {
        for (mu_k, hv_k) in backbone.pairs() {
            let edge_ok = self
                .edge_predicate_ok(mu_k, m_next, hv_k, hv)
                .map_err(|source| SearchError::Predicate {
                    backbone: backbone.clone().into_mapping(),
                    source,
                })?;
            if !edge_ok {
                return Ok(true);
            }
            if self.isomorphisms_only && !self.induced_non_edge_consistent(mu_k, m_next, hv_k, hv) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
