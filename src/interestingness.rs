//! Interestingness ordering (§4.3): a scalar priority per motif vertex used
//! to decide expansion order.

use std::collections::HashMap;
use std::hash::Hash;

use crate::graph::GraphView;

/// `I : Vm -> f64` of §3. Higher is "more interesting."
///
/// Ties are broken deterministically by the engine using `Ord` on the
/// vertex identifier itself, not by anything stored here.
pub type Interestingness<V> = HashMap<V, f64>;

/// The default interestingness: every motif vertex gets the same value, so
/// expansion order degenerates to motif vertex identifier order.
pub fn uniform_node_interestingness<M>(motif: &M) -> Interestingness<M::Vertex>
where
    M: GraphView,
    M::Vertex: Hash,
{
    motif.vertices().map(|v| (v, 1.0)).collect()
}

/// Picks the vertex of `candidates` with maximum interestingness, breaking
/// ties by `Ord` on the vertex identifier (lowest wins, for determinism).
///
/// Returns `None` if `candidates` is empty.
pub fn most_interesting<'a, V>(
    candidates: impl IntoIterator<Item = &'a V>,
    interestingness: &Interestingness<V>,
) -> Option<&'a V>
where
    V: Eq + Hash + Ord + 'a,
{
    candidates.into_iter().max_by(|a, b| {
        let score_a = interestingness.get(*a).copied().unwrap_or(0.0);
        let score_b = interestingness.get(*b).copied().unwrap_or(0.0);
        score_a
            .partial_cmp(&score_b)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.cmp(a))
    })
}
