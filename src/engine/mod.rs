//! The Search Engine (§4.5): seeds initial backbones, repeatedly pops one,
//! computes its extensions, and either re-enqueues them or emits a
//! completion. This module is the public boundary; [`state`] holds the
//! actual driver loop and [`iter`] adapts it to a pull-based `Iterator`.

mod iter;
mod state;

use std::fmt;

use crate::backbone::Backbone;
use crate::graph::GraphView;
use crate::interestingness::Interestingness;
use crate::predicates::{
    PredicateError, default_edge_attr_match, default_node_attr_match, default_structural_match,
};
use crate::queue::QueuePolicy;

pub use state::VertexBound;

/// Tunable knobs for one search, mirroring the keyword-argument surface of
/// `find_motifs`/`find_motifs_iter` (§6) as a single struct with a `Default`
/// impl, the way this codebase's merge pipeline exposes `MergeConfig`.
#[derive(Clone)]
pub struct SearchConfig<V> {
    /// Activates induced-isomorphism semantics (§4.5.2 step 4).
    ///
    /// Default: `false` (plain monomorphism).
    pub isomorphisms_only: bool,
    /// Which [`QueuePolicy`] drives expansion order.
    ///
    /// Default: `DepthFirst`, per §4.4's guidance that depth-first is
    /// strongly preferred for large host graphs.
    pub queue_policy: QueuePolicy,
    /// Caller-supplied seed backbones. Each is validated against the
    /// invariants of §3 before being enqueued; an invalid hint is dropped
    /// silently rather than rejected (see DESIGN.md, "Open Question
    /// Decisions", for why this implementation picked silent-drop).
    ///
    /// Default: empty, meaning the engine auto-seeds per §4.5.1.
    pub hints: Vec<Backbone<V>>,
    /// Stop after this many completions.
    ///
    /// Default: `None` (no limit). Ignored by the streaming entry point;
    /// the consumer decides when to stop pulling.
    pub limit: Option<usize>,
    /// Suppress mapping collection and return only a count.
    ///
    /// Default: `false`.
    pub count_only: bool,
    /// Overrides the directedness both graphs are treated as.
    ///
    /// Default: `None`, meaning infer from the motif and require the host
    /// to agree (§6). `Some(false)` on two directed graphs treats every
    /// edge as undirected without mutating either graph (P9).
    pub directed: Option<bool>,
    /// Per-motif-vertex expansion priority (§4.3).
    ///
    /// Default: `None`, meaning [`crate::interestingness::uniform_node_interestingness`].
    pub interestingness: Option<Interestingness<V>>,
}

impl<V> Default for SearchConfig<V> {
    fn default() -> Self {
        Self {
            isomorphisms_only: false,
            queue_policy: QueuePolicy::default(),
            hints: Vec::new(),
            limit: None,
            count_only: false,
            directed: None,
            interestingness: None,
        }
    }
}

/// The `list | int` return type of §6, realized as an enum since Rust has
/// no dynamically-typed return values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotifSearchResult<V> {
    /// One motif-vertex-to-host-vertex mapping per completion found.
    Mappings(Vec<Vec<(V, V)>>),
    /// The number of completions found, with mapping payloads discarded.
    Count(usize),
}

/// Errors that can terminate a search (§7). Exhaustion and hitting `limit`
/// are normal termination, not errors, and are not variants here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError<V> {
    /// The motif and host disagree on directedness and no override was
    /// given to resolve it (§6).
    InvalidInput(String),
    /// A user-supplied predicate returned `Err`. Carries a snapshot of the
    /// backbone being evaluated when the failure occurred.
    Predicate {
        backbone: Vec<(V, V)>,
        source: PredicateError,
    },
}

impl<V: fmt::Debug> fmt::Display for SearchError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Predicate { backbone, source } => {
                write!(f, "predicate failed on backbone {backbone:?}: {source}")
            }
        }
    }
}

impl<V: fmt::Debug> std::error::Error for SearchError<V> {}

/// Runs a search to completion using the default predicates of §4.2 and
/// collects or counts the results per `config.count_only`.
pub fn find_motifs<V, M, H>(
    motif: &M,
    host: &H,
    config: &SearchConfig<V>,
) -> Result<MotifSearchResult<V>, SearchError<V>>
where
    V: VertexBound,
    M: GraphView<Vertex = V>,
    H: GraphView<Vertex = V>,
{
    find_motifs_with_predicates(
        motif,
        host,
        config,
        default_structural_match,
        |m, h, mu, hv| Ok(default_node_attr_match(m, h, mu, hv)),
        |m, h, mu1, mu2, hv1, hv2| Ok(default_edge_attr_match(m, h, mu1, mu2, hv1, hv2)),
    )
}

/// Like [`find_motifs`] but with all three match predicates overridable
/// (`is_node_structural_match`, `is_node_attr_match`, `is_edge_attr_match`
/// of §6).
pub fn find_motifs_with_predicates<V, M, H, FS, FN, FE>(
    motif: &M,
    host: &H,
    config: &SearchConfig<V>,
    struct_match: FS,
    node_attr_match: FN,
    edge_attr_match: FE,
) -> Result<MotifSearchResult<V>, SearchError<V>>
where
    V: VertexBound,
    M: GraphView<Vertex = V>,
    H: GraphView<Vertex = V>,
    FS: Fn(&M, &H, bool, &V, &V) -> bool,
    FN: Fn(&M, &H, &V, &V) -> Result<bool, PredicateError>,
    FE: Fn(&M, &H, &V, &V, &V, &V) -> Result<bool, PredicateError>,
{
    let completions =
        find_motifs_iter_with_predicates(motif, host, config, struct_match, node_attr_match, edge_attr_match)?;

    if config.count_only {
        let mut count = 0usize;
        for completion in completions {
            completion?;
            count += 1;
            if config.limit.is_some_and(|limit| count >= limit) {
                break;
            }
        }
        Ok(MotifSearchResult::Count(count))
    } else {
        let mut mappings = Vec::new();
        for completion in completions {
            mappings.push(completion?.into_mapping());
            if config.limit.is_some_and(|limit| mappings.len() >= limit) {
                break;
            }
        }
        Ok(MotifSearchResult::Mappings(mappings))
    }
}

/// Returns a lazy sequence of completions (§4.5.5, "Stream mode"). `limit`
/// and `count_only` in `config` are ignored here; the consumer decides when
/// to stop pulling.
pub fn find_motifs_iter<'g, V, M, H>(
    motif: &'g M,
    host: &'g H,
    config: &SearchConfig<V>,
) -> Result<impl Iterator<Item = Result<Backbone<V>, SearchError<V>>> + 'g, SearchError<V>>
where
    V: VertexBound + 'g,
    M: GraphView<Vertex = V>,
    H: GraphView<Vertex = V>,
{
    find_motifs_iter_with_predicates(
        motif,
        host,
        config,
        default_structural_match,
        |m, h, mu, hv| Ok(default_node_attr_match(m, h, mu, hv)),
        |m, h, mu1, mu2, hv1, hv2| Ok(default_edge_attr_match(m, h, mu1, mu2, hv1, hv2)),
    )
}

/// Like [`find_motifs_iter`] but with all three match predicates overridable.
pub fn find_motifs_iter_with_predicates<'g, V, M, H, FS, FN, FE>(
    motif: &'g M,
    host: &'g H,
    config: &SearchConfig<V>,
    struct_match: FS,
    node_attr_match: FN,
    edge_attr_match: FE,
) -> Result<impl Iterator<Item = Result<Backbone<V>, SearchError<V>>> + 'g, SearchError<V>>
where
    V: VertexBound + 'g,
    M: GraphView<Vertex = V>,
    H: GraphView<Vertex = V>,
    FS: Fn(&M, &H, bool, &V, &V) -> bool + 'g,
    FN: Fn(&M, &H, &V, &V) -> Result<bool, PredicateError> + 'g,
    FE: Fn(&M, &H, &V, &V, &V, &V) -> Result<bool, PredicateError> + 'g,
{
    let state = state::SearchState::new(
        motif,
        host,
        config,
        struct_match,
        node_attr_match,
        edge_attr_match,
    )?;
    Ok(iter::MotifIter::new(state))
}
