//! Subgraph monomorphism and induced-isomorphism search between a small
//! motif graph and a larger host graph (§1), via branch-and-bound over
//! partial vertex mappings.
//!
//! Entry points: [`find_motifs`] and [`find_motifs_iter`] for the default
//! predicates; `_with_predicates` variants for callers supplying their own.
//! [`GraphView`] decouples the engine from any one graph representation;
//! [`AttributeGraph`] is the `petgraph`-backed implementation provided for
//! callers without a graph type of their own.

pub mod attributes;
pub mod backbone;
pub mod engine;
pub mod graph;
pub mod interestingness;
pub mod predicates;
pub mod queue;

pub use attributes::{AttributeBag, AttributeValue};
pub use backbone::Backbone;
pub use engine::{
    MotifSearchResult, SearchConfig, SearchError, VertexBound, find_motifs, find_motifs_iter,
    find_motifs_iter_with_predicates, find_motifs_with_predicates,
};
pub use graph::{AttributeGraph, GraphBuildError, GraphView};
pub use interestingness::{Interestingness, most_interesting, uniform_node_interestingness};
pub use predicates::{
    AttributeMatchCache, PredicateError, default_edge_attr_match, default_node_attr_match,
    default_structural_match,
};
pub use queue::{BreadthFirstQueue, DepthFirstQueue, InstrumentedQueue, QueuePolicy, WorkQueue};
