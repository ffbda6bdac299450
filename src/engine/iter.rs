//! Adapts [`SearchState`] to a pull-based `Iterator`, the way this pack's
//! `petgraph` sibling wraps its subgraph-isomorphism driver in a
//! `GraphMatcher` whose `next()` repeatedly steps an internal state machine
//! until a match or exhaustion.

use super::SearchError;
use super::state::{SearchState, VertexBound};
use crate::backbone::Backbone;
use crate::graph::GraphView;
use crate::predicates::PredicateError;

pub(super) struct MotifIter<'g, V, M, H, FS, FN, FE> {
    state: SearchState<'g, V, M, H, FS, FN, FE>,
    poisoned: bool,
}

impl<'g, V, M, H, FS, FN, FE> MotifIter<'g, V, M, H, FS, FN, FE> {
    pub(super) fn new(state: SearchState<'g, V, M, H, FS, FN, FE>) -> Self {
        Self {
            state,
            poisoned: false,
        }
    }
}

impl<'g, V, M, H, FS, FN, FE> Iterator for MotifIter<'g, V, M, H, FS, FN, FE>
where
    V: VertexBound,
    M: GraphView<Vertex = V>,
    H: GraphView<Vertex = V>,
    FS: Fn(&M, &H, bool, &V, &V) -> bool,
    FN: Fn(&M, &H, &V, &V) -> Result<bool, PredicateError>,
    FE: Fn(&M, &H, &V, &V, &V, &V) -> Result<bool, PredicateError>,
{
    type Item = Result<Backbone<V>, SearchError<V>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }
        match self.state.advance() {
            Ok(Some(backbone)) => Some(Ok(backbone)),
            Ok(None) => None,
            Err(err) => {
                self.poisoned = true;
                Some(Err(err))
            }
        }
    }
}
