//! The compact backbone representation (§9, "Backbone representation").
//!
//! Backbones are copied on every branch of the search, so each one is a flat
//! sorted array of `(motif_vertex, host_vertex)` pairs rather than a hash
//! map — motifs are small, and a `SmallVec` keeps the common case
//! (single-digit motif sizes) entirely on the stack. `smallvec` is not part
//! of this lineage's own dependency stack, but is the same tool this
//! pack's search-engine sibling reaches for to avoid heap allocation on
//! small, frequently-copied collections.

use std::fmt;

use smallvec::SmallVec;

/// Inline capacity before a [`Backbone`] spills to the heap. Chosen to cover
/// the motif sizes in the worked scenarios (§8) without over-provisioning.
const INLINE_CAPACITY: usize = 8;

/// A partial injective mapping from motif vertices to host vertices (§3).
///
/// Pairs are kept sorted by motif vertex so that [`Backbone::get`] can use
/// binary search; `domain()` therefore also yields vertices in sorted order.
#[derive(Clone, PartialEq, Eq)]
pub struct Backbone<V> {
    pairs: SmallVec<[(V, V); INLINE_CAPACITY]>,
}

impl<V: fmt::Debug> fmt::Debug for Backbone<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.pairs.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl<V: Ord + Clone> Backbone<V> {
    pub fn empty() -> Self {
        Self {
            pairs: SmallVec::new(),
        }
    }

    /// A size-1 backbone, the common case for an auto-generated seed.
    pub fn singleton(mu: V, hv: V) -> Self {
        let mut pairs = SmallVec::new();
        pairs.push((mu, hv));
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn position(&self, mu: &V) -> Result<usize, usize> {
        self.pairs.binary_search_by(|(k, _)| k.cmp(mu))
    }

    pub fn get(&self, mu: &V) -> Option<&V> {
        self.position(mu).ok().map(|i| &self.pairs[i].1)
    }

    pub fn domain_contains(&self, mu: &V) -> bool {
        self.position(mu).is_ok()
    }

    pub fn image_contains(&self, hv: &V) -> bool {
        self.pairs.iter().any(|(_, v)| v == hv)
    }

    /// Returns a new backbone extending `self` with `mu -> hv`.
    ///
    /// The caller is responsible for ensuring `mu` is not already mapped and
    /// `hv` is not already in the image (the engine checks both before
    /// calling this, per §4.5.2 step 4's injectivity filter).
    pub fn extended(&self, mu: V, hv: V) -> Self {
        let insert_at = match self.position(&mu) {
            Ok(existing) => existing,
            Err(insert_at) => insert_at,
        };
        let mut pairs = self.pairs.clone();
        pairs.insert(insert_at, (mu, hv));
        Self { pairs }
    }

    pub fn domain(&self) -> impl Iterator<Item = &V> {
        self.pairs.iter().map(|(k, _)| k)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&V, &V)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }

    /// Converts a completed backbone into the mapping returned to callers.
    pub fn into_mapping(self) -> Vec<(V, V)> {
        self.pairs.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_has_one_pair() {
        let b = Backbone::singleton(1, 10);
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(&1), Some(&10));
    }

    #[test]
    fn extended_preserves_sort_order() {
        let b = Backbone::empty().extended(3, 30).extended(1, 10).extended(2, 20);
        let domain: Vec<_> = b.domain().copied().collect();
        assert_eq!(domain, vec![1, 2, 3]);
    }

    #[test]
    fn image_contains_detects_reused_host_vertex() {
        let b = Backbone::singleton(1, 10);
        assert!(b.image_contains(&10));
        assert!(!b.image_contains(&20));
    }

    #[test]
    fn extended_does_not_mutate_original() {
        let base = Backbone::singleton(1, 10);
        let grown = base.extended(2, 20);
        assert_eq!(base.len(), 1);
        assert_eq!(grown.len(), 2);
    }
}
