//! Multimap policy.
//!
//! An RS that maps to several places in the same assembly (map weight > 1) is
//! a signal of a low quality variant. Such RS never take part in a merge, and
//! submitted variants are never clustered into them; those submitted variants
//! stay unclustered instead.
//!
//! The map weight is the only definition used. Counting how many loci an
//! accession has in an assembly is not equivalent: `1:1000:A:T` and
//! `1:1000:A:G` can coexist under one RS without it being a multimap.

use crate::models::{ClusteredVariant, ClusteredVariantEntity};

/// Anything that carries a map weight.
pub trait MapWeighted {
    fn map_weight(&self) -> Option<u32>;
}

impl MapWeighted for ClusteredVariant {
    fn map_weight(&self) -> Option<u32> {
        self.map_weight
    }
}

impl MapWeighted for ClusteredVariantEntity {
    fn map_weight(&self) -> Option<u32> {
        self.variant.map_weight
    }
}

impl<T: MapWeighted> MapWeighted for &T {
    fn map_weight(&self) -> Option<u32> {
        (*self).map_weight()
    }
}

/// True iff any of `variants` has a map weight above one.
pub fn is_multimap<I>(variants: I) -> bool
where
    I: IntoIterator,
    I::Item: MapWeighted,
{
    variants
        .into_iter()
        .any(|v| v.map_weight().is_some_and(|weight| weight > 1))
}
