//! Machine-checkable invariant catalog and proof entrypoints for the mirror tree.
#![allow(dead_code)]

pub(crate) mod catalog;

#[allow(unused_imports)]
pub(crate) use catalog::{
	CACHED_READS_ARE_WHOLE_SNAPSHOTS, DEPTH_FOLLOWS_PARENT, GRAFT_IS_REVERSIBLE, LOST_CONNECTION_IS_STICKY,
};

#[cfg(doc)]
pub(crate) fn test_depth_follows_parent() {}

#[cfg(doc)]
pub(crate) fn test_graft_is_reversible() {}

#[cfg(doc)]
pub(crate) fn test_lost_connection_is_sticky() {}

#[cfg(doc)]
pub(crate) fn test_cached_reads_are_whole_snapshots() {}

#[cfg(test)]
mod proofs;

#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use proofs::{
	test_cached_reads_are_whole_snapshots, test_depth_follows_parent, test_graft_is_reversible,
	test_lost_connection_is_sticky,
};
