//! Catalog of structural and caching invariants of the mirror tree.

#![allow(dead_code)]

/// - Depth Follows Parent: every attached node has `depth == parent.depth + 1`,
///   and every root sits at the configured root depth, after any sequence of
///   builds, appends, grafts, ungrafts and removals.
///   - Enforced in: `MirrorTree::set_depth`, called last by every structural operation
///   - Tested by: [`crate::invariants::test_depth_follows_parent`]
///   - Failure symptom: consumers indent or group nodes at the wrong level.
pub(crate) const DEPTH_FOLLOWS_PARENT: () = ();

/// - Graft Is Reversible: `graft(E, S)` followed by `ungraft(S)` restores the
///   previous shape, with every parent, child order and depth as before.
///   - Enforced in: [`crate::MirrorTree::graft`], [`crate::MirrorTree::ungraft`]
///   - Tested by: [`crate::invariants::test_graft_is_reversible`]
///   - Failure symptom: grouping nodes leak into the tree or siblings reorder.
pub(crate) const GRAFT_IS_REVERSIBLE: () = ();

/// - Lost Connection Is Sticky: once a node is flagged as disconnected it is
///   never resolved, rescheduled or committed again, and the flag never clears.
///   - Enforced in: `MirrorTree::observe`, `MirrorNode::mark_lost`
///   - Tested by: [`crate::invariants::test_lost_connection_is_sticky`]
///   - Failure symptom: a removed host node flickers back into view.
pub(crate) const LOST_CONNECTION_IS_STICKY: () = ();

/// - Cached Reads Are Whole Snapshots: a read returns properties from exactly
///   one committed snapshot, never a mix of an old and a pending one.
///   - Enforced in: `SnapshotStore::commit`
///   - Tested by: [`crate::invariants::test_cached_reads_are_whole_snapshots`]
///   - Failure symptom: width from one frame paired with height from another.
pub(crate) const CACHED_READS_ARE_WHOLE_SNAPSHOTS: () = ();
