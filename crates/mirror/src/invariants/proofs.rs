//! Proofs for mirror tree invariants.

use std::rc::Rc;
use std::time::{Duration, Instant};

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::TestRunner;

use crate::builder::TreeBuilder;
use crate::config::MirrorConfig;
use crate::ids::{NodeId, NodeIdentity};
use crate::live::{LiveHandle, LiveId};
use crate::snapshot::{Issue, NodeSnapshot, PropertyKey, PropertyValue};
use crate::test_support::{FakeNode, extractor};
use crate::tree::MirrorTree;

/// Live tree where node `i + 1` hangs under node `parents[i] % (i + 1)`.
fn random_live(parents: &[usize]) -> Vec<Rc<FakeNode>> {
	let mut live = vec![FakeNode::new(0, "Root")];
	for (i, pick) in parents.iter().enumerate() {
		let parent = Rc::clone(&live[pick % (i + 1)]);
		live.push(parent.add_child(FakeNode::new(i as u64 + 1, "Node")));
	}
	live
}

type Shape = Vec<(NodeIdentity, i32, Option<NodeIdentity>)>;

fn shape(tree: &MirrorTree<FakeNode>) -> Shape {
	tree.walk()
		.filter_map(|id| {
			let parent = tree.parent(id).and_then(|p| tree.identity(p));
			Some((tree.identity(id)?, tree.depth(id)?, parent))
		})
		.collect()
}

fn depths_follow_parents(tree: &MirrorTree<FakeNode>) -> bool {
	tree.walk().all(|id| {
		let expected = tree.parent(id).and_then(|p| tree.depth(p)).map_or(tree.config().root_depth, |d| d + 1);
		tree.depth(id) == Some(expected)
	})
}

/// Random grafts and ungrafts over random trees keep every depth in step with its parent.
#[cfg_attr(test, test)]
pub(crate) fn test_depth_follows_parent() {
	let mut runner = TestRunner::default();
	let strategy = (vec(any::<usize>(), 0..24), vec((any::<usize>(), any::<bool>()), 0..32), -3i32..4);
	runner
		.run(&strategy, |(parents, ops, root_depth)| {
			let now = Instant::now();
			let live = random_live(&parents);
			let config = MirrorConfig {
				root_depth,
				..MirrorConfig::default()
			};
			let mut tree = TreeBuilder::new(config, extractor()).build(&[LiveHandle::new(&live[0])], now);
			prop_assert!(depths_follow_parents(&tree));

			let mut synthetics: Vec<NodeId> = Vec::new();
			for (pick, graft) in ops {
				if graft || synthetics.is_empty() {
					let attached: Vec<NodeId> = tree.walk().collect();
					let target = attached[pick % attached.len()];
					let s = tree.create_synthetic(NodeSnapshot::new("Group"), now);
					prop_assert!(tree.graft(target, s).is_ok());
					synthetics.push(s);
				} else {
					let s = synthetics.remove(pick % synthetics.len());
					prop_assert!(tree.ungraft(s).is_ok());
				}
				prop_assert_eq!(tree.verify_structure(), Ok(()));
				prop_assert!(depths_follow_parents(&tree));
			}
			Ok(())
		})
		.unwrap();
}

/// Ungrafting every synthetic node, in any order, restores the original shape.
#[cfg_attr(test, test)]
pub(crate) fn test_graft_is_reversible() {
	let mut runner = TestRunner::default();
	let strategy = (vec(any::<usize>(), 0..16), vec(any::<usize>(), 1..12), any::<bool>());
	runner
		.run(&strategy, |(parents, picks, reverse)| {
			let now = Instant::now();
			let live = random_live(&parents);
			let mut tree =
				TreeBuilder::new(MirrorConfig::default(), extractor()).build(&[LiveHandle::new(&live[0])], now);
			let before = shape(&tree);

			let mut synthetics = Vec::new();
			for pick in picks {
				let attached: Vec<NodeId> = tree.walk().collect();
				let s = tree.create_synthetic(NodeSnapshot::new("Group"), now);
				prop_assert!(tree.graft(attached[pick % attached.len()], s).is_ok());
				synthetics.push(s);
			}
			if reverse {
				synthetics.reverse();
			}
			for s in synthetics {
				prop_assert!(tree.ungraft(s).is_ok());
			}

			prop_assert_eq!(shape(&tree), before);
			prop_assert_eq!(tree.len(), parents.len() + 1);
			Ok(())
		})
		.unwrap();
}

/// A node flagged as lost keeps its flag and its last value, whether the
/// flag came from a read after the live node vanished or was set while the
/// live node is still reachable and changes.
#[cfg_attr(test, test)]
pub(crate) fn test_lost_connection_is_sticky() {
	let start = Instant::now();
	let root = FakeNode::new(1, "Window");
	root.add_child(FakeNode::new(2, "Label").with_property("text", "old"));
	let mut tree = TreeBuilder::new(MirrorConfig::default(), extractor()).build(&[LiveHandle::new(&root)], start);
	let label = tree.find(&NodeIdentity::Live(LiveId(2))).unwrap();
	let key = PropertyKey::from("text");

	drop(root.take_child(2));
	let first = start + Duration::from_millis(150);
	assert_eq!(tree.property(label, &key, first), Some(&PropertyValue::from("old")));
	assert!(tree.node(label).unwrap().is_lost_connection());

	for ms in [160, 400, 2_000] {
		let now = start + Duration::from_millis(ms);
		assert_eq!(tree.property(label, &key, now), Some(&PropertyValue::from("old")));
		assert!(tree.issues(label, now).unwrap().contains(&Issue::LostConnection));
		assert_eq!(tree.pending_count(), 0);
		assert_eq!(tree.tick(now).fired, 0);
		assert!(tree.node(label).unwrap().is_lost_connection());
	}
	assert_eq!(tree.probe_connection(label), Some(true));
	assert_eq!(tree.lost_connections().collect::<Vec<_>>(), vec![NodeIdentity::Live(LiveId(2))]);

	sticky_after_mark_lost();
}

fn sticky_after_mark_lost() {
	let start = Instant::now();
	let root = FakeNode::new(1, "Window").with_property("title", "Main");
	let mut tree = TreeBuilder::new(MirrorConfig::default(), extractor()).build(&[LiveHandle::new(&root)], start);
	let id = tree.find(&NodeIdentity::Live(LiveId(1))).unwrap();
	let key = PropertyKey::from("title");

	assert!(tree.node_mut(id).unwrap().mark_lost());
	assert!(!tree.node_mut(id).unwrap().mark_lost());
	root.set_property("title", "Changed");

	for ms in [150, 300, 1_000] {
		let now = start + Duration::from_millis(ms);
		assert_eq!(tree.property(id, &key, now), Some(&PropertyValue::from("Main")));
		assert_eq!(tree.pending_count(), 0);
		assert_eq!(tree.tick(now).fired, 0);
	}
	assert_eq!(tree.probe_connection(id), Some(true));
	assert!(tree.node(id).unwrap().is_lost_connection());
	assert_eq!(tree.lost_connections().count(), 1);
}

/// Reads between scheduling and commit see the old snapshot in full; after
/// the commit they see the new one in full.
#[cfg_attr(test, test)]
pub(crate) fn test_cached_reads_are_whole_snapshots() {
	let start = Instant::now();
	let at = |ms| start + Duration::from_millis(ms);
	let root = FakeNode::new(1, "Panel").with_property("width", 10i64).with_property("height", 20i64);
	let mut tree = TreeBuilder::new(MirrorConfig::default(), extractor()).build(&[LiveHandle::new(&root)], start);
	let id = tree.roots()[0];
	let (width, height) = (PropertyKey::from("width"), PropertyKey::from("height"));

	root.set_property("width", 11i64);
	assert_eq!(tree.property(id, &width, at(150)).cloned(), Some(PropertyValue::Int(10)));
	root.set_property("height", 21i64);
	assert_eq!(tree.property(id, &height, at(160)).cloned(), Some(PropertyValue::Int(20)));

	let old = tree.snapshot(id, at(170)).cloned().unwrap();
	assert_eq!((old.property(&width), old.property(&height)), (&PropertyValue::Int(10), &PropertyValue::Int(20)));

	assert_eq!(tree.tick(at(180)).committed, 1);
	let new = tree.snapshot(id, at(181)).cloned().unwrap();
	assert_eq!((new.property(&width), new.property(&height)), (&PropertyValue::Int(11), &PropertyValue::Int(21)));
}
