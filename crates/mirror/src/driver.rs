//! Async run loop for hosts that live on a tokio current-thread runtime.
//!
//! The tree is `!Send`, so the driver is meant for `LocalSet` or
//! `current_thread` runtimes. It borrows the tree only for the duration of a
//! single [`MirrorTree::tick`] and never across an await point.

use std::cell::RefCell;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::tree::MirrorTree;

/// Shortest tick period; shorter requests, including zero, are raised to it.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Calls [`MirrorTree::tick`] every `period` until `cancel` fires.
///
/// Returns the number of ticks run.
pub async fn drive<N>(tree: &RefCell<MirrorTree<N>>, period: Duration, cancel: CancellationToken) -> u64 {
	let mut interval = time::interval(period.max(MIN_TICK_PERIOD));
	interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

	let mut ticks = 0u64;
	let mut committed = 0usize;
	loop {
		tokio::select! {
			biased;
			() = cancel.cancelled() => break,
			_ = interval.tick() => {}
		}
		let stats = tree.borrow_mut().tick(Instant::now().into_std());
		ticks += 1;
		committed += stats.committed;
	}

	debug!(ticks, committed, "mirror.driver.stopped");
	ticks
}
