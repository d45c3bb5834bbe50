//! Shadow tree over an externally owned live node tree.
//!
//! [`TreeBuilder`] mirrors live roots into a [`MirrorTree`] of owned
//! [`MirrorNode`]s. Each node caches snapshots of its live counterpart with a
//! TTL; accessors return the cache immediately and schedule a debounced
//! re-extraction when the live value has moved, which the host commits by
//! calling [`MirrorTree::tick`] from its event loop (or through [`driver`]).
//! Synthetic grouping nodes can be grafted between a node and its parent.

/// Builds mirror trees from live roots.
pub mod builder;
/// Configuration loaded from TOML.
pub mod config;
/// Async tick loop for tokio current-thread runtimes.
pub mod driver;
/// Synthetic node creation, graft and ungraft.
pub mod graft;
/// Arena keys and stable node identities.
pub mod ids;
mod invariants;
/// Non-owning handles to host nodes.
pub mod live;
/// The mirror node type.
pub mod node;
/// Snapshot, property and issue types.
pub mod snapshot;
/// Arena-backed tree, accessors and run loop.
pub mod tree;
/// Structural consistency checks.
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::TreeBuilder;
pub use config::{ConfigError, MirrorConfig};
pub use graft::{GraftError, GraftOutcome, GraftResult};
pub use ids::{NodeId, NodeIdentity};
pub use live::{LiveHandle, LiveId, LiveNode};
pub use node::{MirrorNode, NodeOrigin};
pub use snapshot::{Extractor, Issue, IssueSet, NodeSnapshot, PropertyKey, PropertyValue};
pub use tree::{Ancestors, MirrorTree, PreOrder, TickStats};
pub use verify::StructuralViolation;
