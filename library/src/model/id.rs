//! Node identifiers and the generator that hands them out.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        NodeId(value)
    }
}

static GLOBAL_IDS: Lazy<IdGenerator> = Lazy::new(IdGenerator::new);

/// Monotonically increasing id source.
///
/// Cloning shares the underlying counter. A fresh generator starts at 1, so
/// every tree created with `MixTree::new` has its own id space; trees that
/// should allocate from one process-wide source use [`IdGenerator::global`].
#[derive(Clone, Debug)]
pub struct IdGenerator {
    next: Arc<AtomicU64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Handle to the process-wide counter.
    pub fn global() -> Self {
        GLOBAL_IDS.clone()
    }

    pub fn next_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure ids handed out later never collide with `id`.
    pub fn observe(&self, id: NodeId) {
        self.next.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }

    pub fn peek(&self) -> NodeId {
        NodeId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
