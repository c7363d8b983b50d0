use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use membrane_core::id::{GraphName, ObjectId};
use membrane_core::{LogLevel, ObjectRef, Result, WeakObjectRef};
use tracing::trace;

/// Key of the forward direction: one wrapper per source per ordered pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ForwardKey {
    source_graph: GraphName,
    destination_graph: GraphName,
    source: ObjectId,
}

/// Where a wrapper came from.
#[derive(Debug, Clone)]
pub struct Provenance {
    /// The graph the wrapped value originates from.
    pub origin: GraphName,
    /// The graph the wrapper lives in.
    pub destination: GraphName,
    source: WeakObjectRef,
    wrapper: WeakObjectRef,
}

impl Provenance {
    /// The wrapped value, if it is still alive.
    pub fn source(&self) -> Option<ObjectRef> {
        self.source.upgrade()
    }

    fn is_alive(&self) -> bool {
        self.source.is_alive() && self.wrapper.is_alive()
    }
}

/// Origin record of a value that has been wrapped at least once.
#[derive(Debug, Clone)]
struct SourceEntry {
    origin: GraphName,
    source: WeakObjectRef,
}

/// Identity-preserving association between values and their wrappers.
///
/// Both directions hold only weak references, so the map never keeps a
/// value or a wrapper alive. Stale entries are swept by [`IdentityMap::prune`],
/// which also runs automatically every `prune_interval` registrations.
#[derive(Debug)]
pub struct IdentityMap {
    /// (source graph, destination graph, source id) to wrapper
    forward: DashMap<ForwardKey, WeakObjectRef>,

    /// Wrapper id to provenance
    inverse: DashMap<ObjectId, Provenance>,

    /// Source id to origin graph
    sources: DashMap<ObjectId, SourceEntry>,

    /// Registrations since creation
    registrations: AtomicUsize,

    prune_interval: usize,

    /// Minimum level for sweep events
    log_level: LogLevel,
}

impl IdentityMap {
    /// Create an empty map. A `prune_interval` of zero disables automatic
    /// sweeps.
    pub fn new(prune_interval: usize) -> Self {
        Self {
            forward: DashMap::new(),
            inverse: DashMap::new(),
            sources: DashMap::new(),
            registrations: AtomicUsize::new(0),
            prune_interval,
            log_level: LogLevel::default(),
        }
    }

    /// Emit sweep events only at `level` or above.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Return the live wrapper of `source` for the given pair, or build one
    /// with `factory` and register it in both directions.
    ///
    /// No map lock is held while `factory` runs. If two threads race, the
    /// first registration wins and the loser's wrapper is discarded.
    pub fn get_or_create<F>(
        &self,
        source_graph: &GraphName,
        destination_graph: &GraphName,
        source: &ObjectRef,
        factory: F,
    ) -> Result<ObjectRef>
    where
        F: FnOnce() -> Result<ObjectRef>,
    {
        if let Some(existing) = self.lookup(source_graph, destination_graph, source) {
            return Ok(existing);
        }

        let wrapper = factory()?;

        // Provenance is published before the forward entry, so a wrapper
        // reachable through the forward entry is always recognised.
        self.sources.insert(
            source.id(),
            SourceEntry {
                origin: source_graph.clone(),
                source: source.downgrade(),
            },
        );
        self.inverse.insert(
            wrapper.id(),
            Provenance {
                origin: source_graph.clone(),
                destination: destination_graph.clone(),
                source: source.downgrade(),
                wrapper: wrapper.downgrade(),
            },
        );

        let key = ForwardKey {
            source_graph: source_graph.clone(),
            destination_graph: destination_graph.clone(),
            source: source.id(),
        };
        let winner = match self.forward.entry(key) {
            Entry::Occupied(mut entry) => match entry.get().upgrade() {
                Some(existing) => Some(existing),
                None => {
                    entry.insert(wrapper.downgrade());
                    None
                }
            },
            Entry::Vacant(entry) => {
                entry.insert(wrapper.downgrade());
                None
            }
        };
        if let Some(existing) = winner {
            self.inverse.remove(&wrapper.id());
            return Ok(existing);
        }

        let count = self.registrations.fetch_add(1, Ordering::Relaxed) + 1;
        if self.prune_interval > 0 && count % self.prune_interval == 0 {
            self.prune();
        }

        Ok(wrapper)
    }

    /// The existing wrapper of `source` for the given pair, without
    /// creating one.
    pub fn lookup(
        &self,
        source_graph: &GraphName,
        destination_graph: &GraphName,
        source: &ObjectRef,
    ) -> Option<ObjectRef> {
        let key = ForwardKey {
            source_graph: source_graph.clone(),
            destination_graph: destination_graph.clone(),
            source: source.id(),
        };
        self.forward.get(&key).and_then(|entry| entry.value().upgrade())
    }

    /// The origin graph and source of a wrapper registered here.
    pub fn unwrap(&self, wrapper: &ObjectRef) -> Option<(GraphName, ObjectRef)> {
        let provenance = self.provenance(wrapper)?;
        let source = provenance.source()?;
        Some((provenance.origin, source))
    }

    /// The full provenance of a wrapper registered here.
    pub fn provenance(&self, wrapper: &ObjectRef) -> Option<Provenance> {
        self.inverse
            .get(&wrapper.id())
            .map(|entry| entry.value().clone())
    }

    /// Whether `object` is a wrapper registered here.
    pub fn is_wrapper(&self, object: &ObjectRef) -> bool {
        self.inverse.contains_key(&object.id())
    }

    /// The graph a wrapped value originates from, if it has ever been
    /// wrapped by this map's owner.
    pub fn origin_of(&self, source: &ObjectRef) -> Option<GraphName> {
        self.sources
            .get(&source.id())
            .filter(|entry| entry.value().source.is_alive())
            .map(|entry| entry.value().origin.clone())
    }

    /// Drop every entry whose value or wrapper has been dropped. Returns the
    /// number of entries removed.
    pub fn prune(&self) -> usize {
        let before = self.forward.len() + self.inverse.len() + self.sources.len();
        self.forward.retain(|_, wrapper| wrapper.is_alive());
        self.inverse.retain(|_, provenance| provenance.is_alive());
        self.sources.retain(|_, entry| entry.source.is_alive());
        let after = self.forward.len() + self.inverse.len() + self.sources.len();

        let removed = before.saturating_sub(after);
        if LogLevel::Trace.is_at_least(self.log_level) {
            trace!(removed, remaining = after, "Pruned identity map");
        }
        removed
    }

    /// Number of live-or-stale forward entries.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the map holds no forward entries.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl Default for IdentityMap {
    fn default() -> Self {
        Self::new(0)
    }
}
