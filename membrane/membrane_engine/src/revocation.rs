//! Revocation flags, guards and revokers.
//!
//! Revocation is one-way: a flag moves from active to revoked exactly once.
//! Every wrapper holds a [`RevocationGuard`] over the flags that govern it
//! and checks it before touching its target.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use membrane_core::id::GraphName;
use membrane_core::{Error, LogLevel, Result};
use tracing::debug;

use crate::config::RevocationScope;

/// A one-way revocation cell.
#[derive(Debug, Default)]
pub struct RevocationFlag {
    /// Whether the flag has been tripped
    revoked: AtomicBool,
}

impl RevocationFlag {
    /// Create an active flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag. Returns `true` if this call revoked it.
    pub fn revoke(&self) -> bool {
        !self.revoked.swap(true, Ordering::SeqCst)
    }

    /// Whether the flag has been tripped.
    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }
}

/// The set of flags governing one wrapper.
#[derive(Debug, Clone)]
pub struct RevocationGuard {
    flags: Vec<Arc<RevocationFlag>>,
}

impl RevocationGuard {
    /// Whether any governing flag has been tripped.
    pub fn is_revoked(&self) -> bool {
        self.flags.iter().any(|flag| flag.is_revoked())
    }

    /// Fail with [`Error::RevokedAccess`] if revoked.
    pub fn check(&self) -> Result<()> {
        if self.is_revoked() {
            Err(Error::RevokedAccess)
        } else {
            Ok(())
        }
    }
}

/// What a [`Revoker`] severs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationTarget {
    /// Every wrapper leading into or out of the graph.
    Graph(GraphName),
    /// Every wrapper between the two graphs, in either direction.
    Pair(GraphName, GraphName),
}

impl std::fmt::Display for RevocationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Graph(graph) => write!(f, "graph '{}'", graph),
            Self::Pair(a, b) => write!(f, "pair '{}'/'{}'", a, b),
        }
    }
}

/// Owns the revocation flags of one membrane.
///
/// Graph flags always take part in a guard. Under
/// [`RevocationScope::Pair`] a guard also consults the flag of its
/// unordered graph pair, so a pair can be severed on its own.
#[derive(Debug)]
pub struct RevocationController {
    scope: RevocationScope,
    graphs: DashMap<GraphName, Arc<RevocationFlag>>,
    pairs: DashMap<(GraphName, GraphName), Arc<RevocationFlag>>,
    log_level: LogLevel,
}

fn pair_key(a: &GraphName, b: &GraphName) -> (GraphName, GraphName) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl RevocationController {
    /// Create a controller with no tripped flags.
    pub fn new(scope: RevocationScope) -> Self {
        Self {
            scope,
            graphs: DashMap::new(),
            pairs: DashMap::new(),
            log_level: LogLevel::default(),
        }
    }

    /// Emit revocation events only at `level` or above.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// The configured scope.
    pub fn scope(&self) -> RevocationScope {
        self.scope
    }

    fn graph_flag(&self, graph: &GraphName) -> Arc<RevocationFlag> {
        self.graphs
            .entry(graph.clone())
            .or_insert_with(|| Arc::new(RevocationFlag::new()))
            .value()
            .clone()
    }

    fn pair_flag(&self, a: &GraphName, b: &GraphName) -> Arc<RevocationFlag> {
        self.pairs
            .entry(pair_key(a, b))
            .or_insert_with(|| Arc::new(RevocationFlag::new()))
            .value()
            .clone()
    }

    /// The guard for a wrapper crossing from `source` into `destination`.
    pub fn guard(&self, source: &GraphName, destination: &GraphName) -> RevocationGuard {
        let mut flags = vec![self.graph_flag(source), self.graph_flag(destination)];
        if self.scope == RevocationScope::Pair {
            flags.push(self.pair_flag(source, destination));
        }
        RevocationGuard { flags }
    }

    /// The target a membrane's default revoker severs.
    pub fn default_target(&self, wet: &GraphName, dry: &GraphName) -> RevocationTarget {
        match self.scope {
            RevocationScope::Graph => RevocationTarget::Graph(dry.clone()),
            RevocationScope::Pair => RevocationTarget::Pair(wet.clone(), dry.clone()),
        }
    }

    /// Sever a target. Returns `true` if this call changed anything.
    pub fn revoke(&self, target: &RevocationTarget) -> bool {
        let changed = match target {
            RevocationTarget::Graph(graph) => self.graph_flag(graph).revoke(),
            RevocationTarget::Pair(a, b) => self.pair_flag(a, b).revoke(),
        };
        if changed && LogLevel::Debug.is_at_least(self.log_level) {
            debug!(revoked = %target, "Revoked membrane access");
        }
        changed
    }

    /// Whether a target has been severed.
    pub fn is_revoked(&self, target: &RevocationTarget) -> bool {
        match target {
            RevocationTarget::Graph(graph) => self
                .graphs
                .get(graph)
                .is_some_and(|flag| flag.is_revoked()),
            RevocationTarget::Pair(a, b) => self
                .pairs
                .get(&pair_key(a, b))
                .is_some_and(|flag| flag.is_revoked()),
        }
    }
}

/// A handle that severs one target of a membrane.
///
/// Revokers are cheap to clone and may be handed to collaborators, such as
/// an unload hook, independently of the membrane itself.
#[derive(Debug, Clone)]
pub struct Revoker {
    controller: Arc<RevocationController>,
    target: RevocationTarget,
}

impl Revoker {
    pub(crate) fn new(controller: Arc<RevocationController>, target: RevocationTarget) -> Self {
        Self { controller, target }
    }

    /// Sever the target. Idempotent: returns `false` if it was already
    /// severed.
    pub fn revoke(&self) -> bool {
        self.controller.revoke(&self.target)
    }

    /// Whether the target has been severed.
    pub fn is_revoked(&self) -> bool {
        self.controller.is_revoked(&self.target)
    }

    /// What this revoker severs.
    pub fn target(&self) -> &RevocationTarget {
        &self.target
    }
}
