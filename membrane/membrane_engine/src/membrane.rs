//! The membrane facade.
//!
//! A [`Membrane`] mediates any number of named graphs. It converts values
//! between graphs, keeping exactly one wrapper per value per ordered graph
//! pair, and hands out [`Revoker`]s that sever the boundary.

use std::sync::Arc;

use membrane_core::id::{GraphName, MembraneId};
use membrane_core::{LogLevel, ObjectRef, Result, Value};
use tracing::debug;

use crate::classify::classify;
use crate::config::MembraneConfig;
use crate::identity::IdentityMap;
use crate::revocation::{RevocationController, RevocationTarget, Revoker};
use crate::wrapper::Wrapper;

/// State shared by a membrane handle and every wrapper it issued.
#[derive(Debug)]
pub(crate) struct MembraneShared {
    pub(crate) id: MembraneId,
    pub(crate) config: MembraneConfig,
    pub(crate) identity: IdentityMap,
    pub(crate) revocation: Arc<RevocationController>,
}

impl MembraneShared {
    /// Convert `value` as seen from graph `from` into its representation in
    /// graph `to`.
    ///
    /// Primitives pass unchanged. A wrapper issued by this membrane is
    /// unwrapped when `to` is its origin; otherwise the original behind it is
    /// wrapped for `to`, so a value always has one representation per graph.
    pub(crate) fn convert(self: &Arc<Self>, value: Value, from: &GraphName, to: &GraphName) -> Result<Value> {
        if !classify(&value).needs_wrapper() {
            return Ok(value);
        }
        let Value::Object(object) = value else {
            return Ok(value);
        };
        if from == to {
            return Ok(Value::Object(object));
        }

        let (origin, source) = match self.identity.unwrap(&object) {
            Some(unwrapped) => unwrapped,
            None => (from.clone(), object),
        };
        if &origin == to {
            return Ok(Value::Object(source));
        }
        self.wrap(source, &origin, to).map(Value::Object)
    }

    fn wrap(self: &Arc<Self>, source: ObjectRef, origin: &GraphName, to: &GraphName) -> Result<ObjectRef> {
        self.identity.get_or_create(origin, to, &source, || {
            let guard = self.revocation.guard(origin, to);
            let wrapper = ObjectRef::new(Wrapper::new(
                source.clone(),
                origin.clone(),
                to.clone(),
                guard,
                Arc::clone(self),
            ));
            if self.config.logs_at(LogLevel::Debug) {
                debug!(
                    membrane = %self.id,
                    from = %origin,
                    to = %to,
                    class = %source.class(),
                    wrapper = %wrapper.id(),
                    "Created wrapper"
                );
            }
            Ok(wrapper)
        })
    }

    /// The origin graph and original object behind `object`, which is seen
    /// from `graph`.
    fn resolve(&self, graph: &GraphName, object: &ObjectRef) -> Option<(GraphName, ObjectRef)> {
        match self.identity.provenance(object) {
            Some(provenance) if &provenance.destination == graph => {
                Some((provenance.origin.clone(), provenance.source()?))
            }
            Some(_) => None,
            None => match self.identity.origin_of(object) {
                Some(origin) if &origin == graph => Some((origin, object.clone())),
                _ => None,
            },
        }
    }
}

/// A handle to a membrane.
///
/// Cloning the handle shares the membrane.
#[derive(Debug, Clone)]
pub struct Membrane {
    shared: Arc<MembraneShared>,
}

impl Membrane {
    /// Create a membrane from a validated configuration.
    pub fn new(config: MembraneConfig) -> Result<Self> {
        config.validate()?;
        let shared = MembraneShared {
            id: MembraneId::new(),
            identity: IdentityMap::new(config.prune_interval).with_log_level(config.log_level),
            revocation: Arc::new(
                RevocationController::new(config.revocation_scope)
                    .with_log_level(config.log_level),
            ),
            config,
        };
        if shared.config.logs_at(LogLevel::Debug) {
            debug!(
                membrane = %shared.id,
                scope = ?shared.config.revocation_scope,
                "Created membrane"
            );
        }
        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// The identity of this membrane.
    pub fn id(&self) -> MembraneId {
        self.shared.id
    }

    /// The configuration this membrane was built with.
    pub fn config(&self) -> &MembraneConfig {
        &self.shared.config
    }

    /// The configured privileged graph.
    pub fn wet_graph(&self) -> &GraphName {
        &self.shared.config.graphs.wet
    }

    /// The configured receiving graph.
    pub fn dry_graph(&self) -> &GraphName {
        &self.shared.config.graphs.dry
    }

    /// Carry a root value of graph `from` into graph `to`.
    pub fn wrap_root(&self, root: Value, from: &GraphName, to: &GraphName) -> Result<Value> {
        self.shared.convert(root, from, to)
    }

    /// Convert a value of graph `from` into its representation in graph `to`,
    /// creating a wrapper if needed.
    pub fn convert_argument_to_proxy(
        &self,
        from: &GraphName,
        to: &GraphName,
        value: Value,
    ) -> Result<Value> {
        self.shared.convert(value, from, to)
    }

    /// The original value behind `value`, which is seen from `graph`.
    ///
    /// Returns `None` if `value` is an object this membrane does not know in
    /// that graph. Primitives are their own originals.
    pub fn get_membrane_value(&self, graph: &GraphName, value: &Value) -> Option<Value> {
        match value {
            Value::Object(object) => self
                .shared
                .resolve(graph, object)
                .map(|(_, original)| Value::Object(original)),
            primitive => Some(primitive.clone()),
        }
    }

    /// The existing representation in `graph` of the original behind
    /// `value`, without creating one.
    ///
    /// `value` may be seen from any graph this membrane knows it in.
    pub fn get_membrane_proxy(&self, graph: &GraphName, value: &Value) -> Option<Value> {
        let Value::Object(object) = value else {
            return Some(value.clone());
        };
        let (origin, original) = match self.shared.identity.provenance(object) {
            Some(provenance) => (provenance.origin.clone(), provenance.source()?),
            None => (self.shared.identity.origin_of(object)?, object.clone()),
        };
        if &origin == graph {
            return Some(Value::Object(original));
        }
        self.shared
            .identity
            .lookup(&origin, graph, &original)
            .map(Value::Object)
    }

    /// Whether `value` is a wrapper issued by this membrane.
    pub fn is_wrapper(&self, value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|object| self.shared.identity.is_wrapper(object))
    }

    /// Sever every wrapper leading into or out of `graph`.
    pub fn revoke_graph(&self, graph: &GraphName) -> bool {
        self.shared
            .revocation
            .revoke(&RevocationTarget::Graph(graph.clone()))
    }

    /// Sever every wrapper between two graphs. Only effective under
    /// [`crate::RevocationScope::Pair`].
    pub fn revoke_pair(&self, a: &GraphName, b: &GraphName) -> bool {
        self.shared
            .revocation
            .revoke(&RevocationTarget::Pair(a.clone(), b.clone()))
    }

    /// A revoker for the default target: the dry graph under graph scope,
    /// the wet/dry pair under pair scope.
    pub fn revoker(&self) -> Revoker {
        let target = self
            .shared
            .revocation
            .default_target(self.wet_graph(), self.dry_graph());
        self.revoker_for(target)
    }

    /// A revoker for an explicit target.
    pub fn revoker_for(&self, target: RevocationTarget) -> Revoker {
        Revoker::new(Arc::clone(&self.shared.revocation), target)
    }

    /// Whether `graph` has been revoked.
    pub fn is_revoked(&self, graph: &GraphName) -> bool {
        self.shared
            .revocation
            .is_revoked(&RevocationTarget::Graph(graph.clone()))
    }

    /// Sweep dead identity map entries.
    pub fn prune(&self) -> usize {
        self.shared.identity.prune()
    }
}

/// The result of [`create_membrane`].
#[derive(Debug, Clone)]
pub struct CreatedMembrane {
    /// The root value as seen from the dry graph.
    pub membrane: Value,

    /// Severs the dry graph (or the wet/dry pair under pair scope).
    pub revoke: Revoker,

    /// The membrane itself, for further conversions and introspection.
    pub handle: Membrane,
}

/// Wrap a wet root value for the dry graph with the default configuration.
pub fn create_membrane(root: Value) -> Result<CreatedMembrane> {
    create_membrane_with_config(root, MembraneConfig::default())
}

/// Wrap a wet root value for the dry graph.
pub fn create_membrane_with_config(root: Value, config: MembraneConfig) -> Result<CreatedMembrane> {
    let handle = Membrane::new(config)?;
    let wet = handle.wet_graph().clone();
    let dry = handle.dry_graph().clone();
    let membrane = handle.wrap_root(root, &wet, &dry)?;
    let revoke = handle.revoker();
    Ok(CreatedMembrane {
        membrane,
        revoke,
        handle,
    })
}
