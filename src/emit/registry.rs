use super::walker::{Continuation, Walker};
use crate::ir::NodeIr;
use ahash::AHashMap;

/// Defines the contract for emitting a node kind the built-in emitters do not cover.
pub trait NodeEmitter: Send + Sync {
    fn node_type(&self) -> &str;
    fn emit(
        &self,
        node: &NodeIr,
        settings: &serde_json::Value,
        walker: &mut Walker<'_>,
    ) -> Continuation;
}

/// Custom emitters keyed by the node kind they handle.
#[derive(Default)]
pub struct EmitterRegistry {
    emitters: AHashMap<String, Box<dyn NodeEmitter>>,
}

impl EmitterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an emitter, replacing any previous one for the same kind.
    pub fn register(&mut self, emitter: Box<dyn NodeEmitter>) {
        self.emitters
            .insert(emitter.node_type().to_string(), emitter);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn NodeEmitter> {
        self.emitters.get(kind).map(Box::as_ref)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.emitters.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

impl std::fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.emitters.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("EmitterRegistry").field("kinds", &kinds).finish()
    }
}
