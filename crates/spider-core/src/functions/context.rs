use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared context passed to every capability handler invocation.
///
/// The embedding application seeds this once at registry build time; handlers
/// look up whatever shared collaborators they need by type. Entries are
/// shared, never owned by the handlers.
#[derive(Default, Clone)]
pub struct FunctionContext {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl FunctionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Builder-style insert for construction sites.
    pub fn with<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<T>().ok())
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }
}
