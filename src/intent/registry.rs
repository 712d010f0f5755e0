use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use crate::intent::{
    ports::{IntentRegistryPort, ListenerPort},
    types::{Intent, IntentCatalog, IntentCatalogEntry},
};

#[derive(Default)]
struct RegistryState {
    version: u64,
    by_intent: BTreeMap<Intent, Vec<Arc<dyn ListenerPort>>>,
}

/// Process-local intent registry. Writes are expected only during warm-up;
/// after that the map is read-only and safe for concurrent lookups.
#[derive(Default)]
pub struct InMemoryIntentRegistry {
    state: RwLock<RegistryState>,
}

impl InMemoryIntentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.state.read().expect("lock poisoned").version
    }
}

impl IntentRegistryPort for InMemoryIntentRegistry {
    fn register(&self, intent: &str, listener: Arc<dyn ListenerPort>) {
        let intent = Intent::new(intent);
        let mut guard = self.state.write().expect("lock poisoned");
        guard.by_intent.entry(intent).or_default().push(listener);
        guard.version = guard.version.saturating_add(1);
    }

    fn listeners(&self, intent: &str) -> Vec<Arc<dyn ListenerPort>> {
        let intent = Intent::new(intent);
        self.state
            .read()
            .expect("lock poisoned")
            .by_intent
            .get(&intent)
            .map(|list| list.iter().map(Arc::clone).collect())
            .unwrap_or_default()
    }

    fn listener_count(&self, intent: &str) -> usize {
        let intent = Intent::new(intent);
        self.state
            .read()
            .expect("lock poisoned")
            .by_intent
            .get(&intent)
            .map_or(0, Vec::len)
    }

    fn catalog_snapshot(&self) -> IntentCatalog {
        let guard = self.state.read().expect("lock poisoned");
        let entries = guard
            .by_intent
            .iter()
            .map(|(intent, listeners)| IntentCatalogEntry {
                intent: intent.clone(),
                listener_count: listeners.len(),
            })
            .collect();

        IntentCatalog {
            version: guard.version,
            entries,
        }
    }
}
