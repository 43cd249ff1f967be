use super::*;
use crate::storage::{KvStore, SESSION_KEY, StoreResult};
use std::sync::{Arc, Mutex};

/// Test backend shared between two stores, standing in for the one
/// browser storage area a real session reloads from
#[derive(Clone, Default)]
struct SharedKv(Arc<Mutex<MemoryKvStore>>);

impl SharedKv {
    fn raw(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).unwrap()
    }
}

impl KvStore for SharedKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.0.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.0.lock().unwrap().set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.0.lock().unwrap().remove(key)
    }
}

#[test]
fn test_every_mutation_is_snapshotted() {
    let kv = SharedKv::default();
    let mut manager =
        CustomizationManager::new(10.0).with_store(SessionStore::new(Box::new(kv.clone())));

    let id = add_test_design(&mut manager);
    manager.select_style(&id, OptionCategory::Coverage, "coverage-full").unwrap();
    manager.set_dimensions(&id, 3.0, 3.0).unwrap();
    manager.set_quantity(4).unwrap();

    // Reload into a fresh manager over the same storage area
    let mut reloaded =
        CustomizationManager::new(0.0).with_store(SessionStore::new(Box::new(kv.clone())));
    assert!(reloaded.restore());

    let session = reloaded.session();
    assert_eq!(session.quantity, 4);
    assert_eq!(session.base_price, 10.0);
    let design = session.design(&id).unwrap();
    assert!(design.is_selected(OptionCategory::Coverage, "coverage-full"));
    assert_eq!(design.dimensions, Some(Dimensions { width: 3.0, height: 3.0 }));
    // Payload gone, placeholder intact
    assert!(design.file.as_ref().unwrap().is_placeholder());

    // Both managers now price the session identically
    assert_eq!(
        manager.calculate_session_total(),
        reloaded.calculate_session_total()
    );
}

#[test]
fn test_restore_without_snapshot() {
    let mut manager = create_persistent_manager();
    assert!(!manager.restore());
}

#[test]
fn test_reset_clears_snapshot() {
    let kv = SharedKv::default();
    let mut manager =
        CustomizationManager::new(0.0).with_store(SessionStore::new(Box::new(kv.clone())));

    add_test_design(&mut manager);
    assert!(kv.raw(SESSION_KEY).is_some());

    manager.reset();
    assert!(kv.raw(SESSION_KEY).is_none());
    assert!(manager.session().designs.is_empty());
}

#[test]
fn test_quota_failure_never_reaches_caller() {
    // Capacity too small for any snapshot: every persist self-evicts
    let store = SessionStore::new(Box::new(MemoryKvStore::with_capacity(16)));
    let mut manager = CustomizationManager::new(0.0).with_store(store);

    let id = manager.add_design(png_upload("logo.png", 64)).unwrap();
    manager.select_style(&id, OptionCategory::Coverage, "coverage-full").unwrap();
    assert_eq!(manager.session().designs.len(), 1);
}
