use super::*;
use crate::storage::{MemoryKvStore, SessionStore};

fn create_test_manager() -> CustomizationManager {
    CustomizationManager::new(0.0)
}

fn create_persistent_manager() -> CustomizationManager {
    CustomizationManager::new(0.0)
        .with_store(SessionStore::new(Box::new(MemoryKvStore::new())))
}

fn png_upload(name: &str, bytes: usize) -> FileUpload {
    FileUpload {
        name: name.to_string(),
        mime: Some("image/png".to_string()),
        bytes: vec![0x89; bytes],
    }
}

fn add_test_design(manager: &mut CustomizationManager) -> String {
    manager.add_design(png_upload("logo.png", 64)).unwrap()
}

fn record(id: &str, category: &str, price: serde_json::Value) -> OptionRecord {
    OptionRecord {
        id: id.to_string(),
        category: category.to_string(),
        level: None,
        price: Some(price),
        is_popular: false,
        is_active: true,
        incompatible_with: None,
    }
}

mod test_catalog;
mod test_core;
mod test_persistence;
