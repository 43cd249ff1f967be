use super::*;
use crate::catalog::SourceError;
use serde_json::json;

#[test]
fn test_apply_catalog_replaces_options() {
    let mut manager = create_test_manager();
    let epoch = manager.catalog_epoch();

    let applied = manager.apply_catalog(
        epoch,
        Ok(vec![
            record("cov-x", "coverage", json!("9.99")),
            record("mat-x", "material", json!(0)),
        ]),
    );
    assert!(applied);
    assert_eq!(manager.catalog().len(), 2);
    assert_eq!(manager.catalog().get("cov-x").unwrap().price, 9.99);
}

#[test]
fn test_stale_catalog_response_discarded() {
    let mut manager = create_test_manager();
    let epoch = manager.catalog_epoch();
    let default_len = manager.catalog().len();

    // Reset (unmount) happens while the fetch is in flight
    manager.reset();

    let applied = manager.apply_catalog(epoch, Ok(vec![record("late", "coverage", json!(1))]));
    assert!(!applied);
    assert_eq!(manager.catalog().len(), default_len);
    assert!(manager.catalog().get("late").is_none());
}

#[test]
fn test_fetch_failure_degrades_to_defaults() {
    let mut manager = create_test_manager();
    let epoch = manager.catalog_epoch();

    let applied = manager.apply_catalog(
        epoch,
        Err(SourceError::Unavailable("timeout".to_string())),
    );
    assert!(applied);
    // Defaults cover every category so pricing can proceed offline
    assert!(manager.catalog().get("coverage-full").is_some());
}

#[test]
fn test_selection_works_after_degraded_load() {
    let mut manager = create_test_manager();
    let epoch = manager.catalog_epoch();
    manager.apply_catalog(epoch, Err(SourceError::Unavailable("offline".to_string())));

    let id = add_test_design(&mut manager);
    manager.select_style(&id, OptionCategory::Coverage, "coverage-full").unwrap();
    assert_eq!(manager.calculate_design_price(&id).unwrap(), 14.50);
}
