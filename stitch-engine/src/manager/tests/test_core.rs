use super::*;
use crate::pricing::compute_material_cost;

#[test]
fn test_add_and_remove_design() {
    let mut manager = create_test_manager();
    let id = add_test_design(&mut manager);

    assert_eq!(manager.session().designs.len(), 1);
    let design = manager.session().design(&id).unwrap();
    assert!(design.preview.as_deref().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(design.file.as_ref().unwrap().size, 64);

    manager.remove_design(&id).unwrap();
    assert!(manager.session().designs.is_empty());

    let err = manager.remove_design(&id);
    assert!(matches!(err, Err(EngineError::DesignNotFound { .. })));
}

#[test]
fn test_design_limit() {
    let mut manager = create_test_manager();
    for _ in 0..shared::MAX_DESIGNS {
        add_test_design(&mut manager);
    }
    let err = manager.add_design(png_upload("one-too-many.png", 64));
    assert!(matches!(err, Err(EngineError::DesignLimitReached { .. })));
    assert_eq!(manager.session().designs.len(), shared::MAX_DESIGNS);
}

#[test]
fn test_select_and_reclick_deselects() {
    let mut manager = create_test_manager();
    let id = add_test_design(&mut manager);

    manager
        .select_style(&id, OptionCategory::Coverage, "coverage-full")
        .unwrap();
    assert!(manager.is_selected(&id, OptionCategory::Coverage, "coverage-full").unwrap());

    manager
        .select_style(&id, OptionCategory::Coverage, "coverage-full")
        .unwrap();
    assert!(!manager.is_selected(&id, OptionCategory::Coverage, "coverage-full").unwrap());
}

#[test]
fn test_toggle_multi_select() {
    let mut manager = create_test_manager();
    let id = add_test_design(&mut manager);

    manager.toggle_style(&id, OptionCategory::Threads, "threads-glow").unwrap();
    manager.toggle_style(&id, OptionCategory::Threads, "threads-metallic").unwrap();
    assert!(manager.is_selected(&id, OptionCategory::Threads, "threads-glow").unwrap());
    assert!(manager.is_selected(&id, OptionCategory::Threads, "threads-metallic").unwrap());

    manager.toggle_style(&id, OptionCategory::Threads, "threads-glow").unwrap();
    assert!(!manager.is_selected(&id, OptionCategory::Threads, "threads-glow").unwrap());
}

#[test]
fn test_unknown_option_rejected() {
    let mut manager = create_test_manager();
    let id = add_test_design(&mut manager);

    let err = manager.select_style(&id, OptionCategory::Coverage, "no-such-option");
    assert!(matches!(err, Err(EngineError::OptionNotFound { .. })));

    // Real option, wrong category
    let err = manager.select_style(&id, OptionCategory::Border, "coverage-full");
    assert!(matches!(err, Err(EngineError::OptionNotFound { .. })));
}

#[test]
fn test_set_dimensions_validation() {
    let mut manager = create_test_manager();
    let id = add_test_design(&mut manager);

    assert!(manager.set_dimensions(&id, 0.0, 3.0).is_err());
    assert!(manager.set_dimensions(&id, 3.0, f64::NAN).is_err());
    assert!(manager.get_cost_breakdown(&id).unwrap().is_none());

    manager.set_dimensions(&id, 3.0, 3.0).unwrap();
    let breakdown = manager.get_cost_breakdown(&id).unwrap().unwrap();
    assert_eq!(breakdown, compute_material_cost(
        Dimensions { width: 3.0, height: 3.0 },
        &MaterialRates::default(),
    ));
}

#[test]
fn test_design_price_and_session_total() {
    let mut manager = create_test_manager();
    manager.set_base_price(20.0).unwrap();
    manager.set_quantity(2).unwrap();

    let id = add_test_design(&mut manager);
    manager.set_dimensions(&id, 3.0, 3.0).unwrap();
    manager.select_style(&id, OptionCategory::Coverage, "coverage-full").unwrap();
    manager.select_style(&id, OptionCategory::Material, "material-polyester").unwrap();

    let material = compute_material_cost(
        Dimensions { width: 3.0, height: 3.0 },
        &MaterialRates::default(),
    )
    .total_cost;
    let design_price = manager.calculate_design_price(&id).unwrap();
    assert!((design_price - (material + 14.50)).abs() < 1e-9);

    let total = manager.calculate_session_total();
    assert!((total - (20.0 + design_price) * 2.0).abs() < 1e-9);
}

#[test]
fn test_quantity_and_price_validation() {
    let mut manager = create_test_manager();
    assert!(matches!(
        manager.set_quantity(0),
        Err(EngineError::InvalidQuantity { .. })
    ));
    assert!(manager.set_base_price(-1.0).is_err());
    assert!(manager.set_base_price(f64::INFINITY).is_err());
}

#[test]
fn test_can_finalize() {
    let mut manager = create_test_manager();
    let id = add_test_design(&mut manager);
    assert!(!manager.can_finalize(&id).unwrap());

    manager.select_style(&id, OptionCategory::Coverage, "coverage-full").unwrap();
    manager.select_style(&id, OptionCategory::Material, "material-cotton").unwrap();
    manager.select_style(&id, OptionCategory::Border, "border-satin").unwrap();
    assert!(manager.can_finalize(&id).unwrap());
}

#[test]
fn test_set_placement() {
    let mut manager = create_test_manager();
    let id = add_test_design(&mut manager);
    manager
        .set_placement(&id, Placement::LeftChest, Position { x: 1.5, y: -0.5 })
        .unwrap();
    let design = manager.session().design(&id).unwrap();
    assert_eq!(design.placement, Placement::LeftChest);
    assert_eq!(design.position, Position { x: 1.5, y: -0.5 });
}
