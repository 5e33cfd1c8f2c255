//! Testes de integração para aladdin-table

use aladdin_table::*;
use serde_json::json;

const TABLE_HEADER: &str = "latency(ns),idle energy(pJ),dynamic energy(pJ)\n";

fn table_value(id: TableId, bucket: u32, action: Action) -> f64 {
    EmbeddedTables.load(id).unwrap().lookup(bucket, action).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_adder_at_reference_width() {
    let estimator = AladdinTable::new();
    let request = Request::new("adder")
        .with_attribute("technology", "40nm")
        .with_attribute("datawidth", 32)
        .with_attribute("latency", 5)
        .with_action("dynamic");

    assert_eq!(estimator.primitive_action_supported(&request), 70);

    let energy = estimator.estimate_energy(&request).unwrap();
    assert_close(energy, table_value(TableId::Adder, 6, Action::Dynamic));
    assert_close(energy, 0.2114);
}

#[test]
fn test_regfile_clamps_latency() {
    let estimator = AladdinTable::new();
    let request = Request::new("regfile")
        .with_attribute("technology", 40)
        .with_attribute("width", 8)
        .with_attribute("latency", 12)
        .with_action("read");

    assert_eq!(estimator.primitive_action_supported(&request), 70);

    let energy = estimator.estimate_energy(&request).unwrap();
    assert_close(energy, 8.0 * table_value(TableId::Reg, 10, Action::Dynamic));
}

#[test]
fn test_unsupported_technology_scenario() {
    let estimator = AladdinTable::new();
    let request = Request::new("adder")
        .with_attribute("technology", 7)
        .with_attribute("datawidth", 32);
    assert_eq!(estimator.primitive_action_supported(&request), 0);
}

#[test]
fn test_every_class_supported_with_all_spellings() {
    let estimator = AladdinTable::new();
    for class in PrimitiveClass::ALL {
        for tech in [json!(40), json!("40"), json!("40nm")] {
            let request = Request::new(class.name()).with_attribute("technology", tech);
            assert_eq!(estimator.primitive_action_supported(&request), 70, "{class}");
        }
        let request = Request::new(class.name()).with_attribute("technology", "28nm");
        assert_eq!(estimator.primitive_action_supported(&request), 0, "{class}");
    }
}

#[test]
fn test_default_latency_is_five_ns() {
    let estimator = AladdinTable::new();
    let implicit = Request::new("multiplier")
        .with_attribute("technology", 40)
        .with_attribute("datawidth", 32);
    let explicit = implicit.clone().with_attribute("latency", 5.0);

    assert_close(
        estimator.estimate_energy(&implicit).unwrap(),
        estimator.estimate_energy(&explicit).unwrap(),
    );
}

#[test]
fn test_idle_action_uses_idle_column() {
    let estimator = AladdinTable::new();
    let request = Request::new("bitwise")
        .with_attribute("technology", 40)
        .with_attribute("num", 32)
        .with_attribute("latency", 8)
        .with_action("idle");

    let energy = estimator.estimate_energy(&request).unwrap();
    assert_close(energy, 32.0 * table_value(TableId::Bitwise, 10, Action::Idle));
}

#[test]
fn test_linear_width_scaling_for_adders() {
    let estimator = AladdinTable::new();
    for (class, table) in [
        ("adder", TableId::Adder),
        ("fp32adder", TableId::FpSpAdder),
        ("fp64adder", TableId::FpDpAdder),
    ] {
        let reference = table_value(table, 6, Action::Dynamic);
        for width in [0u32, 8, 16, 32, 64] {
            let request = Request::new(class)
                .with_attribute("technology", 40)
                .with_attribute("datawidth", width);
            let energy = estimator.estimate_energy(&request).unwrap();
            assert_close(energy, reference * f64::from(width) / 32.0);
        }
    }
}

#[test]
fn test_quadratic_width_scaling_for_multipliers() {
    let estimator = AladdinTable::new();
    for (class, table) in [
        ("multiplier", TableId::Multiplier),
        ("fp32multiplier", TableId::FpSpMultiplier),
        ("fp64multiplier", TableId::FpDpMultiplier),
    ] {
        let reference = table_value(table, 10, Action::Dynamic);
        let slope = reference / 32.0;
        for width in [0u32, 16, 32] {
            let request = Request::new(class)
                .with_attribute("technology", 40)
                .with_attribute("datawidth", width)
                .with_attribute("latency", 9.2);
            let energy = estimator.estimate_energy(&request).unwrap();
            assert_close(energy, slope * slope * f64::from(width));
        }
    }
}

#[test]
fn test_mac_is_adder_plus_multiplier() {
    let estimator = AladdinTable::new();
    for (mac, adder, multiplier) in [
        ("mac", "adder", "multiplier"),
        ("fp32mac", "fp32adder", "fp32multiplier"),
        ("fp64mac", "fp64adder", "fp64multiplier"),
    ] {
        for action in ["idle", "mac_random"] {
            let build = |class: &str| {
                Request::new(class)
                    .with_attribute("technology", "40")
                    .with_attribute("datawidth", 24)
                    .with_attribute("latency", 3.3)
                    .with_action(action)
            };

            let total = estimator.estimate_energy(&build(mac)).unwrap();
            let parts = estimator.estimate_energy(&build(adder)).unwrap()
                + estimator.estimate_energy(&build(multiplier)).unwrap();
            assert_close(total, parts);
        }
    }
}

#[test]
fn test_missing_required_attribute() {
    let estimator = AladdinTable::new();
    let request = Request::new("regfile").with_attribute("technology", 40);
    assert!(matches!(
        estimator.estimate_energy(&request),
        Err(EstimatorError::MissingAttribute(name)) if name == "width"
    ));
}

#[test]
fn test_request_json_roundtrip_through_estimator() {
    let estimator = AladdinTable::new();
    let request: Request = serde_json::from_str(
        r#"{
            "class_name": "fp32mac",
            "attributes": { "technology": "40nm", "datawidth": "32", "latency": 6 },
            "action_name": "mac",
            "arguments": { "address_delta": 1 }
        }"#,
    )
    .unwrap();

    assert_eq!(estimator.primitive_action_supported(&request), 70);
    let estimate = estimator.estimate(&request).unwrap();
    assert_eq!(estimate.contributions.len(), 2);
    assert!(estimate.contributions.iter().all(|c| c.latency_bucket == 6));
}

#[test]
fn test_directory_tables_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("adder.csv"),
        format!("{TABLE_HEADER}6,0.5,3.2\n10,0.25,1.6\n"),
    )
    .unwrap();

    let config = EstimatorConfig::default().with_tables_dir(dir.path());
    let estimator = AladdinTable::with_config(config).unwrap();

    let request = Request::new("adder")
        .with_attribute("technology", 40)
        .with_attribute("datawidth", 16)
        .with_attribute("latency", 10);
    assert_close(estimator.estimate_energy(&request).unwrap(), 0.8);

    // Sem multiplier.csv no diretório
    let request = Request::new("multiplier")
        .with_attribute("technology", 40)
        .with_attribute("datawidth", 16);
    assert!(matches!(
        estimator.estimate_energy(&request),
        Err(EstimatorError::Io { .. })
    ));
}

#[test]
fn test_lookup_miss_propagates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("reg.csv"),
        format!("{TABLE_HEADER}6,0.1,0.2\n"),
    )
    .unwrap();

    let estimator =
        AladdinTable::with_config(EstimatorConfig::default().with_tables_dir(dir.path())).unwrap();
    let request = Request::new("regfile")
        .with_attribute("technology", 40)
        .with_attribute("width", 4)
        .with_attribute("latency", 20);

    assert!(matches!(
        estimator.estimate_energy(&request),
        Err(EstimatorError::LookupMiss { bucket: 10, .. })
    ));
}

#[test]
fn test_custom_buckets_from_toml() {
    let config = EstimatorConfig::from_toml_str("latency_buckets = [1, 2, 3, 4, 5, 6, 10]").unwrap();
    let estimator = AladdinTable::with_config(config).unwrap();

    let request = Request::new("adder")
        .with_attribute("technology", 40)
        .with_attribute("datawidth", 32)
        .with_attribute("latency", 2.5);
    let energy = estimator.estimate_energy(&request).unwrap();
    assert_close(energy, table_value(TableId::Adder, 3, Action::Dynamic));
}

#[test]
fn test_estimator_is_shareable_across_threads() {
    let estimator = std::sync::Arc::new(AladdinTable::new());
    let handles: Vec<_> = (1..=4u32)
        .map(|i| {
            let estimator = std::sync::Arc::clone(&estimator);
            std::thread::spawn(move || {
                let request = Request::new("regfile")
                    .with_attribute("technology", 40)
                    .with_attribute("width", i);
                estimator.estimate_energy(&request).unwrap()
            })
        })
        .collect();

    let reference = table_value(TableId::Reg, 6, Action::Dynamic);
    for (i, handle) in handles.into_iter().enumerate() {
        assert_close(handle.join().unwrap(), reference * (i + 1) as f64);
    }
}
