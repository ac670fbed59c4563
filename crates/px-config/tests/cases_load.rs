use std::path::Path;

#[test]
fn sample_cases_load_and_build() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../cases");
    let cases = ["01_heated_channel.yaml", "02_radiating_fin.yaml"];

    for name in cases {
        let path = root.join(name);
        let case = px_config::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        px_config::build_case(&case)
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
    }
}

#[test]
fn heated_channel_wiring() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../cases/01_heated_channel.yaml");
    let model = px_config::load_case(&path).unwrap();

    assert_eq!(model.eos().name(), "TabulatedAir");
    assert_eq!(model.threads(), 4);
    assert_eq!(model.flux_cache().threads(), 4);
    assert_eq!(model.boundaries().len(), 4);

    let plate = model.boundary("heated_plate").unwrap();
    assert!(plate.flux.kind().is_thermal());
    assert_eq!(plate.temperature_field.as_deref(), Some("T_solid"));
    assert_eq!(plate.id.index(), 2);

    assert!(model.boundary("symmetry").unwrap().temperature_field.is_none());
    assert!(matches!(
        model.boundary("missing"),
        Err(px_config::ConfigError::UnknownBoundary { .. })
    ));

    assert!(model.conjugate("coated_plate").is_ok());
    assert!(matches!(
        model.conjugate("outer_wall"),
        Err(px_config::ConfigError::Thermal(_))
    ));

    assert_eq!(model.interface("plate_contact").unwrap().condition().label(), "flux_continuity");
}

#[test]
fn radiating_fin_interfaces() {
    use px_core::{SubdomainId, Vec3};
    use px_thermal::{InterfaceCondition, InterfaceSide};

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../cases/02_radiating_fin.yaml");
    let model = px_config::load_case(&path).unwrap();
    assert_eq!(model.eos().name(), "IdealGas");

    let tip = model.interface("fin_tip").unwrap();
    assert_eq!(tip.side_of(SubdomainId::from_index(3)).unwrap(), InterfaceSide::Solid);
    assert_eq!(tip.side_of(SubdomainId::from_index(0)).unwrap(), InterfaceSide::Fluid);
    match tip.condition() {
        InterfaceCondition::Radiative {
            emissivity,
            environment,
        } => {
            assert_eq!(*emissivity, 0.85);
            assert!((environment.at(5.0, &Vec3::zeros()) - 325.0).abs() < 1e-12);
            assert_eq!(environment.at(120.0, &Vec3::zeros()), 400.0);
        }
        other => panic!("unexpected condition {}", other.label()),
    }
}
