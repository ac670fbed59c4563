use px_config::schema::*;
use px_config::{ConfigError, ValidationError, build_case, save_yaml, validate_case};

fn parse(yaml: &str) -> CaseFile {
    serde_yaml::from_str(yaml).unwrap()
}

const HEADER: &str = "version: 1\nname: Checks\nfluid:\n  type: tabulated_air\n";

#[test]
fn radiative_interface_requires_emissivity() {
    let case = parse(&format!(
        "{HEADER}interfaces:\n  - id: rad\n    fluid_subdomains: [0]\n    solid_subdomains: [1]\n    condition: radiative\n"
    ));
    let err = validate_case(&case).unwrap_err();
    assert!(matches!(err, ValidationError::MissingField { ref field, .. } if field == "emissivity"));
}

#[test]
fn emissivity_outside_unit_interval() {
    for e in ["-0.1", "1.5"] {
        let case = parse(&format!(
            "{HEADER}interfaces:\n  - id: rad\n    fluid_subdomains: [0]\n    solid_subdomains: [1]\n    condition: radiative\n    emissivity: {e}\n"
        ));
        let err = validate_case(&case).unwrap_err();
        assert!(err.to_string().contains("emissivity"), "{err}");
    }
}

#[test]
fn overlapping_subdomains_rejected() {
    let case = parse(&format!(
        "{HEADER}interfaces:\n  - id: both\n    fluid_subdomains: [0, 1]\n    solid_subdomains: [1]\n    condition: flux_continuity\n"
    ));
    assert!(matches!(
        validate_case(&case),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn empty_solid_side_rejected() {
    let case = parse(&format!(
        "{HEADER}interfaces:\n  - id: lonely\n    fluid_subdomains: [0]\n    solid_subdomains: []\n    condition: temperature_continuity\n"
    ));
    assert!(matches!(
        validate_case(&case),
        Err(ValidationError::MissingField { .. })
    ));
}

#[test]
fn ideal_gas_parameters_checked() {
    let case = parse("version: 1\nname: Bad gas\nfluid:\n  type: ideal_gas\n  gamma: 1.0\n");
    let err = validate_case(&case).unwrap_err();
    assert!(err.to_string().contains("gamma"));
}

#[test]
fn layer_on_plain_wall_is_unsupported() {
    let case = parse(&format!(
        "{HEADER}boundaries:\n  - id: w\n    kind: no_slip\n    resistivity: 1.0\n"
    ));
    assert!(matches!(
        validate_case(&case),
        Err(ValidationError::Unsupported { .. })
    ));
}

#[test]
fn unknown_kind_is_a_parse_error() {
    let yaml = format!("{HEADER}boundaries:\n  - id: w\n    kind: porous\n");
    assert!(serde_yaml::from_str::<CaseFile>(&yaml).is_err());
}

#[test]
fn build_reports_validation_before_wiring() {
    let case = parse(&format!(
        "{HEADER}boundaries:\n  - id: hot\n    kind: thermal_slip\n    temperature_field: {{ name: T, family: elemental }}\n"
    ));
    assert!(matches!(
        build_case(&case),
        Err(ConfigError::Validation(ValidationError::Unsupported { .. }))
    ));
}

#[test]
fn invalid_case_is_not_saved() {
    let mut case = parse(HEADER);
    case.threads = Some(0);
    let path = std::env::temp_dir().join("px_config_invalid.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(save_yaml(&path, &case).is_err());
    assert!(!path.exists());
}
