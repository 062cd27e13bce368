use icond_core::naming::{
    is_prefixed, is_valid_identifier, prefixed_identifier, sanitize_base_name, CollisionKind,
    CollisionPolicy, DashPolicy, NameRegistry, Namer, NamingError, Resolution,
};
use std::sync::Arc;

fn strip_namer() -> Namer {
    Namer::default()
}

fn keep_namer() -> Namer {
    Namer::new("icon", DashPolicy::Keep, 24)
}

#[test]
fn sanitize_trims_and_collapses_runs() {
    assert_eq!(sanitize_base_name("  Arrow   Left  "), "Arrow-Left");
    assert_eq!(sanitize_base_name("a -- b"), "a-b");
    assert_eq!(sanitize_base_name("Chevron\tDown"), "Chevron-Down");
}

#[test]
fn canonical_width_has_no_size_suffix() {
    let record = strip_namer().name("  Arrow   Left  .svg", 24).unwrap();
    assert_eq!(record.base_name, "Arrow-Left");
    assert_eq!(record.size_suffix, None);
    assert_eq!(record.final_file_name, "arrow-left.svg");
    assert_eq!(record.file_stem(), "arrow-left");
}

#[test]
fn dash_policy_decides_identifier_shape() {
    let stripped = strip_namer().name("  Arrow   Left  ", 24).unwrap();
    assert_eq!(stripped.export_identifier, "iconArrowLeft");
    assert_eq!(stripped.local_symbol, "arrowLeft");

    let kept = keep_namer().name("  Arrow   Left  ", 24).unwrap();
    assert_eq!(kept.export_identifier, "iconArrow-Left");
    assert_eq!(kept.final_file_name, "arrow-left.svg");
}

#[test]
fn other_width_gets_size_suffix() {
    let record = strip_namer().name("Home.svg", 16).unwrap();
    assert_eq!(record.final_file_name, "home-16.svg");
    assert_eq!(record.size_suffix, Some(16));
    assert_eq!(record.export_identifier, "iconHome16");
    assert_eq!(record.local_symbol, "home16");
}

#[test]
fn renamed_file_keeps_its_names_on_rerun() {
    let namer = strip_namer();
    for (label, width) in [("Home.svg", 16), ("Star Filled.svg", 20), ("  Arrow   Left  ", 24)] {
        let first = namer.name(label, width).unwrap();
        let again = namer.name(&first.final_file_name, width).unwrap();
        assert_eq!(again.final_file_name, first.final_file_name);
        assert_eq!(again.export_identifier, first.export_identifier);
        assert_eq!(again.local_symbol, first.local_symbol);
    }
}

#[test]
fn upper_case_extension_is_stripped() {
    let record = strip_namer().name("Star.SVG", 24).unwrap();
    assert_eq!(record.final_file_name, "star.svg");
}

#[test]
fn only_first_letter_is_recased_when_dashes_are_kept() {
    let record = keep_namer().name("userAdd", 24).unwrap();
    assert_eq!(record.export_identifier, "iconUserAdd");
    assert_eq!(record.final_file_name, "useradd.svg");
}

#[test]
fn stripped_identifier_follows_the_file_name() {
    let record = strip_namer().name("userAdd", 24).unwrap();
    assert_eq!(record.export_identifier, "iconUseradd");
    let record = strip_namer().name("Chevron Double Down", 24).unwrap();
    assert_eq!(record.export_identifier, "iconChevronDoubleDown");
    assert_eq!(record.local_symbol, "chevronDoubleDown");
}

#[test]
fn label_with_prefix_shape_is_exported_unchanged() {
    let record = strip_namer().name("Icon Home.svg", 24).unwrap();
    assert_eq!(record.final_file_name, "icon-home.svg");
    assert_eq!(record.local_symbol, "iconHome");
    assert_eq!(record.export_identifier, "iconHome");
}

#[test]
fn identifiers_must_be_declarable() {
    assert!(strip_namer().name("Arrow Left", 24).unwrap().check_identifiers().is_ok());
    assert_eq!(
        keep_namer().name("Arrow Left", 24).unwrap().check_identifiers(),
        Err(NamingError::InvalidIdentifier {
            symbol: "arrow-Left".to_string()
        })
    );
    assert!(strip_namer().name("1st Place", 24).unwrap().check_identifiers().is_err());

    assert!(is_valid_identifier("iconHome_2$"));
    assert!(!is_valid_identifier("arrow-left"));
    assert!(!is_valid_identifier("2home"));
    assert!(!is_valid_identifier(""));
}

#[test]
fn blank_names_are_rejected() {
    assert_eq!(
        strip_namer().name("   .svg", 24),
        Err(NamingError::EmptyName {
            raw: "   .svg".to_string()
        })
    );
    assert!(strip_namer().name("--", 24).is_err());
}

#[test]
fn prefix_detection() {
    assert!(is_prefixed("icon", "iconHome"));
    assert!(!is_prefixed("icon", "icons"));
    assert!(!is_prefixed("icon", "home"));
    assert!(!is_prefixed("", "Home"));
    assert_eq!(prefixed_identifier("icon", "home", DashPolicy::Strip), "iconHome");
    assert_eq!(prefixed_identifier("icon", "arrow-left", DashPolicy::Strip), "iconArrowLeft");
    assert_eq!(prefixed_identifier("icon", "arrow-left", DashPolicy::Keep), "iconArrow-left");
}

#[test]
fn registry_reports_file_name_collision_with_both_owners() {
    let namer = strip_namer();
    let registry = NameRegistry::new();
    let first = namer.name("home.svg", 24).unwrap();
    let second = namer.name("Home.svg", 24).unwrap();

    registry.claim("home.svg", &first).unwrap();
    let err = registry.claim("Home.svg", &second).unwrap_err();
    assert_eq!(err.kind, CollisionKind::FileName);
    assert_eq!(err.name, "home.svg");
    assert_eq!(err.first, "home.svg");
    assert_eq!(err.second, "Home.svg");
}

#[test]
fn registry_reports_identifier_collision() {
    let namer = strip_namer();
    let registry = NameRegistry::new();
    let plain = namer.name("Home.svg", 24).unwrap();
    let prefixed = namer.name("Icon Home.svg", 24).unwrap();
    assert_ne!(plain.final_file_name, prefixed.final_file_name);

    registry.claim("Home.svg", &plain).unwrap();
    let err = registry.claim("Icon Home.svg", &prefixed).unwrap_err();
    assert_eq!(err.kind, CollisionKind::Identifier);
    assert_eq!(err.name, "iconHome");
}

#[test]
fn failed_claim_takes_neither_name() {
    let namer = strip_namer();
    let registry = NameRegistry::new();
    registry.reserve_file_name("icon-home.svg", "other.svg");

    let prefixed = namer.name("Icon Home.svg", 24).unwrap();
    assert!(registry.claim("Icon Home.svg", &prefixed).is_err());

    // The identifier was not taken by the failed claim.
    let plain = namer.name("Home.svg", 24).unwrap();
    assert!(registry.claim("Home.svg", &plain).is_ok());
}

#[test]
fn same_owner_may_claim_its_reserved_name() {
    let registry = NameRegistry::new();
    registry.reserve_file_name("home.svg", "home.svg");
    let record = strip_namer().name("home.svg", 24).unwrap();
    assert!(registry.claim("home.svg", &record).is_ok());
}

#[test]
fn suffix_policy_disambiguates() {
    let namer = strip_namer();
    let registry = NameRegistry::new();
    let first = namer.name("home.svg", 24).unwrap();
    let second = namer.name("Home.svg", 24).unwrap();
    registry.claim("home.svg", &first).unwrap();

    match registry.resolve(&namer, "Home.svg", second, CollisionPolicy::Suffix) {
        Resolution::Claimed(record) => {
            assert_eq!(record.final_file_name, "home-2.svg");
            assert_eq!(record.export_identifier, "iconHome2");
        }
        Resolution::Collided(c) => panic!("expected a suffixed name, got {c}"),
    }
}

#[test]
fn warn_and_reject_policies_report_the_collision() {
    for policy in [CollisionPolicy::Warn, CollisionPolicy::Reject] {
        let namer = strip_namer();
        let registry = NameRegistry::new();
        registry
            .claim("home.svg", &namer.name("home.svg", 24).unwrap())
            .unwrap();
        let second = namer.name("Home.svg", 24).unwrap();
        assert!(matches!(
            registry.resolve(&namer, "Home.svg", second, policy),
            Resolution::Collided(_)
        ));
    }
}

#[test]
fn registry_is_shared_safely_between_threads() {
    let namer = strip_namer();
    let registry = Arc::new(NameRegistry::new());
    let record = namer.name("home.svg", 24).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let record = record.clone();
            std::thread::spawn(move || registry.claim(&format!("owner-{i}"), &record).is_ok())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
}
