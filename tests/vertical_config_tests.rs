//! Integration tests for the vertical ordering configuration.
//!
//! Tests the filtering and cycling behavior:
//! - entries without a constructor are dropped
//! - duplicate keys and names keep the first entry and report a warning
//! - next_after wraps, falls back to the first entry, and is empty-safe
//! - next_after answers the same for the same argument

mod common;

use common::{alpha_factory, beta_factory, failing_factory};
use motibeam::error::{ErrorKind, OrchestrationError, Recovery};
use motibeam::modules::ModuleFactory;
use motibeam::verticals::{metadata, RawVerticalEntry, VerticalOrderingConfig};

fn same_factory(a: ModuleFactory, b: ModuleFactory) -> bool {
    a as usize == b as usize
}

#[test]
fn test_unavailable_vertical_is_filtered() {
    let config = VerticalOrderingConfig::from_raw(vec![
        RawVerticalEntry::new('1', "Wellness", Some(alpha_factory)),
        RawVerticalEntry::new('2', "Auto", None),
        RawVerticalEntry::new('3', "Security", Some(beta_factory)),
    ]);

    let active = config.active_entries();
    assert_eq!(active.len(), 2);
    assert_eq!((active[0].key, active[0].display_name.as_str()), ('1', "Wellness"));
    assert!(same_factory(active[0].constructor, alpha_factory));
    assert_eq!((active[1].key, active[1].display_name.as_str()), ('3', "Security"));
    assert!(same_factory(active[1].constructor, beta_factory));

    let next = config.next_after("Wellness").unwrap();
    assert_eq!(next.display_name, "Security");
    assert!(same_factory(next.constructor, beta_factory));
}

#[test]
fn test_next_after_wraps_and_handles_unknown() {
    let config = VerticalOrderingConfig::from_raw(vec![
        RawVerticalEntry::new('1', "Wellness", Some(alpha_factory)),
        RawVerticalEntry::new('2', "Security", Some(beta_factory)),
        RawVerticalEntry::new('3', "Emergency", Some(failing_factory)),
    ]);

    assert_eq!(config.next_after("Emergency").unwrap().display_name, "Wellness");
    assert_eq!(config.next_after("Nope").unwrap().display_name, "Wellness");
    assert_eq!(config.next_after("").unwrap().display_name, "Wellness");

    // Cycling through every entry returns to the start
    let mut current = "Wellness".to_string();
    for _ in 0..config.len() {
        current = config.next_after(&current).unwrap().display_name.clone();
    }
    assert_eq!(current, "Wellness");
}

#[test]
fn test_next_after_is_stable_for_same_argument() {
    let config = VerticalOrderingConfig::from_raw(vec![
        RawVerticalEntry::new('1', "Wellness", Some(alpha_factory)),
        RawVerticalEntry::new('2', "Security", Some(beta_factory)),
        RawVerticalEntry::new('3', "Emergency", Some(failing_factory)),
    ]);

    for current in ["Wellness", "Security", "Emergency", "Nope", ""] {
        let first = config.next_after(current).unwrap();
        let second = config.next_after(current).unwrap();
        assert_eq!(first.display_name, second.display_name);
        assert_eq!(first.key, second.key);
    }
    assert_eq!(config.len(), 3);
}

#[test]
fn test_single_entry_cycles_to_itself() {
    let config = VerticalOrderingConfig::from_raw(vec![RawVerticalEntry::new(
        '1',
        "Wellness",
        Some(alpha_factory),
    )]);
    assert_eq!(config.next_after("Wellness").unwrap().display_name, "Wellness");
}

#[test]
fn test_empty_config_has_no_next() {
    let config = VerticalOrderingConfig::from_raw(vec![RawVerticalEntry::new('1', "Auto", None)]);
    assert!(config.is_empty());
    assert!(config.next_after("Auto").is_none());
    assert!(config.next_after("").is_none());
}

#[test]
fn test_filtering_is_idempotent() {
    let raw = || {
        vec![
            RawVerticalEntry::new('1', "Wellness", Some(alpha_factory as ModuleFactory)),
            RawVerticalEntry::new('2', "Auto", None),
            RawVerticalEntry::new('3', "Security", Some(beta_factory as ModuleFactory)),
        ]
    };
    let once = VerticalOrderingConfig::from_raw(raw());
    let again = VerticalOrderingConfig::from_raw(
        once.active_entries()
            .iter()
            .map(|e| RawVerticalEntry::new(e.key, e.display_name.clone(), Some(e.constructor)))
            .collect(),
    );

    let names = |c: &VerticalOrderingConfig| {
        c.active_entries()
            .iter()
            .map(|e| (e.key, e.display_name.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&once), names(&again));
}

#[test]
fn test_duplicates_keep_first() {
    let config = VerticalOrderingConfig::from_raw(vec![
        RawVerticalEntry::new('1', "Wellness", Some(alpha_factory)),
        RawVerticalEntry::new('1', "Security", Some(beta_factory)),
        RawVerticalEntry::new('2', "Wellness", Some(beta_factory)),
        RawVerticalEntry::new('3', "Education", Some(beta_factory)),
    ]);

    let names: Vec<&str> = config
        .active_entries()
        .iter()
        .map(|e| e.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Wellness", "Education"]);
    assert!(same_factory(config.active_entries()[0].constructor, alpha_factory));

    assert_eq!(config.warnings().len(), 2);
    assert!(matches!(
        config.warnings()[0],
        OrchestrationError::DuplicateKey { key: '1', .. }
    ));
    assert!(matches!(
        &config.warnings()[1],
        OrchestrationError::DuplicateName(name) if name == "Wellness"
    ));
    for warning in config.warnings() {
        assert_eq!(warning.kind(), ErrorKind::Configuration);
        assert_eq!(warning.recovery(), Recovery::UseFilteredConfig);
    }
}

#[test]
fn test_unknown_name_uses_fallback_metadata() {
    let config = VerticalOrderingConfig::from_raw(vec![RawVerticalEntry::new(
        '9',
        "Retail",
        Some(alpha_factory),
    )]);
    assert_eq!(config.len(), 1);
    assert!(matches!(
        config.warnings(),
        [OrchestrationError::MissingMetadata(name)] if name == "Retail"
    ));
    assert_eq!(metadata("Retail").symbol, "[?]");
}

#[test]
fn test_lookup_helpers() {
    let config = VerticalOrderingConfig::builtin();
    let auto = config.by_key('2').unwrap();
    assert_eq!(auto.display_name, "Auto HUD");
    assert_eq!(config.starting_with("auto").unwrap().display_name, "Auto HUD");
    assert_eq!(config.position("Auto HUD"), Some(0));
    assert!(config.by_key('1').is_none());
}
