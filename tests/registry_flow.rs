//! Session registry: create, advance with and without a choice, snapshot

use std::sync::Arc;

use ambition_realm::rules::KnowledgeBase;
use ambition_realm::session::{SessionId, SessionRegistry};
use ambition_realm::{SimError, SimulationConfig};

fn registry() -> SessionRegistry {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/rules.toml");
    let kb = KnowledgeBase::load(path.as_ref()).unwrap();
    SessionRegistry::new(Arc::new(kb), SimulationConfig::default())
}

#[test]
fn test_sessions_are_independent() {
    let mut reg = registry();
    let a = reg.create("I will conquer the world", Some(5));
    let b = reg.create("I will conquer the world", Some(5));
    assert_ne!(a, b);

    let choice = reg.get(a).unwrap().proposals()[0].id.clone();
    let report = reg.advance(a, Some(&choice)).unwrap();
    assert_eq!(report.tick, 1);
    assert_eq!(reg.get(a).unwrap().tick(), 1);
    assert_eq!(reg.get(b).unwrap().tick(), 0);

    reg.advance(b, Some(&choice)).unwrap();
    assert_eq!(reg.snapshot(a).unwrap(), reg.snapshot(b).unwrap());
}

#[test]
fn test_bad_choice_is_rejected_without_advancing() {
    let mut reg = registry();
    let id = reg.create("build beautiful things", Some(9));
    let err = reg.advance(id, Some("not_a_real_action")).unwrap_err();
    assert!(matches!(err, SimError::InvalidArgument(_)));
    assert_eq!(reg.get(id).unwrap().tick(), 0);

    let report = reg.advance(id, None).unwrap();
    assert_eq!(report.tick, 1);
    assert!(report.chosen.is_none());
}

#[test]
fn test_unknown_session() {
    let mut reg = registry();
    let ghost = SessionId::new();
    assert!(reg.get(ghost).is_none());
    assert!(matches!(reg.advance(ghost, None), Err(SimError::InvalidArgument(_))));
    assert!(matches!(
        reg.resolve_event(ghost, "omen-r0-t1", "dismiss"),
        Err(SimError::InvalidArgument(_))
    ));
    assert!(reg.remove(ghost).is_none());
}
