use super::*;
use crate::models::{Fraction, MatchId, MatchInfo, PlayerId, Quarter, TeamId};
use crate::store::{MemoryStore, SheetStore, StoreError};

fn info() -> MatchInfo {
    MatchInfo {
        id: MatchId(1),
        team: TeamId(2),
        date: chrono::NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
        opponent: "Northfield".to_string(),
    }
}

fn engine() -> LineupEngine<MemoryStore> {
    LineupEngine::create(MemoryStore::new(), info()).unwrap()
}

/// Store wrapper whose commits can be failed from outside, for rollback
/// tests.
struct FlakyStore {
    inner: MemoryStore,
    failing: std::rc::Rc<std::cell::Cell<bool>>,
}

impl FlakyStore {
    fn new() -> (Self, std::rc::Rc<std::cell::Cell<bool>>) {
        let failing = std::rc::Rc::new(std::cell::Cell::new(false));
        (Self { inner: MemoryStore::new(), failing: failing.clone() }, failing)
    }
}

impl SheetStore for FlakyStore {
    fn commit(&mut self, sheet: &MatchSheet) -> std::result::Result<(), StoreError> {
        if self.failing.get() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "store offline",
            )));
        }
        self.inner.commit(sheet)
    }

    fn load(&self, match_id: MatchId) -> std::result::Result<MatchSheet, StoreError> {
        self.inner.load(match_id)
    }

    fn remove(&mut self, match_id: MatchId) -> std::result::Result<(), StoreError> {
        self.inner.remove(match_id)
    }

    fn list_matches(&self) -> std::result::Result<Vec<MatchId>, StoreError> {
        self.inner.list_matches()
    }
}

#[test]
fn test_create_then_open_round_trip() {
    let mut engine = engine();
    engine.set_call_ups((1..=7).map(PlayerId)).unwrap();
    engine.assign(Quarter::Q1, PlayerId(1), Fraction::Full).unwrap();

    let store = engine.into_store();
    let reopened = LineupEngine::open(store, MatchId(1)).unwrap();
    assert_eq!(reopened.sheet().revision, 2);
    assert_eq!(reopened.quarter_fractions(Quarter::Q1)[&PlayerId(1)], Fraction::Full);
}

#[test]
fn test_revision_bumps_once_per_committed_mutation() {
    let mut engine = engine();
    assert_eq!(engine.sheet().revision, 0);

    engine.set_call_ups((1..=7).map(PlayerId)).unwrap();
    assert_eq!(engine.sheet().revision, 1);

    engine.assign(Quarter::Q1, PlayerId(2), Fraction::Full).unwrap();
    assert_eq!(engine.sheet().revision, 2);

    // Identical assignment: accepted, but nothing to commit.
    engine.assign(Quarter::Q1, PlayerId(2), Fraction::Full).unwrap();
    assert_eq!(engine.sheet().revision, 2);

    // Unchanged opponent score is a no-op too.
    engine.set_opponent_goals(Quarter::Q1, 0).unwrap();
    assert_eq!(engine.sheet().revision, 2);
}

#[test]
fn test_store_failure_leaves_visible_sheet_untouched() {
    let (store, failing) = FlakyStore::new();
    let mut engine = LineupEngine::create(store, info()).unwrap();
    engine.set_call_ups((1..=8).map(PlayerId)).unwrap();
    engine.assign(Quarter::Q1, PlayerId(1), Fraction::Full).unwrap();

    let snapshot = engine.sheet().clone();

    // Mutations validate fine but the authoritative write fails.
    failing.set(true);
    let err = engine.assign(Quarter::Q1, PlayerId(2), Fraction::Full).unwrap_err();
    assert!(matches!(err, crate::LineupError::Persistence(_)));
    assert_eq!(*engine.sheet(), snapshot);

    let err = engine.apply_substitution(Quarter::Q1, PlayerId(1), PlayerId(2)).unwrap_err();
    assert!(matches!(err, crate::LineupError::Persistence(_)));
    assert_eq!(*engine.sheet(), snapshot);

    let err = engine.add_goal(Quarter::Q1, PlayerId(1), None).unwrap_err();
    assert!(matches!(err, crate::LineupError::Persistence(_)));
    assert_eq!(*engine.sheet(), snapshot);

    // The store recovering lets the same mutation through unchanged.
    failing.set(false);
    engine.assign(Quarter::Q1, PlayerId(2), Fraction::Full).unwrap();
    assert_eq!(engine.sheet().revision, snapshot.revision + 1);
}

#[test]
fn test_validation_failure_never_reaches_the_store() {
    let mut engine = engine();
    engine.set_call_ups((1..=7).map(PlayerId)).unwrap();
    let revision = engine.sheet().revision;

    // Invalid pair: both on the bench.
    assert!(engine.apply_substitution(Quarter::Q1, PlayerId(1), PlayerId(2)).is_err());
    assert_eq!(engine.sheet().revision, revision);
}

#[test]
fn test_substitution_flow_through_engine() {
    let mut engine = engine();
    engine.set_call_ups((1..=8).map(PlayerId)).unwrap();
    for p in 1..=7 {
        engine.assign(Quarter::Q2, PlayerId(p), Fraction::Full).unwrap();
    }

    let id = engine.apply_substitution(Quarter::Q2, PlayerId(7), PlayerId(8)).unwrap();
    assert!(!id.is_empty());
    assert_eq!(engine.substitutions(Quarter::Q2).len(), 1);
    assert_eq!(engine.field_occupancy(Quarter::Q2).slots_used(), 7);

    engine.remove_substitution(Quarter::Q2, PlayerId(7), PlayerId(8)).unwrap();
    assert_eq!(engine.substitutions(Quarter::Q2).len(), 0);
    assert_eq!(engine.periods_played(PlayerId(7)), 1.0);
    assert_eq!(engine.periods_played(PlayerId(8)), 0.0);
}

#[test]
fn test_goal_flow_through_engine() {
    let mut engine = engine();
    engine.set_call_ups((1..=7).map(PlayerId)).unwrap();

    let goal = engine.add_goal(Quarter::Q4, PlayerId(5), Some(PlayerId(6))).unwrap();
    engine.set_opponent_goals(Quarter::Q4, 2).unwrap();
    assert_eq!(engine.team_goals(Quarter::Q4), 1);
    assert_eq!(engine.totals(), (1, 2));

    engine.remove_goal(&goal).unwrap();
    assert_eq!(engine.totals(), (0, 2));
}
