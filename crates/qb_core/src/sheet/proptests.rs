//! Property-based checks for the capacity invariant and the substitution
//! round-trip law.

use proptest::prelude::*;

use super::*;
use crate::models::{MatchId, TeamId};
use crate::FIELD_SLOTS;

const SQUAD: u64 = 10;

fn test_sheet() -> MatchSheet {
    let mut sheet = MatchSheet::new(MatchInfo {
        id: MatchId(1),
        team: TeamId(1),
        date: chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        opponent: "Prop FC".to_string(),
    });
    sheet.set_call_ups((1..=SQUAD).map(PlayerId));
    sheet
}

#[derive(Debug, Clone)]
enum Op {
    Assign(Quarter, PlayerId, Fraction),
    ApplySub(Quarter, PlayerId, PlayerId),
    RemoveSub(Quarter, PlayerId, PlayerId),
    AddGoal(Quarter, PlayerId),
    SetOpponentGoals(Quarter, u8),
}

fn quarter_strategy() -> impl Strategy<Value = Quarter> {
    prop_oneof![
        Just(Quarter::Q1),
        Just(Quarter::Q2),
        Just(Quarter::Q3),
        Just(Quarter::Q4),
    ]
}

fn player_strategy() -> impl Strategy<Value = PlayerId> {
    (1..=SQUAD).prop_map(PlayerId)
}

fn fraction_strategy() -> impl Strategy<Value = Fraction> {
    prop_oneof![Just(Fraction::None), Just(Fraction::Half), Just(Fraction::Full)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (quarter_strategy(), player_strategy(), fraction_strategy())
            .prop_map(|(q, p, f)| Op::Assign(q, p, f)),
        (quarter_strategy(), player_strategy(), player_strategy())
            .prop_map(|(q, a, b)| Op::ApplySub(q, a, b)),
        (quarter_strategy(), player_strategy(), player_strategy())
            .prop_map(|(q, a, b)| Op::RemoveSub(q, a, b)),
        (quarter_strategy(), player_strategy()).prop_map(|(q, p)| Op::AddGoal(q, p)),
        (quarter_strategy(), 0u8..6).prop_map(|(q, n)| Op::SetOpponentGoals(q, n)),
    ]
}

fn apply_op(sheet: &mut MatchSheet, op: &Op) {
    // Rejected operations are part of the property: they must leave the
    // sheet untouched, which the snapshot comparison below verifies.
    let before = sheet.clone();
    let result: Result<()> = match op {
        Op::Assign(q, p, f) => sheet.assign(*q, *p, *f),
        Op::ApplySub(q, a, b) => sheet.apply_substitution(*q, *a, *b).map(|_| ()),
        Op::RemoveSub(q, a, b) => sheet.remove_substitution(*q, *a, *b),
        Op::AddGoal(q, p) => sheet.add_goal(*q, *p, None).map(|_| ()),
        Op::SetOpponentGoals(q, n) => {
            sheet.set_opponent_goals(*q, *n);
            Ok(())
        }
    };
    if result.is_err() {
        assert_eq!(*sheet, before, "failed op mutated the sheet: {op:?}");
    }
}

proptest! {
    /// No sequence of operations can exceed seven
    /// field-equivalent slots in any quarter, and the structural
    /// invariants hold after every step.
    #[test]
    fn prop_capacity_invariant_holds(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut sheet = test_sheet();
        for op in &ops {
            apply_op(&mut sheet, op);
            for q in Quarter::ALL {
                prop_assert!(sheet.full_count(q) + sheet.active_pairs(q) <= FIELD_SLOTS);
            }
            prop_assert!(sheet.check_invariants().is_ok());
        }
    }

    /// Round-trip law: whenever apply succeeds, an immediate remove with
    /// the same arguments restores the exact prior sheet state.
    #[test]
    fn prop_substitution_round_trip(
        setup in prop::collection::vec(op_strategy(), 0..40),
        q in quarter_strategy(),
        a in player_strategy(),
        b in player_strategy(),
    ) {
        let mut sheet = test_sheet();
        for op in &setup {
            apply_op(&mut sheet, op);
        }

        let before = sheet.clone();
        if sheet.apply_substitution(q, a, b).is_ok() {
            sheet.remove_substitution(q, a, b).unwrap();
            prop_assert_eq!(sheet, before);
        }
    }

    /// Periods played is always the sum of the four
    /// per-quarter fraction values.
    #[test]
    fn prop_periods_played_matches_ledger(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut sheet = test_sheet();
        for op in &ops {
            apply_op(&mut sheet, op);
        }
        for p in (1..=SQUAD).map(PlayerId) {
            let expected: f64 = Quarter::ALL.iter().map(|&q| sheet.fraction(q, p).value()).sum();
            prop_assert_eq!(sheet.periods_played(p), expected);
        }
    }
}
