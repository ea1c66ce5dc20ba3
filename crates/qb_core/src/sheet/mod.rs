//! Per-match lineup state: call-ups, the quarter fraction ledger, active
//! substitution pairs and the quarter outcome ledger.
//!
//! `MatchSheet` is pure state plus invariant-checked mutations. It never
//! talks to storage; the engine layer clones a sheet, mutates the clone and
//! only swaps it in once the store has acknowledged the write.

pub mod occupancy;

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LineupError, Result};
use crate::models::{Fraction, GoalEvent, MatchInfo, PlayerId, Quarter, QuarterScore};
use crate::{FIELD_SLOTS, MIN_CALL_UPS};

pub use occupancy::FieldOccupancy;

/// One active mid-quarter swap. Both members hold `Half` while the pair is
/// active; together they occupy exactly one field slot.
///
/// The pre-pairing fractions are carried on the row so that reversal
/// restores them exactly, never an approximation. `prev_out` is always
/// `Full` by the pairing precondition; `prev_in` is `None`, or `Half` when
/// the incoming player held an unpaired bench half.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub id: String,
    pub quarter: Quarter,
    pub player_out: PlayerId,
    pub player_in: PlayerId,
    pub prev_out: Fraction,
    pub prev_in: Fraction,
}

/// The authoritative lineup state for one match.
///
/// Absent ledger rows are equivalent to `Fraction::None`; the map only
/// stores non-`None` entries. `revision` increases by exactly one per
/// committed mutation and is the stale-write token stores check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSheet {
    pub info: MatchInfo,
    pub revision: u64,
    /// Last mutation timestamp (unix milliseconds).
    pub updated_at_ms: u64,
    call_ups: BTreeSet<PlayerId>,
    assignments: BTreeMap<(Quarter, PlayerId), Fraction>,
    substitutions: Vec<Substitution>,
    goals: Vec<GoalEvent>,
    opponent_goals: BTreeMap<Quarter, u8>,
}

impl MatchSheet {
    pub fn new(info: MatchInfo) -> Self {
        Self {
            info,
            revision: 0,
            updated_at_ms: current_timestamp(),
            call_ups: BTreeSet::new(),
            assignments: BTreeMap::new(),
            substitutions: Vec::new(),
            goals: Vec::new(),
            opponent_goals: BTreeMap::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at_ms = current_timestamp();
    }

    // ========================================================================
    // Call-Up Registry
    // ========================================================================

    /// Replaces the call-up set for this match.
    ///
    /// Shrinking below the minimum does not clear existing assignments or
    /// pairs; it only blocks further lineup mutations.
    pub fn set_call_ups(&mut self, players: impl IntoIterator<Item = PlayerId>) {
        self.call_ups = players.into_iter().collect();
    }

    /// The call-up set. No ordering guarantee is part of the contract.
    pub fn call_ups(&self) -> &BTreeSet<PlayerId> {
        &self.call_ups
    }

    pub fn is_called_up(&self, player: PlayerId) -> bool {
        self.call_ups.contains(&player)
    }

    fn require_min_call_ups(&self) -> Result<()> {
        let found = self.call_ups.len();
        if found < MIN_CALL_UPS {
            return Err(LineupError::IncompleteCallUp { found });
        }
        Ok(())
    }

    fn require_called_up(&self, player: PlayerId) -> Result<()> {
        if !self.is_called_up(player) {
            return Err(LineupError::NotFound {
                what: format!("call-up for player {} in match {}", player, self.info.id),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Quarter Assignment Ledger
    // ========================================================================

    /// A player's fraction in a quarter. Absent row means `None`.
    pub fn fraction(&self, quarter: Quarter, player: PlayerId) -> Fraction {
        self.assignments.get(&(quarter, player)).copied().unwrap_or_default()
    }

    /// Per-player fraction map for a quarter, covering every called-up
    /// player plus any leftover assignment rows from before a call-up edit.
    pub fn quarter_fractions(&self, quarter: Quarter) -> BTreeMap<PlayerId, Fraction> {
        let mut map: BTreeMap<PlayerId, Fraction> =
            self.call_ups.iter().map(|&p| (p, Fraction::None)).collect();
        for (&(q, p), &f) in &self.assignments {
            if q == quarter {
                map.insert(p, f);
            }
        }
        map
    }

    /// Total participation credit across all four quarters.
    pub fn periods_played(&self, player: PlayerId) -> f64 {
        Quarter::ALL.iter().map(|&q| self.fraction(q, player).value()).sum()
    }

    fn set_fraction(&mut self, quarter: Quarter, player: PlayerId, fraction: Fraction) {
        if fraction.is_none() {
            self.assignments.remove(&(quarter, player));
        } else {
            self.assignments.insert((quarter, player), fraction);
        }
    }

    /// Directly sets a player's fraction for a quarter (drag-to-field or
    /// drag-to-bench).
    ///
    /// A player who is one side of an active pair cannot be reassigned
    /// directly; the pair must be reversed first so it never becomes
    /// orphaned. The capacity gate only applies when the write raises slot
    /// occupancy, i.e. a new `Full` in the quarter.
    pub fn assign(&mut self, quarter: Quarter, player: PlayerId, fraction: Fraction) -> Result<()> {
        self.require_min_call_ups()?;
        self.require_called_up(player)?;

        if self.pair_for(quarter, player).is_some() {
            return Err(LineupError::InvalidSubstitutionPair {
                reason: format!(
                    "player {player} is part of an active pair in {quarter}; remove the substitution first"
                ),
            });
        }

        let current = self.fraction(quarter, player);
        if current == fraction {
            return Ok(());
        }

        if fraction.is_full() {
            let full = self.full_count(quarter);
            let pairs = self.active_pairs(quarter);
            if full + pairs + 1 > FIELD_SLOTS {
                return Err(LineupError::CapacityExceeded { quarter, full, pairs });
            }
        }

        self.set_fraction(quarter, player, fraction);
        Ok(())
    }

    /// Players holding `Full` in a quarter.
    pub fn full_count(&self, quarter: Quarter) -> usize {
        self.assignments.iter().filter(|(&(q, _), f)| q == quarter && f.is_full()).count()
    }

    /// Field/bench partition for one quarter. See [`occupancy`].
    pub fn field_occupancy(&self, quarter: Quarter) -> FieldOccupancy {
        occupancy::field_occupancy(self, quarter)
    }

    // ========================================================================
    // Substitution Coordinator
    // ========================================================================

    /// Active pairs for a quarter, in creation order.
    pub fn substitutions(&self, quarter: Quarter) -> Vec<&Substitution> {
        self.substitutions.iter().filter(|s| s.quarter == quarter).collect()
    }

    /// All active pairs across the match.
    pub fn all_substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Number of active pairs in a quarter. Each consumes one field slot.
    pub fn active_pairs(&self, quarter: Quarter) -> usize {
        self.substitutions.iter().filter(|s| s.quarter == quarter).count()
    }

    /// The active pair a player belongs to in a quarter, if any.
    pub fn pair_for(&self, quarter: Quarter, player: PlayerId) -> Option<&Substitution> {
        self.substitutions
            .iter()
            .find(|s| s.quarter == quarter && (s.player_out == player || s.player_in == player))
    }

    /// Links `player_out` (on the field) and `player_in` (on the bench) as
    /// an active pair, crediting both `Half`. Returns the new pair's id.
    ///
    /// Swapping one `Full` for one pair leaves slot occupancy unchanged, so
    /// no capacity re-check is needed beyond the occupancy preconditions.
    pub fn apply_substitution(
        &mut self,
        quarter: Quarter,
        player_out: PlayerId,
        player_in: PlayerId,
    ) -> Result<String> {
        self.require_min_call_ups()?;

        if player_out == player_in {
            return Err(LineupError::InvalidSubstitutionPair {
                reason: "a substitution needs two distinct players".to_string(),
            });
        }
        self.require_called_up(player_out)?;
        self.require_called_up(player_in)?;

        for &player in &[player_out, player_in] {
            if self.pair_for(quarter, player).is_some() {
                return Err(LineupError::InvalidSubstitutionPair {
                    reason: format!("player {player} is already part of an active pair in {quarter}"),
                });
            }
        }

        let prev_out = self.fraction(quarter, player_out);
        let prev_in = self.fraction(quarter, player_in);

        // Unpaired players occupy a slot iff Full; unpaired Half is bench.
        if !prev_out.is_full() {
            return Err(LineupError::InvalidSubstitutionPair {
                reason: format!("player {player_out} does not occupy a field slot in {quarter}"),
            });
        }
        if prev_in.is_full() {
            return Err(LineupError::InvalidSubstitutionPair {
                reason: format!("player {player_in} already occupies a field slot in {quarter}"),
            });
        }

        self.set_fraction(quarter, player_out, Fraction::Half);
        self.set_fraction(quarter, player_in, Fraction::Half);
        let id = Uuid::new_v4().to_string();
        self.substitutions.push(Substitution {
            id: id.clone(),
            quarter,
            player_out,
            player_in,
            prev_out,
            prev_in,
        });

        Ok(id)
    }

    /// Reverses an active pair, restoring the exact pre-pairing fractions
    /// and deleting the row.
    ///
    /// Like every other lineup mutation this is blocked below the call-up
    /// minimum; a pair stranded by a call-up edit stays in place until the
    /// set is brought back to strength.
    pub fn remove_substitution(
        &mut self,
        quarter: Quarter,
        player_out: PlayerId,
        player_in: PlayerId,
    ) -> Result<()> {
        self.require_min_call_ups()?;

        let idx = self
            .substitutions
            .iter()
            .position(|s| {
                s.quarter == quarter && s.player_out == player_out && s.player_in == player_in
            })
            .ok_or_else(|| LineupError::NotFound {
                what: format!(
                    "active substitution ({player_out} out, {player_in} in) in {quarter}"
                ),
            })?;

        let sub = self.substitutions.remove(idx);
        self.set_fraction(quarter, sub.player_out, sub.prev_out);
        self.set_fraction(quarter, sub.player_in, sub.prev_in);
        Ok(())
    }

    // ========================================================================
    // Quarter Outcome Ledger
    // ========================================================================

    /// Records one team goal. The scorer (and assister, if any) must be
    /// called up, but deliberately need not have taken the field in that
    /// quarter: lineup data may arrive after the score sheet is filled in.
    pub fn add_goal(
        &mut self,
        quarter: Quarter,
        scorer: PlayerId,
        assister: Option<PlayerId>,
    ) -> Result<String> {
        self.require_called_up(scorer)?;
        if let Some(a) = assister {
            if a == scorer {
                return Err(LineupError::Validation(format!(
                    "player {scorer} cannot assist their own goal"
                )));
            }
            self.require_called_up(a)?;
        }

        let event = GoalEvent::new(quarter, scorer, assister);
        let id = event.id.clone();
        self.goals.push(event);
        Ok(id)
    }

    /// Deletes one goal event by id.
    pub fn remove_goal(&mut self, goal_id: &str) -> Result<()> {
        let idx = self
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| LineupError::NotFound { what: format!("goal event {goal_id}") })?;
        self.goals.remove(idx);
        Ok(())
    }

    /// Goal events in stable insertion order.
    pub fn goals(&self) -> &[GoalEvent] {
        &self.goals
    }

    /// Sets the opponent's goal count for a quarter.
    pub fn set_opponent_goals(&mut self, quarter: Quarter, count: u8) {
        if count == 0 {
            self.opponent_goals.remove(&quarter);
        } else {
            self.opponent_goals.insert(quarter, count);
        }
    }

    pub fn opponent_goals(&self, quarter: Quarter) -> u8 {
        self.opponent_goals.get(&quarter).copied().unwrap_or(0)
    }

    /// Team goals for a quarter, always derived from the event list.
    /// Saturates at 255 rather than wrapping on absurd event counts.
    pub fn team_goals(&self, quarter: Quarter) -> u8 {
        let count = self.goals.iter().filter(|g| g.quarter == quarter).count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    pub fn quarter_score(&self, quarter: Quarter) -> QuarterScore {
        QuarterScore {
            team_goals: self.team_goals(quarter),
            opponent_goals: self.opponent_goals(quarter),
        }
    }

    /// Final score: (team, opponent) summed over all four quarters.
    pub fn totals(&self) -> (u32, u32) {
        Quarter::ALL.iter().fold((0, 0), |(t, o), &q| {
            (t + self.team_goals(q) as u32, o + self.opponent_goals(q) as u32)
        })
    }

    // ========================================================================
    // Consistency check
    // ========================================================================

    /// Full-state consistency check, run on store load and in tests.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for q in Quarter::ALL {
            let full = self.full_count(q);
            let pairs = self.active_pairs(q);
            if full + pairs > FIELD_SLOTS {
                return Err(format!("{q}: {full} full + {pairs} pairs exceeds {FIELD_SLOTS} slots"));
            }

            let mut seen = BTreeSet::new();
            for sub in self.substitutions.iter().filter(|s| s.quarter == q) {
                for &p in &[sub.player_out, sub.player_in] {
                    if !seen.insert(p) {
                        return Err(format!("{q}: player {p} is in two active pairs"));
                    }
                    if self.fraction(q, p) != Fraction::Half {
                        return Err(format!("{q}: paired player {p} is not at half fraction"));
                    }
                }
            }
        }

        let mut goal_ids = BTreeSet::new();
        for g in &self.goals {
            if !goal_ids.insert(g.id.as_str()) {
                return Err(format!("duplicate goal event id {}", g.id));
            }
        }
        Ok(())
    }
}

fn current_timestamp() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}


#[cfg(test)]
mod proptests;
