//! Command layer over the sheet and the store.
//!
//! Every mutation runs against a working copy of the sheet. The copy only
//! replaces the visible state once the store has acknowledged the commit,
//! so a failed write leaves callers looking at exactly the pre-mutation
//! sheet; there is no optimistic state to roll back. Mutations that change
//! nothing (an idempotent retry) skip the store write and keep the
//! revision untouched.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Fraction, MatchId, MatchInfo, PlayerId, Quarter, QuarterScore};
use crate::sheet::{FieldOccupancy, MatchSheet, Substitution};
use crate::store::SheetStore;

pub struct LineupEngine<S: SheetStore> {
    store: S,
    sheet: MatchSheet,
}

impl<S: SheetStore> LineupEngine<S> {
    /// Starts a fresh sheet for a match and persists the baseline.
    pub fn create(mut store: S, info: MatchInfo) -> Result<Self> {
        let sheet = MatchSheet::new(info);
        store.commit(&sheet)?;
        log::info!("Created lineup sheet for match {}", sheet.info.id);
        Ok(Self { store, sheet })
    }

    /// Opens the stored sheet for a match.
    pub fn open(store: S, match_id: MatchId) -> Result<Self> {
        let sheet = store.load(match_id)?;
        log::debug!("Opened match {} at revision {}", match_id, sheet.revision);
        Ok(Self { store, sheet })
    }

    /// The last known-good sheet. Callers render from this and nothing else.
    pub fn sheet(&self) -> &MatchSheet {
        &self.sheet
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Clone, mutate, commit, swap. The visible sheet changes only after
    /// the store acknowledges; on any error it is byte-for-byte untouched.
    fn commit_mutation<T>(
        &mut self,
        mutate: impl FnOnce(&mut MatchSheet) -> Result<T>,
    ) -> Result<T> {
        let mut next = self.sheet.clone();
        let out = mutate(&mut next)?;

        if next == self.sheet {
            // No-op mutation: nothing to persist, revision stays put.
            return Ok(out);
        }

        next.revision += 1;
        next.touch();
        self.store.commit(&next)?;
        self.sheet = next;
        Ok(out)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub fn set_call_ups(&mut self, players: impl IntoIterator<Item = PlayerId>) -> Result<()> {
        let players: Vec<PlayerId> = players.into_iter().collect();
        self.commit_mutation(|sheet| {
            sheet.set_call_ups(players);
            Ok(())
        })?;
        log::debug!(
            "Match {}: call-up set now has {} players",
            self.sheet.info.id,
            self.sheet.call_ups().len()
        );
        Ok(())
    }

    pub fn assign(&mut self, quarter: Quarter, player: PlayerId, fraction: Fraction) -> Result<()> {
        self.commit_mutation(|sheet| sheet.assign(quarter, player, fraction))
    }

    /// Creates an active pair and credits both players `Half`. Returns the
    /// new substitution id.
    pub fn apply_substitution(
        &mut self,
        quarter: Quarter,
        player_out: PlayerId,
        player_in: PlayerId,
    ) -> Result<String> {
        let id =
            self.commit_mutation(|sheet| sheet.apply_substitution(quarter, player_out, player_in))?;
        log::info!(
            "Match {}: substitution in {} ({} out, {} in)",
            self.sheet.info.id,
            quarter,
            player_out,
            player_in
        );
        Ok(id)
    }

    /// Reverses an active pair, restoring the exact pre-pairing fractions.
    pub fn remove_substitution(
        &mut self,
        quarter: Quarter,
        player_out: PlayerId,
        player_in: PlayerId,
    ) -> Result<()> {
        self.commit_mutation(|sheet| sheet.remove_substitution(quarter, player_out, player_in))?;
        log::info!(
            "Match {}: reversed substitution in {} ({} out, {} in)",
            self.sheet.info.id,
            quarter,
            player_out,
            player_in
        );
        Ok(())
    }

    /// Records a team goal; returns the new event id.
    pub fn add_goal(
        &mut self,
        quarter: Quarter,
        scorer: PlayerId,
        assister: Option<PlayerId>,
    ) -> Result<String> {
        self.commit_mutation(|sheet| sheet.add_goal(quarter, scorer, assister))
    }

    pub fn remove_goal(&mut self, goal_id: &str) -> Result<()> {
        self.commit_mutation(|sheet| sheet.remove_goal(goal_id))
    }

    pub fn set_opponent_goals(&mut self, quarter: Quarter, count: u8) -> Result<()> {
        self.commit_mutation(|sheet| {
            sheet.set_opponent_goals(quarter, count);
            Ok(())
        })
    }

    // ========================================================================
    // Reads (straight off the visible sheet)
    // ========================================================================

    pub fn quarter_fractions(&self, quarter: Quarter) -> BTreeMap<PlayerId, Fraction> {
        self.sheet.quarter_fractions(quarter)
    }

    pub fn periods_played(&self, player: PlayerId) -> f64 {
        self.sheet.periods_played(player)
    }

    pub fn field_occupancy(&self, quarter: Quarter) -> FieldOccupancy {
        self.sheet.field_occupancy(quarter)
    }

    pub fn substitutions(&self, quarter: Quarter) -> Vec<&Substitution> {
        self.sheet.substitutions(quarter)
    }

    pub fn team_goals(&self, quarter: Quarter) -> u8 {
        self.sheet.team_goals(quarter)
    }

    pub fn quarter_score(&self, quarter: Quarter) -> QuarterScore {
        self.sheet.quarter_score(quarter)
    }

    pub fn totals(&self) -> (u32, u32) {
        self.sheet.totals()
    }
}

#[cfg(test)]
mod tests;
