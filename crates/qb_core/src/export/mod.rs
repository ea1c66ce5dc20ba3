//! Outbound payload for the statistics consumer.
//!
//! The backend aggregation that turns recorded lineups into cross-match
//! formation reports lives elsewhere; this module only reshapes one sheet
//! into the table it consumes, keyed consistently by (quarter, player) so
//! a formation can be reconstructed as the slot holders of a quarter, each
//! tagged with its fraction for weighted credit.

use serde::{Deserialize, Serialize};

use crate::models::{Fraction, GoalEvent, MatchInfo, Player, PlayerId, Quarter, QuarterScore};
use crate::sheet::MatchSheet;

/// One row of the assignment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub quarter: Quarter,
    pub player: PlayerId,
    pub fraction: Fraction,
    /// Credit value of the fraction, duplicated for weighted aggregation.
    pub credit: f64,
}

/// One recorded pair as handed to statistics grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionRow {
    pub quarter: Quarter,
    pub player_out: PlayerId,
    pub player_in: PlayerId,
}

/// Slot holder within a formation: a player with the weight of their
/// participation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationMember {
    pub player: PlayerId,
    pub fraction: Fraction,
}

/// The players occupying field slots together in one quarter, with that
/// quarter's score line. The unit of downstream win/loss aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationExport {
    pub quarter: Quarter,
    pub members: Vec<FormationMember>,
    pub score: QuarterScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchExport {
    pub info: MatchInfo,
    pub revision: u64,
    pub call_ups: Vec<PlayerId>,
    pub assignments: Vec<AssignmentRow>,
    pub substitutions: Vec<SubstitutionRow>,
    pub goals: Vec<GoalEvent>,
    pub formations: Vec<FormationExport>,
    pub total_team_goals: u32,
    pub total_opponent_goals: u32,
    /// Display data for the called-up players, attached via
    /// [`MatchExport::with_roster`] when the caller has the roster at hand.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roster: Vec<Player>,
}

impl MatchExport {
    pub fn from_sheet(sheet: &MatchSheet) -> Self {
        let mut assignments = Vec::new();
        for q in Quarter::ALL {
            for (player, fraction) in sheet.quarter_fractions(q) {
                if fraction.is_none() {
                    continue;
                }
                assignments.push(AssignmentRow {
                    quarter: q,
                    player,
                    fraction,
                    credit: fraction.value(),
                });
            }
        }

        let substitutions = sheet
            .all_substitutions()
            .iter()
            .map(|s| SubstitutionRow {
                quarter: s.quarter,
                player_out: s.player_out,
                player_in: s.player_in,
            })
            .collect();

        let formations = Quarter::ALL.iter().map(|&q| formation(sheet, q)).collect();
        let (total_team_goals, total_opponent_goals) = sheet.totals();

        Self {
            info: sheet.info.clone(),
            revision: sheet.revision,
            call_ups: sheet.call_ups().iter().copied().collect(),
            assignments,
            substitutions,
            goals: sheet.goals().to_vec(),
            formations,
            total_team_goals,
            total_opponent_goals,
            roster: Vec::new(),
        }
    }

    /// Attaches the roster provider's display data for the called-up
    /// players, so the consumer can label ids without a second lookup.
    /// Players outside the call-up set are dropped.
    pub fn with_roster(mut self, roster: &[Player]) -> Self {
        self.roster =
            roster.iter().filter(|p| self.call_ups.contains(&p.id)).cloned().collect();
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn formation(sheet: &MatchSheet, quarter: Quarter) -> FormationExport {
    let occ = sheet.field_occupancy(quarter);
    let mut members: Vec<FormationMember> = occ
        .full_players
        .iter()
        .map(|&p| FormationMember { player: p, fraction: Fraction::Full })
        .collect();
    for (out, inn) in occ.paired {
        members.push(FormationMember { player: out, fraction: Fraction::Half });
        members.push(FormationMember { player: inn, fraction: Fraction::Half });
    }
    FormationExport { quarter, members, score: sheet.quarter_score(quarter) }
}
