use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::{PlayerId, Quarter};

/// One goal scored by the team, append-only until individually deleted.
///
/// Team goals per quarter are always the live count of these events; there
/// is no separately stored team score to drift out of sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalEvent {
    pub id: String,
    pub quarter: Quarter,
    pub scorer: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assister: Option<PlayerId>,
}

impl GoalEvent {
    pub fn new(quarter: Quarter, scorer: PlayerId, assister: Option<PlayerId>) -> Self {
        Self { id: Uuid::new_v4().to_string(), quarter, scorer, assister }
    }
}

/// Per-quarter score line: derived team goals next to the stored opponent
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuarterScore {
    pub team_goals: u8,
    pub opponent_goals: u8,
}
