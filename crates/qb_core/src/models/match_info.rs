use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{MatchId, PlayerId, TeamId};

/// Match metadata as owned by the external CRUD layer.
///
/// The engine only reads the identifier; date and opponent travel along for
/// display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: MatchId,
    pub team: TeamId,
    pub date: NaiveDate,
    pub opponent: String,
}

/// Roster entry supplied by the external roster provider. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<u8>,
}
