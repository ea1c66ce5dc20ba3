//! String-in/string-out JSON surface for UI hosts.
//!
//! Commands arrive as one tagged object; the response envelope always
//! carries `ok`, the current revision, and on failure a stable error code
//! the UI can branch on without parsing the message text.

use serde::{Deserialize, Serialize};

use crate::engine::LineupEngine;
use crate::error::LineupError;
use crate::export::MatchExport;
use crate::models::{Fraction, PlayerId, Quarter};
use crate::store::SheetStore;

pub mod error_codes {
    pub const INCOMPLETE_CALL_UP: &str = "QB_INCOMPLETE_CALL_UP";
    pub const CAPACITY_EXCEEDED: &str = "QB_CAPACITY_EXCEEDED";
    pub const INVALID_PAIR: &str = "QB_INVALID_PAIR";
    pub const NOT_FOUND: &str = "QB_NOT_FOUND";
    pub const VALIDATION: &str = "QB_VALIDATION";
    pub const PERSISTENCE: &str = "QB_PERSISTENCE";
    pub const BAD_REQUEST: &str = "QB_BAD_REQUEST";
}

fn code_for(err: &LineupError) -> &'static str {
    match err {
        LineupError::IncompleteCallUp { .. } => error_codes::INCOMPLETE_CALL_UP,
        LineupError::CapacityExceeded { .. } => error_codes::CAPACITY_EXCEEDED,
        LineupError::InvalidSubstitutionPair { .. } => error_codes::INVALID_PAIR,
        LineupError::NotFound { .. } => error_codes::NOT_FOUND,
        LineupError::Validation(_) => error_codes::VALIDATION,
        LineupError::Persistence(_) => error_codes::PERSISTENCE,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LineupCommand {
    SetCallUps { players: Vec<PlayerId> },
    Assign { quarter: Quarter, player: PlayerId, fraction: Fraction },
    ApplySubstitution { quarter: Quarter, player_out: PlayerId, player_in: PlayerId },
    RemoveSubstitution { quarter: Quarter, player_out: PlayerId, player_in: PlayerId },
    AddGoal { quarter: Quarter, scorer: PlayerId, #[serde(default)] assister: Option<PlayerId> },
    RemoveGoal { goal_id: String },
    SetOpponentGoals { quarter: Quarter, count: u8 },
}

#[derive(Debug, Clone, Serialize)]
pub struct LineupResponse {
    pub ok: bool,
    /// Revision of the visible sheet after the call (unchanged on failure).
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Set by commands that create something (substitution id, goal id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<String>,
}

impl LineupResponse {
    fn ok(revision: u64, created_id: Option<String>) -> Self {
        Self { ok: true, revision, error: None, error_code: None, created_id }
    }

    fn err(revision: u64, code: &str, message: String) -> Self {
        Self {
            ok: false,
            revision,
            error: Some(message),
            error_code: Some(code.to_string()),
            created_id: None,
        }
    }
}

/// Executes one command and returns the response envelope as JSON.
pub fn apply_command_json<S: SheetStore>(engine: &mut LineupEngine<S>, request_json: &str) -> String {
    let revision = engine.sheet().revision;
    let command: LineupCommand = match serde_json::from_str(request_json) {
        Ok(c) => c,
        Err(e) => {
            return to_json(&LineupResponse::err(
                revision,
                error_codes::BAD_REQUEST,
                format!("Invalid JSON request: {e}"),
            ))
        }
    };

    let outcome = match command {
        LineupCommand::SetCallUps { players } => engine.set_call_ups(players).map(|_| None),
        LineupCommand::Assign { quarter, player, fraction } => {
            engine.assign(quarter, player, fraction).map(|_| None)
        }
        LineupCommand::ApplySubstitution { quarter, player_out, player_in } => {
            engine.apply_substitution(quarter, player_out, player_in).map(Some)
        }
        LineupCommand::RemoveSubstitution { quarter, player_out, player_in } => {
            engine.remove_substitution(quarter, player_out, player_in).map(|_| None)
        }
        LineupCommand::AddGoal { quarter, scorer, assister } => {
            engine.add_goal(quarter, scorer, assister).map(Some)
        }
        LineupCommand::RemoveGoal { goal_id } => engine.remove_goal(&goal_id).map(|_| None),
        LineupCommand::SetOpponentGoals { quarter, count } => {
            engine.set_opponent_goals(quarter, count).map(|_| None)
        }
    };

    let response = match outcome {
        Ok(created_id) => LineupResponse::ok(engine.sheet().revision, created_id),
        Err(e) => LineupResponse::err(revision, code_for(&e), e.to_string()),
    };
    to_json(&response)
}

/// Full sheet state for rendering, as JSON.
pub fn sheet_state_json<S: SheetStore>(engine: &LineupEngine<S>) -> String {
    serde_json::to_string(engine.sheet())
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{e}\"}}"))
}

/// Statistics-consumer export, as JSON.
pub fn export_json<S: SheetStore>(engine: &LineupEngine<S>) -> String {
    let export = MatchExport::from_sheet(engine.sheet());
    serde_json::to_string(&export)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{e}\"}}"))
}

fn to_json(response: &LineupResponse) -> String {
    serde_json::to_string(response)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{e}\"}}"))
}
