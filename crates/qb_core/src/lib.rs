//! # qb_core - Quarter Lineup & Substitution Engine
//!
//! The lineup core behind a coaching dashboard: assigning called-up
//! players to the four quarters of a match, pairing reversible mid-quarter
//! substitutions, and keeping the per-quarter score ledger that downstream
//! formation statistics are built from.
//!
//! ## Guarantees
//! - At most seven field slots per quarter; a full assignment or an active
//!   substitution pair consumes exactly one
//! - Substitution pairs are exactly reversible; reversal restores the
//!   pre-pairing fractions
//! - No lineup mutation is accepted below seven call-ups
//! - The visible sheet never changes until the store acknowledges a write

pub mod api;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod sheet;
pub mod store;

/// Simultaneous on-field positions per quarter.
pub const FIELD_SLOTS: usize = 7;

/// Minimum call-up count for any lineup mutation.
pub const MIN_CALL_UPS: usize = 7;

pub use api::{apply_command_json, export_json, sheet_state_json, LineupCommand, LineupResponse};
pub use engine::LineupEngine;
pub use error::{LineupError, Result};
pub use export::{FormationExport, MatchExport};
pub use models::{Fraction, GoalEvent, MatchId, MatchInfo, Player, PlayerId, Quarter, QuarterScore, TeamId};
pub use sheet::{FieldOccupancy, MatchSheet, Substitution};
pub use store::{FileStore, MemoryStore, SheetStore, StoreError};
