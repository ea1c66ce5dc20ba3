//! The single field/bench partition function.
//!
//! Everything that needs to know who is on the field in a quarter (the
//! drag-and-drop UI, the statistics export) goes through here instead of
//! re-deriving the split from raw fraction maps.

use serde::{Deserialize, Serialize};

use crate::models::{PlayerId, Quarter};

use super::MatchSheet;

/// Field/bench partition of the called-up players for one quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldOccupancy {
    /// Players holding a full field slot on their own.
    pub full_players: Vec<PlayerId>,
    /// Active pairs as (out, in); each pair holds one slot jointly.
    pub paired: Vec<(PlayerId, PlayerId)>,
    /// Everyone else in the call-up set, including unpaired half credits.
    pub bench_players: Vec<PlayerId>,
}

impl FieldOccupancy {
    /// Field slots consumed: full assignments plus one per active pair.
    pub fn slots_used(&self) -> usize {
        self.full_players.len() + self.paired.len()
    }
}

pub fn field_occupancy(sheet: &MatchSheet, quarter: Quarter) -> FieldOccupancy {
    let mut occ = FieldOccupancy::default();

    for (player, fraction) in sheet.quarter_fractions(quarter) {
        if sheet.pair_for(quarter, player).is_some() {
            continue; // listed via the pair below
        }
        if fraction.is_full() {
            occ.full_players.push(player);
        } else {
            occ.bench_players.push(player);
        }
    }

    for sub in sheet.substitutions(quarter) {
        occ.paired.push((sub.player_out, sub.player_in));
    }

    occ
}
