//! Builds statistics-consumer exports from saved sheet files.

use std::path::Path;

use anyhow::{Context, Result};

use qb_core::{FileStore, MatchExport, MatchId, MatchSheet, Quarter, SheetStore};

pub fn load_sheet(dir: &Path, match_id: u64) -> Result<MatchSheet> {
    let store = FileStore::new(dir);
    store
        .load(MatchId(match_id))
        .with_context(|| format!("loading sheet for match {match_id} from {}", dir.display()))
}

pub fn list_matches(dir: &Path) -> Result<Vec<u64>> {
    let store = FileStore::new(dir);
    let ids = store.list_matches().context("listing sheet files")?;
    Ok(ids.into_iter().map(|id| id.0).collect())
}

pub fn build_export_json(dir: &Path, match_id: u64) -> Result<String> {
    let sheet = load_sheet(dir, match_id)?;
    let export = MatchExport::from_sheet(&sheet);
    export.to_json().context("encoding export")
}

/// Human-readable match summary: score line plus periods played per
/// called-up player.
pub fn summary_lines(sheet: &MatchSheet) -> Vec<String> {
    let (team, opponent) = sheet.totals();
    let mut lines = vec![
        format!(
            "{} vs {} ({}): {} - {}",
            sheet.info.team, sheet.info.opponent, sheet.info.date, team, opponent
        ),
        Quarter::ALL
            .iter()
            .map(|&q| {
                let s = sheet.quarter_score(q);
                format!("{q} {}-{}", s.team_goals, s.opponent_goals)
            })
            .collect::<Vec<_>>()
            .join("  "),
    ];

    for &player in sheet.call_ups() {
        lines.push(format!("player {player}: {:.1} periods", sheet.periods_played(player)));
    }
    lines
}
