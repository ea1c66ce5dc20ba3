//! Export Builder CLI
//!
//! Saved sheet files → statistics-consumer JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "export_builder")]
#[command(about = "Build statistics exports from saved match sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List match ids with a saved sheet
    List {
        /// Sheet directory
        #[arg(long)]
        dir: PathBuf,
    },

    /// Write the statistics export for one match
    Export {
        /// Sheet directory
        #[arg(long)]
        dir: PathBuf,

        /// Match id
        #[arg(long)]
        match_id: u64,

        /// Output JSON file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print a human-readable match summary
    Summary {
        /// Sheet directory
        #[arg(long)]
        dir: PathBuf,

        /// Match id
        #[arg(long)]
        match_id: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { dir } => {
            for id in export_builder::list_matches(&dir)? {
                println!("{id}");
            }
        }
        Commands::Export { dir, match_id, out } => {
            let json = export_builder::build_export_json(&dir, match_id)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &json)?;
                    println!("Wrote export for match {match_id} to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Summary { dir, match_id } => {
            let sheet = export_builder::load_sheet(&dir, match_id)?;
            for line in export_builder::summary_lines(&sheet) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
