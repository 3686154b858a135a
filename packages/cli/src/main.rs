#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the call-center 112 incident reports.
//!
//! Loads both yearly exports, applies the dashboard filters and prints one
//! report view as aligned text or JSON.

mod output;

use std::path::PathBuf;

use call_center_analytics::reports;
use call_center_analytics::{DashboardFilter, RecordView};
use call_center_ingest::{PipelineCache, SourcePair};
use call_center_source::columns::ColumnMapping;
use call_center_source_models::SourceYear;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "call_center", about = "Call center 112 incident analytics")]
struct Cli {
    /// Path to the 2024 export (overrides `CALL_CENTER_SOURCE_2024`)
    #[arg(long, global = true)]
    source_2024: Option<PathBuf>,
    /// Path to the 2025 export (overrides `CALL_CENTER_SOURCE_2025`)
    #[arg(long, global = true)]
    source_2025: Option<PathBuf>,
    /// TOML file mapping logical columns to header text
    #[arg(long, global = true)]
    columns: Option<PathBuf>,
    /// Only include these source years (repeatable or comma-separated)
    #[arg(long, global = true, value_delimiter = ',', value_parser = parse_year)]
    year: Vec<SourceYear>,
    /// Only include these categories
    #[arg(long, global = true, value_delimiter = ',')]
    category: Vec<String>,
    /// Also include reports without a category (ghost/prank calls)
    #[arg(long, global = true)]
    uncategorized: bool,
    /// Only include these subdistricts
    #[arg(long, global = true, value_delimiter = ',')]
    subdistrict: Vec<String>,
    /// Also include reports without a subdistrict
    #[arg(long, global = true)]
    unlocated: bool,
    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Totals, flag shares, top categories and report types
    Overview,
    /// Monthly, daily, hourly and weekday volume
    Time,
    /// Busiest subdistricts and the subdistrict detail table
    Location,
    /// Ghost and prank call trends, fake locations and spam
    Calls,
    /// Agent workload and quality
    Agents,
    /// Row counts, schema coverage and parse gaps of the loaded data
    Summary,
}

fn parse_year(value: &str) -> Result<SourceYear, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("unknown source year `{value}` (expected 2024 or 2025)"))
}

impl Cli {
    fn filter(&self) -> DashboardFilter {
        DashboardFilter {
            sources: self.year.clone(),
            categories: self.category.clone(),
            include_uncategorized: self.uncategorized,
            subdistricts: self.subdistrict.clone(),
            include_unlocated: self.unlocated,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let columns = match &cli.columns {
        Some(path) => ColumnMapping::from_file(path)?,
        None => ColumnMapping::embedded()?,
    };
    let sources = SourcePair::resolve(cli.source_2024.clone(), cli.source_2025.clone());

    let mut cache = PipelineCache::new(columns);
    let set = cache.get_or_load(&sources).map_err(|e| {
        log::error!("{e} ({})", e.kind());
        e
    })?;

    let all = RecordView::new(&set);
    if matches!(cli.command, Commands::Summary) {
        return output::emit(&reports::load_summary(&all), cli.json, output::print_summary);
    }

    let filtered = cli.filter().apply(&all);
    if filtered.is_empty() {
        eprintln!("Warning: no records match the selected filters.");
        return Ok(());
    }

    match cli.command {
        Commands::Overview => {
            output::emit(&reports::overview(&filtered), cli.json, output::print_overview)?;
        }
        Commands::Time => {
            output::emit(
                &reports::time_patterns(&all, &filtered),
                cli.json,
                output::print_time_patterns,
            )?;
        }
        Commands::Location => {
            output::emit(
                &reports::location(&all, &filtered),
                cli.json,
                output::print_location,
            )?;
        }
        Commands::Calls => {
            output::emit(
                &reports::ghost_prank(&all, &filtered),
                cli.json,
                output::print_ghost_prank,
            )?;
        }
        Commands::Agents => match reports::agents(&filtered) {
            Some(report) => output::emit(&report, cli.json, output::print_agents)?,
            None => eprintln!("Warning: the loaded sources have no agent column."),
        },
        Commands::Summary => {}
    }

    Ok(())
}
