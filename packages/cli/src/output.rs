//! Text and JSON rendering of report results.

use call_center_analytics_models::{
    AgentReport, CountRow, FlagSummary, GhostPrankReport, LoadSummary, LocationReport,
    OverviewReport, SourceSeries, TimePatternsReport,
};
use serde::Serialize;

/// Prints `report` as pretty JSON, or with `print` as text.
pub fn emit<T: Serialize>(
    report: &T,
    json: bool,
    print: fn(&T),
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print(report);
    }
    Ok(())
}

fn heading(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "-".repeat(60));
}

fn print_counts(title: &str, rows: &[CountRow]) {
    heading(title);
    if rows.is_empty() {
        println!("(no data)");
        return;
    }
    for row in rows {
        println!("{:<40} {:>10}", row.key, row.count);
    }
}

fn print_series(title: &str, series: &[SourceSeries]) {
    for s in series {
        print_counts(&format!("{title} ({})", s.source), &s.points);
    }
}

fn print_flag(flag: &FlagSummary) {
    println!(
        "{:<40} {:>10} {:>7.1}%",
        flag.flag.as_ref(),
        flag.count,
        flag.pct
    );
}

pub fn print_overview(report: &OverviewReport) {
    heading("Overview");
    println!("{:<40} {:>10}", "total", report.total);
    for flag in &report.flags {
        print_flag(flag);
    }
    print_counts("Top categories", &report.top_categories);
    print_counts("Top report types", &report.top_report_types);
}

pub fn print_time_patterns(report: &TimePatternsReport) {
    print_series("Monthly reports", &report.monthly);
    print_series("Daily reports", &report.daily);
    print_series("Hourly reports", &report.hourly);
    print_counts("Reports by weekday", &report.weekday);
}

pub fn print_location(report: &LocationReport) {
    print_counts("Top subdistricts", &report.top_subdistricts);

    heading("Subdistrict detail (all records)");
    println!(
        "{:<30} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "SUBDISTRICT", "TOTAL", "GHOST", "PRANK", "SHORT", "FAKE"
    );
    for d in &report.detail {
        println!(
            "{:<30} {:>8} {:>8} {:>8} {:>8} {:>8}",
            d.subdistrict, d.total, d.ghost_calls, d.prank_calls, d.short_calls, d.fake_locations
        );
    }
    println!(
        "Ghost ({}) and prank ({}) calls usually carry no subdistrict and are not listed.",
        report.ghost_calls_total, report.prank_calls_total
    );
}

pub fn print_ghost_prank(report: &GhostPrankReport) {
    print_counts("Ghost calls per month (all records)", &report.ghost_monthly);
    print_counts("Prank calls per month (all records)", &report.prank_monthly);
    heading("Location and spam");
    print_flag(&report.fake_location);
    print_flag(&report.rapid_repeat);
}

pub fn print_agents(report: &AgentReport) {
    print_counts("Agents by volume", &report.top_by_volume);
    print_counts("Agents by ghost calls", &report.top_by_ghost);
    print_counts("Agents by prank calls", &report.top_by_prank);

    heading("Agent detail");
    println!(
        "{:<30} {:>8} {:>8} {:>8} {:>8} {:>12}",
        "AGENT", "TOTAL", "GHOST", "PRANK", "SHORT", "MEAN SECS"
    );
    for d in &report.detail {
        let mean = d
            .mean_duration_seconds
            .map_or_else(|| "-".to_string(), |m| format!("{m:.2}"));
        println!(
            "{:<30} {:>8} {:>8} {:>8} {:>8} {:>12}",
            d.agent, d.total, d.ghost_calls, d.prank_calls, d.short_calls, mean
        );
    }
}

pub fn print_summary(summary: &LoadSummary) {
    heading("Loaded records");
    println!("{:<40} {:>10}", "total", summary.total);
    for row in &summary.per_source {
        println!("{:<40} {:>10}", format!("source {}", row.key), row.count);
    }

    heading("Columns");
    println!("present: {}", summary.columns_present.join(", "));
    if !summary.columns_missing.is_empty() {
        println!("missing: {}", summary.columns_missing.join(", "));
    }

    heading("Unparsed values");
    println!("{:<40} {:>10}", "report time", summary.missing_report_time);
    println!("{:<40} {:>10}", "duration", summary.missing_duration);
    println!("{:<40} {:>10}", "coordinates", summary.missing_coordinates);
    println!("{:<40} {:>10}", "identity", summary.missing_identity);
}
