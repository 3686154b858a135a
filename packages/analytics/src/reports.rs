//! The dashboard views.
//!
//! Most views read the filtered view. A few sections read the
//! whole record set instead (per-source time series, the subdistrict detail
//! table and the monthly ghost/prank trend); those functions take both.

use call_center_analytics_models::{
    AgentDetail, AgentReport, CountRow, FlagSummary, GhostPrankReport, LoadSummary,
    LocationReport, OverviewReport, SourceSeries, SubdistrictDetail, TimePatternsReport,
};
use call_center_incident_models::{CanonicalRecord, Flag, weekday_name};
use call_center_source_models::SourceYear;
use chrono::Weekday;

use crate::group::{Group, count_rows, group_by, top_n, top_n_by};
use crate::view::{ColumnValue, GroupColumn, Measure, RecordView};

/// Categories and report types shown in the overview.
pub const OVERVIEW_TOP: usize = 10;
/// Subdistricts shown in the location chart.
pub const LOCATION_TOP: usize = 15;
/// Rows in the subdistrict and agent detail tables.
pub const DETAIL_TOP: usize = 20;
/// Agents shown in the volume chart.
pub const AGENT_VOLUME_TOP: usize = 15;
/// Agents shown in the ghost and prank charts.
pub const AGENT_FLAG_TOP: usize = 10;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Totals, flag shares and the most common categories and report types.
#[must_use]
pub fn overview(filtered: &RecordView<'_>) -> OverviewReport {
    let total = filtered.len();
    OverviewReport {
        total,
        flags: Flag::all()
            .iter()
            .map(|&flag| FlagSummary::new(flag, filtered.count_flag(flag), total))
            .collect(),
        top_categories: top_counts(filtered, GroupColumn::Category, OVERVIEW_TOP),
        top_report_types: top_counts(filtered, GroupColumn::ReportType, OVERVIEW_TOP),
    }
}

/// Monthly, daily and hourly volume per source, and weekday volume.
#[must_use]
pub fn time_patterns(all: &RecordView<'_>, filtered: &RecordView<'_>) -> TimePatternsReport {
    let per_source = |column: GroupColumn| -> Vec<SourceSeries> {
        SourceYear::all()
            .iter()
            .map(|&source| {
                let view = all.filter_in(GroupColumn::Source, &[ColumnValue::Source(source)]);
                SourceSeries {
                    source,
                    points: count_rows(&group_by(&view, column)),
                }
            })
            .collect()
    };

    let by_weekday = group_by(filtered, GroupColumn::Weekday);
    let weekday = WEEK
        .iter()
        .map(|&day| {
            let key = ColumnValue::weekday(day);
            CountRow {
                key: weekday_name(day).to_string(),
                count: by_weekday
                    .iter()
                    .find(|g| g.key == key)
                    .map_or(0, Group::count),
            }
        })
        .collect();

    TimePatternsReport {
        monthly: per_source(GroupColumn::YearMonth),
        daily: per_source(GroupColumn::Date),
        hourly: per_source(GroupColumn::Hour),
        weekday,
    }
}

/// Busiest subdistricts, plus a detail table over the whole record set.
#[must_use]
pub fn location(all: &RecordView<'_>, filtered: &RecordView<'_>) -> LocationReport {
    let detail = top_n_by(
        group_by(all, GroupColumn::Subdistrict),
        DETAIL_TOP,
        Group::count_identified,
    )
        .iter()
        .map(|g| SubdistrictDetail {
            subdistrict: g.label(),
            total: g.count_identified(),
            ghost_calls: g.count_flag(Flag::GhostCall),
            prank_calls: g.count_flag(Flag::PrankCall),
            short_calls: g.count_flag(Flag::ShortCall),
            fake_locations: g.count_flag(Flag::FakeLocation),
        })
        .collect();

    LocationReport {
        top_subdistricts: top_counts(filtered, GroupColumn::Subdistrict, LOCATION_TOP),
        detail,
        ghost_calls_total: all.count_flag(Flag::GhostCall),
        prank_calls_total: all.count_flag(Flag::PrankCall),
    }
}

/// Monthly ghost and prank trend, plus fake-location and spam shares.
#[must_use]
pub fn ghost_prank(all: &RecordView<'_>, filtered: &RecordView<'_>) -> GhostPrankReport {
    let monthly = |flag: Flag| {
        let flagged = all.filter(|r| r.flags.get(flag));
        count_rows(&group_by(&flagged, GroupColumn::YearMonth))
    };
    let total = filtered.len();

    GhostPrankReport {
        ghost_monthly: monthly(Flag::GhostCall),
        prank_monthly: monthly(Flag::PrankCall),
        fake_location: FlagSummary::new(
            Flag::FakeLocation,
            filtered.count_flag(Flag::FakeLocation),
            total,
        ),
        rapid_repeat: FlagSummary::new(
            Flag::RapidRepeat,
            filtered.count_flag(Flag::RapidRepeat),
            total,
        ),
    }
}

/// Agent workload and quality. `None` when no source has an agent column.
#[must_use]
pub fn agents(filtered: &RecordView<'_>) -> Option<AgentReport> {
    if !filtered.schema().agent {
        log::debug!("No agent column; skipping agent report");
        return None;
    }

    let by_flag = |flag: Flag| {
        let flagged = filtered.filter(|r| r.flags.get(flag));
        top_counts(&flagged, GroupColumn::Agent, AGENT_FLAG_TOP)
    };

    let detail = top_n_by(
        group_by(filtered, GroupColumn::Agent),
        DETAIL_TOP,
        Group::count_identified,
    )
        .iter()
        .map(|g| AgentDetail {
            agent: g.label(),
            total: g.count_identified(),
            ghost_calls: g.count_flag(Flag::GhostCall),
            prank_calls: g.count_flag(Flag::PrankCall),
            short_calls: g.count_flag(Flag::ShortCall),
            mean_duration_seconds: g.mean(Measure::DurationSeconds).map(round2),
        })
        .collect();

    Some(AgentReport {
        top_by_volume: top_counts(filtered, GroupColumn::Agent, AGENT_VOLUME_TOP),
        top_by_ghost: by_flag(Flag::GhostCall),
        top_by_prank: by_flag(Flag::PrankCall),
        detail,
    })
}

/// Row counts, schema coverage and absence counts for the loaded set.
#[must_use]
pub fn load_summary(all: &RecordView<'_>) -> LoadSummary {
    let columns = all.schema().columns();
    let names = |present: bool| -> Vec<String> {
        columns
            .iter()
            .filter(|(_, p)| *p == present)
            .map(|(name, _)| (*name).to_string())
            .collect()
    };
    let missing = |pred: fn(&CanonicalRecord) -> bool| {
        all.records().iter().filter(|r| pred(r)).count()
    };

    LoadSummary {
        total: all.len(),
        per_source: count_rows(&group_by(all, GroupColumn::Source)),
        columns_present: names(true),
        columns_missing: names(false),
        missing_report_time: missing(|r| r.report_time.is_none()),
        missing_duration: missing(|r| r.duration_seconds.is_none()),
        missing_coordinates: missing(|r| r.latitude.is_none() || r.longitude.is_none()),
        missing_identity: missing(|r| r.identity.is_none()),
    }
}

fn top_counts(view: &RecordView<'_>, column: GroupColumn, n: usize) -> Vec<CountRow> {
    count_rows(&top_n(group_by(view, column), n))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::DashboardFilter;
    use call_center_incident_models::{CallFlags, CanonicalRecordSet, SchemaPresence, TimeParts};
    use chrono::NaiveDate;

    struct Row {
        source: SourceYear,
        month: u32,
        day: u32,
        hour: u32,
        category: Option<&'static str>,
        subdistrict: Option<&'static str>,
        agent: Option<&'static str>,
        identity: Option<&'static str>,
        duration: Option<u64>,
        flags: CallFlags,
    }

    impl Row {
        fn new(source: SourceYear, month: u32, day: u32) -> Self {
            Self {
                source,
                month,
                day,
                hour: 9,
                category: Some("Medis"),
                subdistrict: Some("Gambir"),
                agent: Some("Sari"),
                identity: Some("u"),
                duration: Some(60),
                flags: CallFlags::default(),
            }
        }

        fn build(self) -> CanonicalRecord {
            let year = match self.source {
                SourceYear::Y2024 => 2024,
                SourceYear::Y2025 => 2025,
            };
            let ts = NaiveDate::from_ymd_opt(year, self.month, self.day)
                .unwrap()
                .and_hms_opt(self.hour, 0, 0)
                .unwrap();
            CanonicalRecord {
                source: self.source,
                report_time: Some(ts),
                time: Some(TimeParts::from_timestamp(ts)),
                duration_seconds: self.duration,
                report_type: "darurat".to_string(),
                category: self.category.map(String::from),
                subdistrict: self.subdistrict.map(String::from),
                ward: None,
                latitude: Some(-6.2),
                longitude: Some(106.8),
                identity: self.identity.map(String::from),
                description: None,
                agent: self.agent.map(String::from),
                flags: self.flags,
            }
        }
    }

    const SCHEMA: SchemaPresence = SchemaPresence {
        report_time: true,
        duration: true,
        report_type: true,
        category: true,
        subdistrict: true,
        ward: false,
        latitude: true,
        longitude: true,
        identity: true,
        description: true,
        agent: true,
    };

    fn ghost() -> CallFlags {
        CallFlags {
            ghost_call: true,
            short_call: true,
            fake_location: true,
            ..CallFlags::default()
        }
    }

    fn fixture() -> CanonicalRecordSet {
        let records = vec![
            Row::new(SourceYear::Y2024, 1, 1).build(),
            Row {
                category: Some("Kebakaran"),
                subdistrict: Some("Menteng"),
                agent: Some("Budi"),
                duration: Some(31),
                hour: 22,
                ..Row::new(SourceYear::Y2024, 1, 15)
            }
            .build(),
            Row {
                category: None,
                subdistrict: None,
                duration: Some(0),
                flags: ghost(),
                ..Row::new(SourceYear::Y2024, 2, 3)
            }
            .build(),
            Row {
                category: None,
                subdistrict: None,
                agent: Some("Budi"),
                duration: Some(4),
                flags: CallFlags {
                    prank_call: true,
                    short_call: true,
                    rapid_repeat: true,
                    ..CallFlags::default()
                },
                ..Row::new(SourceYear::Y2025, 2, 3)
            }
            .build(),
            Row {
                agent: None,
                ..Row::new(SourceYear::Y2025, 3, 10)
            }
            .build(),
        ];
        CanonicalRecordSet::new(records, SCHEMA)
    }

    #[test]
    fn overview_counts_flags_and_top_labels() {
        let set = fixture();
        let report = overview(&RecordView::new(&set));

        assert_eq!(report.total, 5);
        let ghost = report.flags.iter().find(|f| f.flag == Flag::GhostCall).unwrap();
        assert_eq!(ghost.count, 1);
        assert!((ghost.pct - 20.0).abs() < 1e-9);
        let short = report.flags.iter().find(|f| f.flag == Flag::ShortCall).unwrap();
        assert_eq!(short.count, 2);

        assert_eq!(report.top_categories[0].key, "Medis");
        assert_eq!(report.top_categories[0].count, 2);
        assert_eq!(report.top_categories.len(), 2);
        assert_eq!(report.top_report_types[0].count, 5);
    }

    #[test]
    fn overview_of_empty_view_has_zero_percentages() {
        let set = fixture();
        let empty = RecordView::new(&set).filter(|_| false);
        let report = overview(&empty);
        assert_eq!(report.total, 0);
        assert!(report.flags.iter().all(|f| f.count == 0 && f.pct.abs() < f64::EPSILON));
    }

    #[test]
    fn time_series_split_by_source_and_weekday_follows_filter() {
        let set = fixture();
        let all = RecordView::new(&set);
        let filter = DashboardFilter {
            sources: vec![SourceYear::Y2025],
            ..DashboardFilter::default()
        };
        let filtered = filter.apply(&all);
        let report = time_patterns(&all, &filtered);

        assert_eq!(report.monthly[0].source, SourceYear::Y2024);
        let months: Vec<(&str, usize)> = report.monthly[0]
            .points
            .iter()
            .map(|p| (p.key.as_str(), p.count))
            .collect();
        assert_eq!(months, vec![("2024-01", 2), ("2024-02", 1)]);
        assert_eq!(report.monthly[1].points.len(), 2);

        let hours: Vec<&str> = report.hourly[0].points.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(hours, vec!["9", "22"]);
        assert_eq!(report.daily[1].points[0].key, "2025-02-03");

        // 2025-02-03 is a Monday, 2025-03-10 is a Monday.
        assert_eq!(report.weekday.len(), 7);
        assert_eq!(report.weekday[0].key, "Monday");
        assert_eq!(report.weekday[0].count, 2);
        assert_eq!(report.weekday.iter().map(|w| w.count).sum::<usize>(), 2);
    }

    #[test]
    fn location_detail_ignores_filter_and_absent_subdistricts() {
        let set = fixture();
        let all = RecordView::new(&set);
        let filter = DashboardFilter {
            subdistricts: vec!["Menteng".to_string()],
            ..DashboardFilter::default()
        };
        let report = location(&all, &filter.apply(&all));

        assert_eq!(report.top_subdistricts.len(), 1);
        assert_eq!(report.top_subdistricts[0].key, "Menteng");

        let names: Vec<&str> = report.detail.iter().map(|d| d.subdistrict.as_str()).collect();
        assert_eq!(names, vec!["Gambir", "Menteng"]);
        assert_eq!(report.detail[0].total, 2);
        assert_eq!(report.detail[0].ghost_calls, 0);
        assert_eq!(report.ghost_calls_total, 1);
        assert_eq!(report.prank_calls_total, 1);
    }

    #[test]
    fn detail_totals_count_identified_reports() {
        let records = vec![
            Row {
                identity: None,
                ..Row::new(SourceYear::Y2024, 1, 1)
            }
            .build(),
            Row {
                identity: None,
                ..Row::new(SourceYear::Y2024, 1, 2)
            }
            .build(),
            Row::new(SourceYear::Y2024, 1, 3).build(),
            Row {
                subdistrict: Some("Menteng"),
                agent: Some("Budi"),
                ..Row::new(SourceYear::Y2024, 1, 4)
            }
            .build(),
            Row {
                subdistrict: Some("Menteng"),
                agent: Some("Budi"),
                ..Row::new(SourceYear::Y2024, 1, 5)
            }
            .build(),
        ];
        let set = CanonicalRecordSet::new(records, SCHEMA);
        let all = RecordView::new(&set);

        let report = location(&all, &all);
        let detail: Vec<(&str, usize)> = report
            .detail
            .iter()
            .map(|d| (d.subdistrict.as_str(), d.total))
            .collect();
        assert_eq!(detail, vec![("Menteng", 2), ("Gambir", 1)]);
        assert_eq!(report.top_subdistricts[0].key, "Gambir");

        let agent_report = agents(&all).unwrap();
        assert_eq!(agent_report.detail[0].agent, "Budi");
        assert_eq!(agent_report.detail[1].total, 1);
    }

    #[test]
    fn ghost_prank_trend_and_shares() {
        let set = fixture();
        let all = RecordView::new(&set);
        let report = ghost_prank(&all, &all);

        assert_eq!(
            report.ghost_monthly,
            vec![CountRow {
                key: "2024-02".to_string(),
                count: 1,
            }]
        );
        assert_eq!(report.prank_monthly[0].key, "2025-02");
        assert_eq!(report.fake_location.count, 1);
        assert_eq!(report.rapid_repeat.count, 1);
        assert!((report.rapid_repeat.pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn agent_report_rounds_mean_duration() {
        let set = fixture();
        let report = agents(&RecordView::new(&set)).unwrap();

        assert_eq!(report.top_by_volume.len(), 2);
        assert_eq!(report.top_by_ghost[0].key, "Sari");
        assert_eq!(report.top_by_prank[0].key, "Budi");

        let budi = report.detail.iter().find(|d| d.agent == "Budi").unwrap();
        assert_eq!(budi.total, 2);
        assert_eq!(budi.mean_duration_seconds, Some(17.5));
        let sari = report.detail.iter().find(|d| d.agent == "Sari").unwrap();
        assert_eq!(sari.mean_duration_seconds, Some(30.0));
        assert_eq!(sari.short_calls, 1);
        assert!((round2(10.0 / 3.0) - 3.33).abs() < 1e-9);
    }

    #[test]
    fn agent_report_absent_without_agent_column() {
        let records = fixture().records().to_vec();
        let set = CanonicalRecordSet::new(
            records,
            SchemaPresence {
                agent: false,
                ..SCHEMA
            },
        );
        assert!(agents(&RecordView::new(&set)).is_none());
    }

    #[test]
    fn load_summary_reports_schema_and_gaps() {
        let set = fixture();
        let summary = load_summary(&RecordView::new(&set));
        assert_eq!(summary.total, 5);
        assert_eq!(
            summary.per_source,
            vec![
                CountRow {
                    key: "2024".to_string(),
                    count: 3,
                },
                CountRow {
                    key: "2025".to_string(),
                    count: 2,
                },
            ]
        );
        assert_eq!(summary.columns_missing, vec!["ward".to_string()]);
        assert_eq!(summary.missing_report_time, 0);
        assert_eq!(summary.missing_coordinates, 0);
    }
}
