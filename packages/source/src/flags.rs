//! Quality-flag rules.
//!
//! Each rule reads the already-normalized fields of one record and votes
//! for a single [`Flag`]. A flag is set when any of its rules votes `true`.
//! Rules are evaluated in the fixed order of [`FLAG_RULES`] and every rule
//! runs, so each can be tested on its own.
//!
//! `rapid_repeat` needs neighbouring records and is computed later by the
//! spam detector.

use call_center_incident_models::{CallFlags, Flag, SchemaPresence};

/// Durations at or below this many seconds are short calls. Zero counts.
pub const SHORT_CALL_MAX_SECONDS: u64 = 5;

/// The ghost heuristic requires a handling duration of exactly this value.
pub const GHOST_DURATION_SECONDS: u64 = 0;

/// The ghost heuristic requires a trimmed description shorter than this
/// many characters.
pub const GHOST_DESCRIPTION_MAX_CHARS: usize = 5;

/// Normalized per-record inputs to the flag rules.
#[derive(Debug, Clone, Copy)]
pub struct FlagInputs<'a> {
    /// Which mapped columns exist in the loaded schema.
    pub schema: &'a SchemaPresence,
    /// Parsed handling duration.
    pub duration_seconds: Option<u64>,
    /// Lowercased report type.
    pub report_type: &'a str,
    /// Normalized category.
    pub category: Option<&'a str>,
    /// Latitude, `None` when blank or non-numeric.
    pub latitude: Option<f64>,
    /// Longitude, `None` when blank or non-numeric.
    pub longitude: Option<f64>,
    /// Raw description text.
    pub description: Option<&'a str>,
}

impl FlagInputs<'_> {
    /// Both coordinates read as zero, with blanks counted as zero.
    fn zero_coordinates(&self) -> bool {
        self.latitude.unwrap_or(0.0) == 0.0 && self.longitude.unwrap_or(0.0) == 0.0
    }

    /// Either the category or the report type contains `needle`, ignoring case.
    fn labelled(&self, needle: &str) -> bool {
        self.report_type.to_lowercase().contains(needle)
            || self
                .category
                .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

/// A single flag-deriving rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagRule {
    /// Coordinates are zero/zero. Needs both coordinate columns.
    ZeroCoordinates,
    /// Duration present and at most [`SHORT_CALL_MAX_SECONDS`].
    ShortDuration,
    /// Category or report type mentions `ghost`.
    GhostLabel,
    /// Zero duration, near-empty description and zero coordinates. Needs
    /// latitude, longitude and description columns.
    GhostHeuristic,
    /// Category or report type mentions `prank`.
    PrankLabel,
}

/// Every rule, in evaluation order.
pub const FLAG_RULES: &[FlagRule] = &[
    FlagRule::ZeroCoordinates,
    FlagRule::ShortDuration,
    FlagRule::GhostLabel,
    FlagRule::GhostHeuristic,
    FlagRule::PrankLabel,
];

/// The rules that vote for [`Flag::GhostCall`], in evaluation order.
pub const GHOST_RULES: &[FlagRule] = &[FlagRule::GhostLabel, FlagRule::GhostHeuristic];

impl FlagRule {
    /// The flag this rule votes for.
    #[must_use]
    pub const fn flag(self) -> Flag {
        match self {
            Self::ZeroCoordinates => Flag::FakeLocation,
            Self::ShortDuration => Flag::ShortCall,
            Self::GhostLabel | Self::GhostHeuristic => Flag::GhostCall,
            Self::PrankLabel => Flag::PrankCall,
        }
    }

    /// Evaluates the rule for one record.
    #[must_use]
    pub fn evaluate(self, inputs: &FlagInputs<'_>) -> bool {
        match self {
            Self::ZeroCoordinates => {
                inputs.schema.latitude && inputs.schema.longitude && inputs.zero_coordinates()
            }
            Self::ShortDuration => inputs
                .duration_seconds
                .is_some_and(|d| d <= SHORT_CALL_MAX_SECONDS),
            Self::GhostLabel => inputs.labelled("ghost"),
            Self::GhostHeuristic => {
                let schema = inputs.schema;
                if !(schema.latitude && schema.longitude && schema.description) {
                    return false;
                }
                let description_len = inputs.description.map_or(0, |d| d.trim().chars().count());
                inputs.duration_seconds.unwrap_or(u64::MAX) == GHOST_DURATION_SECONDS
                    && description_len < GHOST_DESCRIPTION_MAX_CHARS
                    && inputs.zero_coordinates()
            }
            Self::PrankLabel => inputs.labelled("prank"),
        }
    }
}

/// Runs every rule in [`FLAG_RULES`] and ORs the votes per flag.
///
/// `rapid_repeat` is always `false` here.
#[must_use]
pub fn evaluate_flags(inputs: &FlagInputs<'_>) -> CallFlags {
    let mut flags = CallFlags::default();
    for rule in FLAG_RULES {
        let vote = rule.evaluate(inputs);
        let flag = rule.flag();
        flags.set(flag, flags.get(flag) | vote);
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_SCHEMA: SchemaPresence = SchemaPresence {
        report_time: true,
        duration: true,
        report_type: true,
        category: true,
        subdistrict: true,
        ward: true,
        latitude: true,
        longitude: true,
        identity: true,
        description: true,
        agent: true,
    };

    fn inputs(schema: &SchemaPresence) -> FlagInputs<'_> {
        FlagInputs {
            schema,
            duration_seconds: Some(120),
            report_type: "darurat",
            category: Some("Kebakaran"),
            latitude: Some(-6.2),
            longitude: Some(106.8),
            description: Some("Rumah terbakar di gang 3"),
        }
    }

    #[test]
    fn genuine_call_sets_no_flags() {
        assert_eq!(evaluate_flags(&inputs(&FULL_SCHEMA)), CallFlags::default());
    }

    #[test]
    fn zero_coordinates_require_both_columns() {
        let mut record = inputs(&FULL_SCHEMA);
        record.latitude = Some(0.0);
        record.longitude = None;
        assert!(FlagRule::ZeroCoordinates.evaluate(&record));

        let schema = SchemaPresence {
            longitude: false,
            ..FULL_SCHEMA
        };
        let mut record = inputs(&schema);
        record.latitude = Some(0.0);
        record.longitude = None;
        assert!(!FlagRule::ZeroCoordinates.evaluate(&record));
    }

    #[test]
    fn short_duration_includes_zero_and_five() {
        let mut record = inputs(&FULL_SCHEMA);
        for (duration, expected) in [(Some(0), true), (Some(5), true), (Some(6), false), (None, false)] {
            record.duration_seconds = duration;
            assert_eq!(FlagRule::ShortDuration.evaluate(&record), expected, "{duration:?}");
        }
    }

    #[test]
    fn ghost_label_matches_category_or_type() {
        let mut record = inputs(&FULL_SCHEMA);
        record.category = Some("Ghost Unit A");
        assert!(FlagRule::GhostLabel.evaluate(&record));
        assert!(evaluate_flags(&record).ghost_call);

        let mut record = inputs(&FULL_SCHEMA);
        record.report_type = "ghost";
        assert!(FlagRule::GhostLabel.evaluate(&record));
        assert!(!FlagRule::GhostHeuristic.evaluate(&record));
    }

    #[test]
    fn ghost_heuristic_needs_all_signals() {
        let mut record = inputs(&FULL_SCHEMA);
        record.duration_seconds = Some(0);
        record.description = Some(" - ");
        record.latitude = None;
        record.longitude = Some(0.0);
        assert!(FlagRule::GhostHeuristic.evaluate(&record));

        record.duration_seconds = None;
        assert!(!FlagRule::GhostHeuristic.evaluate(&record));

        record.duration_seconds = Some(0);
        record.description = Some("halo halo");
        assert!(!FlagRule::GhostHeuristic.evaluate(&record));
    }

    #[test]
    fn ghost_rules_are_the_ghost_voters() {
        let voters: Vec<FlagRule> = FLAG_RULES
            .iter()
            .copied()
            .filter(|r| r.flag() == Flag::GhostCall)
            .collect();
        assert_eq!(voters, GHOST_RULES);
    }

    #[test]
    fn ghost_heuristic_skipped_without_description_column() {
        let schema = SchemaPresence {
            description: false,
            ..FULL_SCHEMA
        };
        let mut record = inputs(&schema);
        record.duration_seconds = Some(0);
        record.description = None;
        record.latitude = Some(0.0);
        record.longitude = Some(0.0);
        assert!(!FlagRule::GhostHeuristic.evaluate(&record));
        assert!(!evaluate_flags(&record).ghost_call);
    }

    #[test]
    fn prank_label_is_case_insensitive() {
        let mut record = inputs(&FULL_SCHEMA);
        record.category = Some("PRANK Anak");
        assert!(evaluate_flags(&record).prank_call);

        let mut record = inputs(&FULL_SCHEMA);
        record.report_type = "prank";
        record.category = None;
        assert!(evaluate_flags(&record).prank_call);
    }
}
