//! Rapid-repeat (spam) detection.
//!
//! Records are ordered by report time and grouped by reporter identity. A
//! record is a rapid repeat when the previous report from the same identity
//! arrived at most [`RAPID_REPEAT_MAX_MINUTES`] earlier.

use std::collections::HashMap;

use call_center_incident_models::CanonicalRecord;

/// Maximum gap, in minutes, between two reports from one identity for the
/// later one to count as a rapid repeat.
pub const RAPID_REPEAT_MAX_MINUTES: f64 = 2.0;

/// Sets `rapid_repeat` on every record.
///
/// Records keep their positions; only the flag changes. When
/// `identity_present` is `false` (no identity column in the schema) every
/// record is cleared. Records without a timestamp sort after all timed
/// records and never count as repeats, and neither do records whose
/// identity cell is blank.
pub fn detect_rapid_repeats(records: &mut [CanonicalRecord], identity_present: bool) {
    let repeats = if identity_present {
        rapid_repeat_mask(records)
    } else {
        vec![false; records.len()]
    };

    for (record, repeat) in records.iter_mut().zip(repeats) {
        record.flags.rapid_repeat = repeat;
    }
}

/// Computes the rapid-repeat flag for each record, indexed like `records`.
fn rapid_repeat_mask(records: &[CanonicalRecord]) -> Vec<bool> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    // Stable: ties keep load order. `None` timestamps sort last.
    order.sort_by_key(|&i| {
        let ts = records[i].report_time;
        (ts.is_none(), ts)
    });

    let mut previous: HashMap<&str, usize> = HashMap::new();
    let mut mask = vec![false; records.len()];

    for &i in &order {
        let Some(identity) = records[i].identity.as_deref() else {
            continue;
        };
        if let Some(prev) = previous.insert(identity, i)
            && let (Some(current), Some(earlier)) = (records[i].report_time, records[prev].report_time)
        {
            #[allow(clippy::cast_precision_loss)]
            let minutes = (current - earlier).num_milliseconds() as f64 / 60_000.0;
            mask[i] = minutes <= RAPID_REPEAT_MAX_MINUTES;
        }
    }

    let flagged = mask.iter().filter(|m| **m).count();
    log::debug!(
        "Rapid-repeat scan: {flagged} of {} records flagged across {} identities",
        records.len(),
        previous.len()
    );

    mask
}
