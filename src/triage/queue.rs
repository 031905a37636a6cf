use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::AlertSeverity;

use super::alerts::Alert;

/// Response-time constants, in minutes, used for queue statistics.
pub const RED_RESPONSE_MINUTES: f64 = 0.5;
pub const YELLOW_RESPONSE_MINUTES: f64 = 12.0;
pub const ROUTINE_RESPONSE_MINUTES: f64 = 72.0;

/// Fixed nadir heuristic for the triage boost, independent of any
/// regimen-specific window.
const NADIR_HEURISTIC_DAYS: std::ops::RangeInclusive<i64> = 7..=12;

/// One patient's completed report, as input to triage ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientReport {
    pub patient_id: Uuid,
    pub alerts: Vec<Alert>,
    /// When the questionnaire was completed, if known.
    pub completed_at: Option<NaiveDateTime>,
    /// Current treatment day, if known.
    pub treatment_day: Option<i64>,
}

/// One ranked entry of the clinical review queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriagePriority {
    pub patient_id: Uuid,
    /// 1-based position in the queue.
    pub rank: usize,
    pub score: f64,
    pub reason: String,
    pub recommended_action: String,
    pub response_target: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueStatistics {
    pub total_patients: usize,
    pub red_patients: usize,
    pub yellow_patients: usize,
    pub routine_patients: usize,
    /// Weighted average of the per-band response-time constants.
    pub average_response_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageQueue {
    pub entries: Vec<TriagePriority>,
    pub statistics: QueueStatistics,
}

fn band_counts(alerts: &[Alert]) -> (usize, usize, usize) {
    let red = alerts
        .iter()
        .filter(|a| a.severity == AlertSeverity::Red)
        .count();
    let yellow = alerts
        .iter()
        .filter(|a| a.severity == AlertSeverity::Yellow)
        .count();
    let green = alerts
        .iter()
        .filter(|a| a.severity == AlertSeverity::Green)
        .count();
    (red, yellow, green)
}

fn priority_score(report: &PatientReport, now: NaiveDateTime) -> (f64, String) {
    let (red, yellow, green) = band_counts(&report.alerts);
    let mut score = 100.0 * red as f64 + 25.0 * yellow as f64 + 5.0 * green as f64;

    let mut reasons: Vec<String> = Vec::new();
    if red > 0 {
        reasons.push(format!("{red} emergency alert{}", plural(red)));
    }
    if yellow > 0 {
        reasons.push(format!("{yellow} urgent alert{}", plural(yellow)));
    }
    if reasons.is_empty() {
        reasons.push("no active alerts".to_string());
    }

    if let Some(completed_at) = report.completed_at {
        let elapsed = now.signed_duration_since(completed_at);
        if elapsed >= chrono::Duration::zero() && elapsed <= chrono::Duration::hours(1) {
            score += 10.0;
            reasons.push("reported within the last hour".to_string());
        }
    }

    if let Some(day) = report.treatment_day {
        if NADIR_HEURISTIC_DAYS.contains(&day) {
            score += 15.0;
            reasons.push(format!("treatment day {day}, likely nadir"));
        }
    }

    (score, reasons.join("; "))
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn recommendation(alerts: &[Alert]) -> (String, String) {
    let (red, yellow, _) = band_counts(alerts);
    if red > 0 {
        (
            "Contact patient immediately".to_string(),
            "within 30 minutes".to_string(),
        )
    } else if yellow > 0 {
        (
            "Review same day or next day".to_string(),
            "within 24 hours".to_string(),
        )
    } else {
        ("Routine review".to_string(), "within 3-5 days".to_string())
    }
}

/// Rank multiple patients' alert sets into a prioritized clinical
/// queue. Scores sort descending; equal scores keep input order.
pub fn build_triage_queue(reports: &[PatientReport], now: NaiveDateTime) -> TriageQueue {
    let mut scored: Vec<(f64, String, &PatientReport)> = reports
        .iter()
        .map(|report| {
            let (score, reason) = priority_score(report, now);
            (score, reason, report)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let entries: Vec<TriagePriority> = scored
        .into_iter()
        .enumerate()
        .map(|(idx, (score, reason, report))| {
            let (recommended_action, response_target) = recommendation(&report.alerts);
            TriagePriority {
                patient_id: report.patient_id,
                rank: idx + 1,
                score,
                reason,
                recommended_action,
                response_target,
            }
        })
        .collect();

    let statistics = queue_statistics(reports);

    tracing::info!(
        patients = statistics.total_patients,
        red = statistics.red_patients,
        yellow = statistics.yellow_patients,
        "Triage queue built"
    );

    TriageQueue {
        entries,
        statistics,
    }
}

/// Per-band patient counts (a patient lands in their worst band) and
/// the weighted average response time.
pub fn queue_statistics(reports: &[PatientReport]) -> QueueStatistics {
    let mut stats = QueueStatistics {
        total_patients: reports.len(),
        ..Default::default()
    };

    for report in reports {
        let (red, yellow, _) = band_counts(&report.alerts);
        if red > 0 {
            stats.red_patients += 1;
        } else if yellow > 0 {
            stats.yellow_patients += 1;
        } else {
            stats.routine_patients += 1;
        }
    }

    if stats.total_patients > 0 {
        let weighted = stats.red_patients as f64 * RED_RESPONSE_MINUTES
            + stats.yellow_patients as f64 * YELLOW_RESPONSE_MINUTES
            + stats.routine_patients as f64 * ROUTINE_RESPONSE_MINUTES;
        stats.average_response_minutes = weighted / stats.total_patients as f64;
    }

    stats
}
