use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A patient's active course of treatment on one regimen.
/// Supplied by the treatment-data collaborator; the engine never
/// mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub regimen_code: String,
    /// 1-based cycle number currently underway.
    pub current_cycle: u32,
    /// First infusion of the whole course.
    pub first_infusion_date: NaiveDate,
    /// Most recent infusion (start of the current cycle).
    pub last_infusion_date: NaiveDate,
    /// Planned next infusion, when scheduled.
    pub next_infusion_date: Option<NaiveDate>,
}
