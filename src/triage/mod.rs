//! Alert derivation and clinical triage: turning grading output into
//! emergency/urgent/routine alerts, then ranking patients into a
//! prioritized review queue.
//!
//! Alerts are always computed and returned to the caller. Whatever the
//! caller later fails to do with them (storage, notification) must not
//! suppress the fact that a grade-3/4 symptom was detected.

mod alerts;
mod messages;
mod queue;

pub use alerts::*;
pub use messages::MessageTemplates;
pub use queue::*;
