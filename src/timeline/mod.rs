//! Treatment-cycle timeline: where is this patient right now?
//!
//! `profiler` turns a treatment record + calendar date into a
//! `TreatmentContext` (cycle day, phase, nadir flag); `nadir` refines
//! "in the nadir window" into phase-of-nadir and infection-risk
//! guidance. Both are pure functions of their inputs and are
//! re-evaluated on every call.

mod nadir;
mod profiler;

pub use nadir::*;
pub use profiler::*;
