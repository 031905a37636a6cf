//! Cycleguard: the clinical decision engine behind an adaptive
//! chemotherapy symptom-monitoring service.
//!
//! The engine computes a patient's position in their treatment cycle,
//! selects which symptom questions to ask for the regimen and drug
//! exposure, adapts the question set per answer (skip/branch), converts
//! answers into standardized 0-4 severity grades, and detects
//! emergencies and ranks patients for clinical attention.
//!
//! Everything here is a pure, synchronous function over explicit
//! inputs: no I/O beyond the optional reference-data load, no locks, no
//! state retained between calls. Persistence, transport, UI, and access
//! control live in the products embedding this crate.

pub mod branching;
pub mod config;
pub mod engine;
pub mod error;
pub mod grading;
pub mod models;
pub mod reference;
pub mod selection;
pub mod timeline;
pub mod triage;

pub use config::{init_tracing, EngineConfig};
pub use engine::{CompletionOutcome, DecisionEngine, RegimenQuestionnaire};
pub use error::EngineError;
pub use reference::ReferenceData;
