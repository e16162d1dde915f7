//! Treatment journey phase engine.
//!
//! Identification → POM Triage → Legal Consent → Clinical Record → Close-out.
//! Catalogs are static and read-only; validators are pure; the engine
//! dispatches by phase for one brand; the tracker is the caller-side walk
//! through a single journey.

pub mod types;
pub mod phases;
pub mod safety;
pub mod validators;
pub mod engine;
pub mod progress;

pub use engine::JourneyEngine;
pub use progress::{AuditEntry, JourneyProgress, JourneyStatus, RiskLevel};
pub use types::{
    JourneyError, PhaseDefinition, PhaseValidationResult, SafetyQuestion, ValidationContext,
};
