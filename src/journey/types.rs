use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::models::{Brand, BrandScope, PhaseId, StopType};

/// Outcome of validating one phase submission.
///
/// This is the engine's only output. It is advisory: the caller decides
/// what to persist, block or escalate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub can_proceed: bool,
    pub hard_stop: bool,
    pub hard_stop_reason: Option<String>,
}

impl PhaseValidationResult {
    /// Valid, no findings.
    pub fn passed() -> Self {
        Self::from_findings(Vec::new(), Vec::new())
    }

    /// Build a non-hard-stop result: valid iff there are no errors.
    pub fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        let is_valid = errors.is_empty();
        Self {
            is_valid,
            errors,
            warnings,
            can_proceed: is_valid,
            hard_stop: false,
            hard_stop_reason: None,
        }
    }

    /// Result for a phase id the catalog does not know.
    pub fn unknown_phase(id: u8) -> Self {
        Self::rejected(format!("Unknown phase: {id}"))
    }

    /// Invalid with a single error and no hard stop.
    pub fn rejected(error: String) -> Self {
        Self::from_findings(vec![error], Vec::new())
    }
}

/// Static description of one phase in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct PhaseDefinition {
    pub id: PhaseId,
    pub name: &'static str,
    pub required_for: BrandScope,
}

/// A screening question with a declarative stop condition.
#[derive(Debug, Clone, Copy)]
pub struct SafetyQuestion {
    pub id: &'static str,
    pub text: &'static str,
    pub brands: BrandScope,
    /// Answer value that activates the stop. Matched case-sensitively
    /// against the trimmed answer.
    pub trigger_value: &'static str,
    pub stop_type: StopType,
    pub stop_message: &'static str,
}

impl SafetyQuestion {
    pub fn is_triggered_by(&self, answer: &str) -> bool {
        answer.trim() == self.trigger_value
    }
}

/// Everything a validator needs besides the phase data itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub brand: Brand,
    /// Enables the POM-only screening branch in Legal Consent.
    pub is_pom: bool,
    /// Reference date for consultation recency checks.
    pub today: NaiveDate,
    pub config: EngineConfig,
}

/// Journey errors. Validation findings are never errors; these cover
/// parsing, configuration and tracker misuse.
#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Submitted {submitted:?} while journey is at {expected:?}")]
    PhaseMismatch { expected: PhaseId, submitted: PhaseId },

    #[error("Journey {0} is closed")]
    JourneyClosed(uuid::Uuid),

    #[error("No phase before {0:?}")]
    NoPreviousPhase(PhaseId),

    #[error("Invalid phase payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
