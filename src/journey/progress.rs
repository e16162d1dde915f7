//! Journey tracker: walks one treatment episode through the brand's phases.
//!
//! The engine only answers "is this submission acceptable". This is the
//! caller side: it keeps the current phase, refuses out-of-order
//! submissions, records an audit trail and maps outcomes to a risk level for
//! the persistence and escalation collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Brand, LegalConsentData, PhaseData, PhaseId};

use super::engine::JourneyEngine;
use super::safety::{applicable_questions, pom_questions, triggered_questions};
use super::types::{JourneyError, PhaseValidationResult};

/// Stored risk severity for a phase outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JourneyStatus {
    InProgress,
    /// A hard stop fired; the journey cannot continue.
    Blocked { reason: String },
    Completed,
}

/// One submission in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub phase: PhaseId,
    pub at: DateTime<Utc>,
    pub outcome: PhaseValidationResult,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone)]
pub struct JourneyProgress {
    id: Uuid,
    engine: JourneyEngine,
    current: PhaseId,
    status: JourneyStatus,
    completed: Vec<PhaseId>,
    audit: Vec<AuditEntry>,
    risk_level: RiskLevel,
}

impl JourneyProgress {
    /// Start a journey at the brand's first required phase.
    pub fn start(engine: JourneyEngine) -> Self {
        let current = engine.first_phase().unwrap_or(PhaseId::Identification);
        let id = Uuid::new_v4();
        tracing::info!(journey_id = %id, brand = %engine.brand(), "Journey started");
        Self {
            id,
            engine,
            current,
            status: JourneyStatus::InProgress,
            completed: Vec::new(),
            audit: Vec::new(),
            risk_level: RiskLevel::Low,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn brand(&self) -> Brand {
        self.engine.brand()
    }

    pub fn current_phase(&self) -> PhaseId {
        self.current
    }

    pub fn status(&self) -> &JourneyStatus {
        &self.status
    }

    pub fn completed_phases(&self) -> &[PhaseId] {
        &self.completed
    }

    pub fn audit_trail(&self) -> &[AuditEntry] {
        &self.audit
    }

    /// Highest risk recorded so far.
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Whether the caller should route this journey to the escalation pathway.
    pub fn needs_escalation(&self) -> bool {
        self.risk_level == RiskLevel::High
    }

    /// Submit data for the current phase.
    ///
    /// Advances when the result allows it, completes after the last phase,
    /// and blocks on a hard stop. A rejected submission leaves the journey
    /// on the same phase so the caller can resubmit.
    pub fn submit(&mut self, data: PhaseData) -> Result<&PhaseValidationResult, JourneyError> {
        self.ensure_open()?;
        let submitted = data.phase_id();
        if submitted != self.current {
            return Err(JourneyError::PhaseMismatch {
                expected: self.current,
                submitted,
            });
        }

        let result = self.engine.validate(&data, None);
        let risk_level = self.assess_risk(&data, &result);
        self.risk_level = self.risk_level.max(risk_level);

        if result.hard_stop {
            let reason = result
                .hard_stop_reason
                .clone()
                .unwrap_or_else(|| "Hard stop".to_string());
            tracing::warn!(
                journey_id = %self.id,
                phase = submitted.id(),
                "Journey blocked by hard stop"
            );
            self.status = JourneyStatus::Blocked { reason };
        } else if result.can_proceed {
            self.completed.push(submitted);
            match self.engine.next_phase(submitted) {
                Some(next) => {
                    tracing::debug!(
                        journey_id = %self.id,
                        from = submitted.id(),
                        to = next.id(),
                        "Journey advanced"
                    );
                    self.current = next;
                }
                None => {
                    tracing::info!(journey_id = %self.id, "Journey completed");
                    self.status = JourneyStatus::Completed;
                }
            }
        }

        self.audit.push(AuditEntry {
            phase: submitted,
            at: Utc::now(),
            outcome: result,
            risk_level,
        });
        let last = self.audit.len() - 1;
        Ok(&self.audit[last].outcome)
    }

    /// Move back one phase so the operator can amend an earlier submission.
    pub fn step_back(&mut self) -> Result<PhaseId, JourneyError> {
        self.ensure_open()?;
        let previous = self
            .engine
            .previous_phase(self.current)
            .ok_or(JourneyError::NoPreviousPhase(self.current))?;
        self.completed.retain(|p| *p < previous);
        self.current = previous;
        tracing::debug!(journey_id = %self.id, to = previous.id(), "Journey stepped back");
        Ok(previous)
    }

    fn ensure_open(&self) -> Result<(), JourneyError> {
        match self.status {
            JourneyStatus::InProgress => Ok(()),
            _ => Err(JourneyError::JourneyClosed(self.id)),
        }
    }

    fn assess_risk(&self, data: &PhaseData, result: &PhaseValidationResult) -> RiskLevel {
        if result.hard_stop {
            return RiskLevel::High;
        }
        match data {
            PhaseData::LegalConsent(consent) if self.has_triggered_answer(consent) => {
                RiskLevel::Medium
            }
            _ => RiskLevel::Low,
        }
    }

    /// Without a hard stop, any triggered question is a soft one.
    fn has_triggered_answer(&self, consent: &LegalConsentData) -> bool {
        let mut questions = applicable_questions(self.brand());
        if self.engine.is_pom_required() {
            questions.extend(pom_questions());
        }
        !triggered_questions(&questions, &consent.answers).is_empty()
    }
}
