//! Brand-aware front door over the catalogs and validators.

use chrono::{Local, NaiveDate};

use crate::config::EngineConfig;
use crate::models::{Brand, PhaseData, PhaseId};

use super::phases;
use super::safety::is_pom_required;
use super::types::{JourneyError, PhaseValidationResult, ValidationContext};
use super::validators::{
    validate_clinical_record, validate_close_out, validate_identification,
    validate_legal_consent, validate_pom_triage,
};

/// Phase engine for one brand.
///
/// Holds no mutable state: every call is a pure function of the brand, the
/// reference date, the config and the submitted data. Cheap to clone and
/// safe to share across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyEngine {
    brand: Brand,
    config: EngineConfig,
    today: NaiveDate,
}

impl JourneyEngine {
    /// Engine with default thresholds, dated today on the local clock.
    pub fn new(brand: Brand) -> Self {
        Self {
            brand,
            config: EngineConfig::default(),
            today: Local::now().date_naive(),
        }
    }

    /// Engine with custom thresholds. Rejects a config that fails
    /// [`EngineConfig::validate`].
    pub fn with_config(brand: Brand, config: EngineConfig) -> Result<Self, JourneyError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(brand)
        })
    }

    /// Pin the reference date used for consultation recency.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn brand(&self) -> Brand {
        self.brand
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_pom_required(&self) -> bool {
        is_pom_required(self.brand)
    }

    pub fn required_phases(&self) -> Vec<PhaseId> {
        phases::required_phases(self.brand)
    }

    pub fn is_phase_required(&self, phase: PhaseId) -> bool {
        phases::is_phase_required(self.brand, phase)
    }

    pub fn next_phase(&self, current: PhaseId) -> Option<PhaseId> {
        phases::next_phase(self.brand, current)
    }

    pub fn previous_phase(&self, current: PhaseId) -> Option<PhaseId> {
        phases::previous_phase(self.brand, current)
    }

    pub fn first_phase(&self) -> Option<PhaseId> {
        phases::first_phase(self.brand)
    }

    fn context(&self, is_pom: Option<bool>) -> ValidationContext {
        ValidationContext {
            brand: self.brand,
            is_pom: is_pom.unwrap_or_else(|| self.is_pom_required()),
            today: self.today,
            config: self.config,
        }
    }

    /// Validate a typed phase submission.
    ///
    /// `is_pom` only affects Legal Consent; `None` derives it from the brand.
    pub fn validate(&self, data: &PhaseData, is_pom: Option<bool>) -> PhaseValidationResult {
        let ctx = self.context(is_pom);
        let result = match data {
            PhaseData::Identification(d) => validate_identification(d),
            PhaseData::PomTriage(d) => validate_pom_triage(d, &ctx),
            PhaseData::LegalConsent(d) => validate_legal_consent(d, &ctx),
            PhaseData::ClinicalRecord(d) => validate_clinical_record(d),
            PhaseData::CloseOut(d) => validate_close_out(d),
        };
        log_validation(self.brand, data.phase_id(), &result);
        result
    }

    /// Validate an untyped payload by numeric phase id.
    ///
    /// Unknown ids and undecodable payloads degrade to an invalid result with
    /// a single error instead of failing. POM triage for a brand that skips
    /// it passes without looking at the payload.
    pub fn validate_phase(
        &self,
        phase_id: u8,
        payload: &serde_json::Value,
        is_pom: Option<bool>,
    ) -> PhaseValidationResult {
        let Some(phase) = PhaseId::from_id(phase_id) else {
            tracing::warn!(brand = %self.brand, phase_id, "Validation requested for unknown phase");
            return PhaseValidationResult::unknown_phase(phase_id);
        };

        if phase == PhaseId::PomTriage && !self.is_phase_required(phase) {
            tracing::debug!(brand = %self.brand, phase_id, "POM triage skipped for brand");
            return PhaseValidationResult::passed();
        }

        match PhaseData::from_value(phase, payload) {
            Ok(data) => self.validate(&data, is_pom),
            Err(e) => {
                tracing::warn!(
                    brand = %self.brand,
                    phase_id,
                    error = %e,
                    "Phase payload could not be decoded"
                );
                PhaseValidationResult::rejected(format!("{}: {e}", phase.label()))
            }
        }
    }
}

/// Log a validation outcome WITHOUT patient data.
fn log_validation(brand: Brand, phase: PhaseId, result: &PhaseValidationResult) {
    if result.hard_stop {
        tracing::warn!(
            brand = %brand,
            phase = phase.id(),
            error_count = result.errors.len(),
            "Phase validation: hard stop"
        );
    } else if result.can_proceed {
        tracing::debug!(
            brand = %brand,
            phase = phase.id(),
            warning_count = result.warnings.len(),
            "Phase validation: passed"
        );
    } else {
        tracing::debug!(
            brand = %brand,
            phase = phase.id(),
            error_count = result.errors.len(),
            warning_count = result.warnings.len(),
            "Phase validation: blocked"
        );
    }
}
