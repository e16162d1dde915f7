//! Per-phase input supplied by the caller.
//!
//! Every field defaults so a partial payload still decodes; missing values
//! surface as validation errors, not decode errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::enums::PhaseId;
use crate::journey::JourneyError;

/// Phase 0: who is being treated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentificationData {
    pub is_new_client: bool,
    pub client_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Phase 1: prescriber authorisation for prescription-only medicine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomTriageData {
    pub prescriber_id: Option<String>,
    pub gmc_number: Option<String>,
    pub face_to_face_date: Option<String>, // YYYY-MM-DD
}

/// Phase 2: screening answers and signed consent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalConsentData {
    /// Safety question id → answer.
    #[serde(deserialize_with = "deserialize_answers")]
    pub answers: BTreeMap<String, String>,
    /// Signature payload (typically a data URL from the signature pad).
    pub signature: Option<String>,
    pub signer_name: Option<String>,
    pub consent_declaration: bool,
}

/// Phase 3: what was administered, for traceability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalRecordData {
    pub treatment_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub treatment_areas: Vec<String>,
    pub product_used: Option<String>,
    pub batch_number: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub before_photos: Vec<String>,
}

/// Phase 4: aftercare and follow-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseOutData {
    pub aftercare_provided: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub after_photos: Vec<String>,
    pub send_aftercare_email: bool,
    pub aftercare_template_id: Option<String>,
}

/// Typed phase submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseData {
    Identification(IdentificationData),
    PomTriage(PomTriageData),
    LegalConsent(LegalConsentData),
    ClinicalRecord(ClinicalRecordData),
    CloseOut(CloseOutData),
}

impl PhaseData {
    pub fn phase_id(&self) -> PhaseId {
        match self {
            Self::Identification(_) => PhaseId::Identification,
            Self::PomTriage(_) => PhaseId::PomTriage,
            Self::LegalConsent(_) => PhaseId::LegalConsent,
            Self::ClinicalRecord(_) => PhaseId::ClinicalRecord,
            Self::CloseOut(_) => PhaseId::CloseOut,
        }
    }

    /// Decode an untyped payload for a known phase.
    pub fn from_value(phase: PhaseId, payload: &serde_json::Value) -> Result<Self, JourneyError> {
        let payload = if payload.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            payload.clone()
        };
        Ok(match phase {
            PhaseId::Identification => Self::Identification(serde_json::from_value(payload)?),
            PhaseId::PomTriage => Self::PomTriage(serde_json::from_value(payload)?),
            PhaseId::LegalConsent => Self::LegalConsent(serde_json::from_value(payload)?),
            PhaseId::ClinicalRecord => Self::ClinicalRecord(serde_json::from_value(payload)?),
            PhaseId::CloseOut => Self::CloseOut(serde_json::from_value(payload)?),
        })
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Screening answers arrive from form widgets as strings, booleans or
/// numbers. Booleans map to "Yes"/"No"; `null` counts as unanswered.
fn deserialize_answers<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = null_as_default(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(id, value)| answer_text(value).map(|answer| (id, answer)))
        .collect())
}

fn answer_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Bool(true) => Some("Yes".to_string()),
        serde_json::Value::Bool(false) => Some("No".to_string()),
        other => Some(other.to_string()),
    }
}

/// Trimmed, non-empty view of an optional text field.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
