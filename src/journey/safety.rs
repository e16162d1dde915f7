//! Safety question catalog and POM gate.
//!
//! Questions are declarative: a trigger value plus a stop severity. Nothing
//! here executes caller-supplied logic, so the catalog can be serialized,
//! audited and tested on its own.

use std::collections::BTreeMap;

use crate::models::{Brand, BrandScope, StopType};

use super::types::SafetyQuestion;

const YES: &str = "Yes";

const POM_BRANDS: &[Brand] = &[Brand::Aesthetics];
const GROOMING_BRANDS: &[Brand] = &[Brand::Barbering, Brand::Grooming];

// ── Question registry ───────────────────────────────────────

static QUESTIONS: &[SafetyQuestion] = &[
    SafetyQuestion {
        id: "pregnant_or_breastfeeding",
        text: "Are you pregnant, trying to conceive, or breastfeeding?",
        brands: BrandScope::Only(POM_BRANDS),
        trigger_value: YES,
        stop_type: StopType::Hard,
        stop_message: "Treatment cannot proceed during pregnancy or breastfeeding.",
    },
    SafetyQuestion {
        id: "blood_disorder",
        text: "Do you have a blood clotting or bleeding disorder?",
        brands: BrandScope::Only(POM_BRANDS),
        trigger_value: YES,
        stop_type: StopType::Hard,
        stop_message: "Treatment cannot proceed: client reports a blood clotting or bleeding disorder.",
    },
    SafetyQuestion {
        id: "allergy_to_ingredients",
        text: "Are you allergic to any ingredient of the proposed product (e.g. botulinum toxin, lidocaine, albumin)?",
        brands: BrandScope::Only(POM_BRANDS),
        trigger_value: YES,
        stop_type: StopType::Hard,
        stop_message: "Treatment cannot proceed: known allergy to a product ingredient.",
    },
    SafetyQuestion {
        id: "active_infection",
        text: "Do you have an active infection, cold sore or open wound in the treatment area?",
        brands: BrandScope::All,
        trigger_value: YES,
        stop_type: StopType::Hard,
        stop_message: "Treatment cannot proceed over an active infection or open wound.",
    },
    SafetyQuestion {
        id: "anticoagulants",
        text: "Are you taking blood-thinning medication (e.g. aspirin, warfarin)?",
        brands: BrandScope::Only(POM_BRANDS),
        trigger_value: YES,
        stop_type: StopType::Soft,
        stop_message: "Client takes blood thinners: increased bruising risk, discuss before treating.",
    },
    SafetyQuestion {
        id: "autoimmune_condition",
        text: "Do you have an autoimmune or neuromuscular condition?",
        brands: BrandScope::Only(POM_BRANDS),
        trigger_value: YES,
        stop_type: StopType::Soft,
        stop_message: "Client reports an autoimmune or neuromuscular condition: practitioner review advised.",
    },
    SafetyQuestion {
        id: "previous_adverse_reaction",
        text: "Have you had an adverse reaction to a similar treatment before?",
        brands: BrandScope::All,
        trigger_value: YES,
        stop_type: StopType::Soft,
        stop_message: "Client reports a previous adverse reaction: record details and proceed with caution.",
    },
    SafetyQuestion {
        id: "skin_condition",
        text: "Do you have a skin condition such as eczema or psoriasis in the treatment area?",
        brands: BrandScope::Only(GROOMING_BRANDS),
        trigger_value: YES,
        stop_type: StopType::Soft,
        stop_message: "Client reports a skin condition in the treatment area: patch test advised.",
    },
    SafetyQuestion {
        id: "recent_sunburn",
        text: "Have you had sunburn in the treatment area in the last 48 hours?",
        brands: BrandScope::Only(GROOMING_BRANDS),
        trigger_value: YES,
        stop_type: StopType::Soft,
        stop_message: "Recent sunburn in the treatment area: avoid heat and chemical products.",
    },
];

// ── Lookups ─────────────────────────────────────────────────

/// The full catalog in display order.
pub fn all_questions() -> &'static [SafetyQuestion] {
    QUESTIONS
}

pub fn question(id: &str) -> Option<&'static SafetyQuestion> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Questions the brand's clients must answer, in catalog order.
pub fn applicable_questions(brand: Brand) -> Vec<&'static SafetyQuestion> {
    QUESTIONS.iter().filter(|q| q.brands.contains(brand)).collect()
}

/// Questions scoped only to POM brands.
pub fn pom_questions() -> Vec<&'static SafetyQuestion> {
    QUESTIONS
        .iter()
        .filter(|q| q.brands == BrandScope::Only(POM_BRANDS))
        .collect()
}

/// Whether the brand administers prescription-only medicine. Gates Phase 1
/// and the POM screening branch of Phase 2.
pub fn is_pom_required(brand: Brand) -> bool {
    POM_BRANDS.contains(&brand)
}

/// Questions whose recorded answer, trimmed, equals their trigger value.
pub fn triggered_questions<'q>(
    questions: &[&'q SafetyQuestion],
    answers: &BTreeMap<String, String>,
) -> Vec<&'q SafetyQuestion> {
    questions
        .iter()
        .copied()
        .filter(|q| answers.get(q.id).is_some_and(|a| q.is_triggered_by(a)))
        .collect()
}
