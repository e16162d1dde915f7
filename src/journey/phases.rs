//! Phase catalog: which phases exist, in what order, and for which brands.
//!
//! This is the single place that decides whether a brand needs a phase.
//! Sequencing and validator dispatch both go through it.

use crate::models::{Brand, BrandScope, PhaseId};

use super::types::PhaseDefinition;

static PHASES: &[PhaseDefinition] = &[
    PhaseDefinition {
        id: PhaseId::Identification,
        name: "Identification",
        required_for: BrandScope::All,
    },
    PhaseDefinition {
        id: PhaseId::PomTriage,
        name: "POM Triage",
        required_for: BrandScope::Only(&[Brand::Aesthetics]),
    },
    PhaseDefinition {
        id: PhaseId::LegalConsent,
        name: "Legal Consent",
        required_for: BrandScope::All,
    },
    PhaseDefinition {
        id: PhaseId::ClinicalRecord,
        name: "Clinical Record",
        required_for: BrandScope::All,
    },
    PhaseDefinition {
        id: PhaseId::CloseOut,
        name: "Close-out",
        required_for: BrandScope::All,
    },
];

/// The full catalog in id order.
pub fn all_phases() -> &'static [PhaseDefinition] {
    PHASES
}

pub fn phase_definition(id: PhaseId) -> Option<&'static PhaseDefinition> {
    PHASES.iter().find(|p| p.id == id)
}

pub fn is_phase_required(brand: Brand, phase: PhaseId) -> bool {
    phase_definition(phase).is_some_and(|p| p.required_for.contains(brand))
}

/// Phases this brand must complete, ascending by id.
pub fn required_phases(brand: Brand) -> Vec<PhaseId> {
    let mut phases: Vec<PhaseId> = PHASES
        .iter()
        .filter(|p| p.required_for.contains(brand))
        .map(|p| p.id)
        .collect();
    phases.sort();
    phases.dedup();
    phases
}

/// Phase after `current` in this brand's sequence. `None` when `current` is
/// last or not part of the sequence.
pub fn next_phase(brand: Brand, current: PhaseId) -> Option<PhaseId> {
    let phases = required_phases(brand);
    let idx = phases.iter().position(|p| *p == current)?;
    phases.get(idx + 1).copied()
}

/// Phase before `current` in this brand's sequence. `None` when `current` is
/// first or not part of the sequence.
pub fn previous_phase(brand: Brand, current: PhaseId) -> Option<PhaseId> {
    let phases = required_phases(brand);
    let idx = phases.iter().position(|p| *p == current)?;
    idx.checked_sub(1).and_then(|i| phases.get(i).copied())
}

pub fn first_phase(brand: Brand) -> Option<PhaseId> {
    required_phases(brand).first().copied()
}

pub fn last_phase(brand: Brand) -> Option<PhaseId> {
    required_phases(brand).last().copied()
}
