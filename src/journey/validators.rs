//! One validator per phase. Each is a pure function of its input and the
//! validation context; none of them log or touch the clock.

use chrono::NaiveDate;

use crate::models::phase_data::present;
use crate::models::{
    ClinicalRecordData, CloseOutData, IdentificationData, LegalConsentData, PomTriageData,
    StopType,
};

use super::safety::{applicable_questions, is_pom_required, pom_questions};
use super::types::{PhaseValidationResult, SafetyQuestion, ValidationContext};

/// GMC registration numbers are exactly this many digits.
const GMC_NUMBER_LENGTH: usize = 7;

// ═══════════════════════════════════════════════════════════
// Phase 0: Identification
// ═══════════════════════════════════════════════════════════

pub fn validate_identification(data: &IdentificationData) -> PhaseValidationResult {
    if present(&data.client_id).is_some() {
        return PhaseValidationResult::passed();
    }

    let mut errors = Vec::new();
    if !data.is_new_client {
        errors.push("Select an existing client or register a new one".to_string());
    } else {
        if present(&data.first_name).is_none() {
            errors.push("First name is required".to_string());
        }
        if present(&data.last_name).is_none() {
            errors.push("Last name is required".to_string());
        }
    }
    PhaseValidationResult::from_findings(errors, Vec::new())
}

// ═══════════════════════════════════════════════════════════
// Phase 1: POM Triage
// ═══════════════════════════════════════════════════════════

/// Prescriber paperwork for prescription-only medicine. Failures here block
/// progress but are never hard stops: they are missing paperwork, not a
/// contraindication.
pub fn validate_pom_triage(data: &PomTriageData, ctx: &ValidationContext) -> PhaseValidationResult {
    if !is_pom_required(ctx.brand) {
        return PhaseValidationResult::passed();
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if present(&data.prescriber_id).is_none() {
        errors.push("Prescriber is required for prescription-only treatments".to_string());
    }

    match present(&data.gmc_number) {
        None => errors.push("Prescriber GMC number is required".to_string()),
        Some(gmc) if !is_valid_gmc_number(gmc) => {
            errors.push("GMC number must be exactly 7 digits".to_string())
        }
        Some(_) => {}
    }

    match present(&data.face_to_face_date) {
        None => errors.push("Face-to-face consultation date is required".to_string()),
        Some(raw) => check_consultation_date(raw, ctx, &mut errors, &mut warnings),
    }

    PhaseValidationResult::from_findings(errors, warnings)
}

fn is_valid_gmc_number(gmc: &str) -> bool {
    gmc.len() == GMC_NUMBER_LENGTH && gmc.bytes().all(|b| b.is_ascii_digit())
}

fn check_consultation_date(
    raw: &str,
    ctx: &ValidationContext,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
        errors.push(format!(
            "Face-to-face consultation date '{raw}' is not a valid date (YYYY-MM-DD)"
        ));
        return;
    };

    let days = (ctx.today - date).num_days();
    if days < 0 {
        errors.push("Face-to-face consultation date cannot be in the future".to_string());
        return;
    }

    let max = ctx.config.max_consultation_age_days;
    if days > max {
        errors.push(format!(
            "Face-to-face consultation was {days} days ago; it must be within {max} days"
        ));
    } else if days > ctx.config.consultation_review_days {
        warnings.push(format!(
            "Face-to-face consultation was {days} days ago; consider a review consultation"
        ));
    }
}

// ═══════════════════════════════════════════════════════════
// Phase 2: Legal Consent
// ═══════════════════════════════════════════════════════════

/// Screening answers and signed consent.
///
/// Every applicable question is evaluated even after a hard stop so the
/// caller gets the full picture in one pass. Signature requirements are only
/// checked when no hard stop fired.
pub fn validate_legal_consent(
    data: &LegalConsentData,
    ctx: &ValidationContext,
) -> PhaseValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut hard_stop = false;
    let mut hard_stop_reason: Option<String> = None;

    for q in screening_questions(ctx) {
        let answer = data.answers.get(q.id).map(|a| a.trim());
        let Some(answer) = answer.filter(|a| !a.is_empty()) else {
            errors.push(q.text.to_string());
            continue;
        };

        if !q.is_triggered_by(answer) {
            continue;
        }

        match q.stop_type {
            StopType::Hard => {
                hard_stop = true;
                hard_stop_reason.get_or_insert_with(|| q.stop_message.to_string());
                errors.push(q.stop_message.to_string());
            }
            StopType::Soft => warnings.push(q.stop_message.to_string()),
        }
    }

    if !hard_stop {
        if present(&data.signature).is_none() {
            errors.push("Client signature is required".to_string());
        }
        if present(&data.signer_name).is_none() {
            errors.push("Signer's printed name is required".to_string());
        }
        if !data.consent_declaration {
            errors.push("Consent declaration must be accepted".to_string());
        }
    }

    let is_valid = errors.is_empty() && !hard_stop;
    PhaseValidationResult {
        is_valid,
        errors,
        warnings,
        can_proceed: is_valid,
        hard_stop,
        hard_stop_reason,
    }
}

/// Brand questions, plus the POM questions whenever the POM flag is set even
/// if the brand alone would not include them.
fn screening_questions(ctx: &ValidationContext) -> Vec<&'static SafetyQuestion> {
    let mut questions = applicable_questions(ctx.brand);
    if ctx.is_pom {
        for q in pom_questions() {
            if !questions.iter().any(|existing| existing.id == q.id) {
                questions.push(q);
            }
        }
    }
    questions
}

// ═══════════════════════════════════════════════════════════
// Phase 3: Clinical Record
// ═══════════════════════════════════════════════════════════

pub fn validate_clinical_record(data: &ClinicalRecordData) -> PhaseValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if present(&data.treatment_type).is_none() {
        errors.push("Treatment type is required".to_string());
    }
    if !data.treatment_areas.iter().any(|a| !a.trim().is_empty()) {
        errors.push("At least one treatment area must be selected".to_string());
    }
    if present(&data.product_used).is_none() {
        errors.push("Product used is required".to_string());
    }
    if present(&data.batch_number).is_none() {
        errors.push("Batch/lot number is required for traceability".to_string());
    }
    if data.before_photos.is_empty() {
        warnings.push("No before photos recorded".to_string());
    }

    PhaseValidationResult::from_findings(errors, warnings)
}

// ═══════════════════════════════════════════════════════════
// Phase 4: Close-out
// ═══════════════════════════════════════════════════════════

pub fn validate_close_out(data: &CloseOutData) -> PhaseValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !data.aftercare_provided {
        errors.push("Confirm that aftercare advice was provided".to_string());
    }
    if data.after_photos.is_empty() {
        warnings.push("No after photos recorded".to_string());
    }
    if data.send_aftercare_email && present(&data.aftercare_template_id).is_none() {
        warnings.push(
            "No aftercare email template selected; the default template will be used".to_string(),
        );
    }

    PhaseValidationResult::from_findings(errors, warnings)
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::journey::safety::question;
    use crate::models::Brand;
    use chrono::Duration;
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn ctx(brand: Brand) -> ValidationContext {
        ValidationContext {
            brand,
            is_pom: is_pom_required(brand),
            today: today(),
            config: EngineConfig::default(),
        }
    }

    fn days_ago(days: i64) -> String {
        (today() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    fn pom(prescriber: Option<&str>, gmc: Option<&str>, date: Option<String>) -> PomTriageData {
        PomTriageData {
            prescriber_id: prescriber.map(String::from),
            gmc_number: gmc.map(String::from),
            face_to_face_date: date,
        }
    }

    fn all_no(brand: Brand) -> BTreeMap<String, String> {
        applicable_questions(brand)
            .iter()
            .map(|q| (q.id.to_string(), "No".to_string()))
            .collect()
    }

    fn signed(answers: BTreeMap<String, String>) -> LegalConsentData {
        LegalConsentData {
            answers,
            signature: Some("data:image/png;base64,iVBORw0KGgo=".into()),
            signer_name: Some("Jane Doe".into()),
            consent_declaration: true,
        }
    }

    fn is_signature_error(e: &str) -> bool {
        e.contains("signature") || e.contains("Signer") || e.contains("declaration")
    }

    // ── Phase 0 ────────────────────────────────────────────

    #[test]
    fn existing_client_is_valid() {
        let r = validate_identification(&IdentificationData {
            client_id: Some("c-17".into()),
            ..Default::default()
        });
        assert!(r.is_valid);
    }

    #[test]
    fn new_client_needs_both_names() {
        let r = validate_identification(&IdentificationData {
            is_new_client: true,
            first_name: Some("Ada".into()),
            last_name: Some("  ".into()),
            ..Default::default()
        });
        assert!(!r.is_valid);
        assert_eq!(r.errors, vec!["Last name is required".to_string()]);
        assert!(!r.hard_stop);
    }

    #[test]
    fn new_client_with_names_is_valid() {
        let r = validate_identification(&IdentificationData {
            is_new_client: true,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..Default::default()
        });
        assert!(r.is_valid);
    }

    #[test]
    fn no_client_selected_is_invalid() {
        let r = validate_identification(&IdentificationData::default());
        assert!(!r.can_proceed);
        assert_eq!(r.errors.len(), 1);
    }

    // ── Phase 1 ────────────────────────────────────────────

    #[test]
    fn complete_pom_triage_is_valid() {
        let r = validate_pom_triage(
            &pom(Some("rx-1"), Some("1234567"), Some(days_ago(10))),
            &ctx(Brand::Aesthetics),
        );
        assert!(r.is_valid, "{:?}", r.errors);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn missing_prescriber_blocks() {
        let r = validate_pom_triage(
            &pom(None, Some("1234567"), Some(days_ago(10))),
            &ctx(Brand::Aesthetics),
        );
        assert!(!r.errors.is_empty());
        assert!(!r.can_proceed);
        assert!(!r.hard_stop);
    }

    #[test]
    fn empty_submission_never_hard_stops() {
        let r = validate_pom_triage(&PomTriageData::default(), &ctx(Brand::Aesthetics));
        assert_eq!(r.errors.len(), 3);
        assert!(!r.hard_stop);
        assert!(r.hard_stop_reason.is_none());
    }

    #[test]
    fn gmc_number_format() {
        for bad in ["123456", "12345678", "12345a7", "１２３４５６７"] {
            let r = validate_pom_triage(
                &pom(Some("rx-1"), Some(bad), Some(days_ago(1))),
                &ctx(Brand::Aesthetics),
            );
            assert_eq!(r.errors, vec!["GMC number must be exactly 7 digits".to_string()], "{bad}");
        }
    }

    #[test]
    fn non_pom_brand_short_circuits() {
        for brand in [Brand::Barbering, Brand::Grooming, Brand::Group] {
            let r = validate_pom_triage(&PomTriageData::default(), &ctx(brand));
            assert_eq!(r, PhaseValidationResult::passed(), "{brand}");
        }
    }

    #[test]
    fn consultation_at_maximum_age_is_valid() {
        let r = validate_pom_triage(
            &pom(Some("rx-1"), Some("1234567"), Some(days_ago(365))),
            &ctx(Brand::Aesthetics),
        );
        assert!(r.is_valid, "{:?}", r.errors);
    }

    #[test]
    fn consultation_one_day_past_maximum_is_error() {
        let r = validate_pom_triage(
            &pom(Some("rx-1"), Some("1234567"), Some(days_ago(366))),
            &ctx(Brand::Aesthetics),
        );
        assert!(!r.is_valid);
        assert_eq!(r.errors.len(), 1);
        assert!(r.errors[0].contains("366"), "{}", r.errors[0]);
    }

    #[test]
    fn aging_consultation_warns_without_blocking() {
        let r = validate_pom_triage(
            &pom(Some("rx-1"), Some("1234567"), Some(days_ago(181))),
            &ctx(Brand::Aesthetics),
        );
        assert!(r.is_valid);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].contains("181"));
    }

    #[test]
    fn consultation_at_review_threshold_does_not_warn() {
        let r = validate_pom_triage(
            &pom(Some("rx-1"), Some("1234567"), Some(days_ago(180))),
            &ctx(Brand::Aesthetics),
        );
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn future_consultation_is_error() {
        let r = validate_pom_triage(
            &pom(Some("rx-1"), Some("1234567"), Some(days_ago(-1))),
            &ctx(Brand::Aesthetics),
        );
        assert_eq!(
            r.errors,
            vec!["Face-to-face consultation date cannot be in the future".to_string()]
        );
    }

    #[test]
    fn unparseable_consultation_date_is_error() {
        let r = validate_pom_triage(
            &pom(Some("rx-1"), Some("1234567"), Some("15/03/2026".into())),
            &ctx(Brand::Aesthetics),
        );
        assert!(!r.is_valid);
        assert!(r.errors[0].contains("not a valid date"));
    }

    #[test]
    fn configured_maximum_is_respected() {
        let mut c = ctx(Brand::Aesthetics);
        c.config = EngineConfig {
            max_consultation_age_days: 30,
            consultation_review_days: 20,
        };
        let r = validate_pom_triage(&pom(Some("rx-1"), Some("1234567"), Some(days_ago(31))), &c);
        assert!(r.errors[0].contains("31 days ago"));
        assert!(r.errors[0].contains("within 30 days"));
    }

    // ── Phase 2 ────────────────────────────────────────────

    #[test]
    fn all_no_and_signed_is_valid() {
        let r = validate_legal_consent(&signed(all_no(Brand::Aesthetics)), &ctx(Brand::Aesthetics));
        assert!(r.is_valid, "{:?}", r.errors);
        assert!(r.warnings.is_empty());
        assert!(!r.hard_stop);
    }

    #[test]
    fn hard_trigger_stops_and_skips_signature() {
        let mut answers = all_no(Brand::Aesthetics);
        answers.insert("blood_disorder".into(), "Yes".into());
        let data = LegalConsentData {
            answers,
            ..Default::default()
        };
        let r = validate_legal_consent(&data, &ctx(Brand::Aesthetics));
        let msg = question("blood_disorder").unwrap().stop_message;
        assert!(r.hard_stop);
        assert!(!r.can_proceed);
        assert!(!r.is_valid);
        assert_eq!(r.hard_stop_reason.as_deref(), Some(msg));
        assert!(r.errors.iter().any(|e| e == msg));
        assert!(!r.errors.iter().any(|e| is_signature_error(e)), "{:?}", r.errors);
    }

    #[test]
    fn hard_stop_still_reports_missing_answers() {
        let mut answers = BTreeMap::new();
        answers.insert("blood_disorder".to_string(), "Yes".to_string());
        let r = validate_legal_consent(&signed(answers), &ctx(Brand::Aesthetics));
        assert!(r.hard_stop);
        let expected_missing = applicable_questions(Brand::Aesthetics).len() - 1;
        // stop message + one error per unanswered question
        assert_eq!(r.errors.len(), expected_missing + 1);
        let infection = question("active_infection").unwrap();
        assert!(r.errors.iter().any(|e| e == infection.text));
    }

    #[test]
    fn multiple_hard_stops_keep_first_reason() {
        let mut answers = all_no(Brand::Aesthetics);
        answers.insert("pregnant_or_breastfeeding".into(), "Yes".into());
        answers.insert("active_infection".into(), "Yes".into());
        let r = validate_legal_consent(&signed(answers), &ctx(Brand::Aesthetics));
        assert_eq!(
            r.hard_stop_reason.as_deref(),
            Some(question("pregnant_or_breastfeeding").unwrap().stop_message)
        );
        assert_eq!(r.errors.len(), 2);
    }

    #[test]
    fn soft_trigger_warns_only() {
        let mut answers = all_no(Brand::Aesthetics);
        answers.insert("anticoagulants".into(), "Yes".into());
        let r = validate_legal_consent(&signed(answers), &ctx(Brand::Aesthetics));
        assert!(r.is_valid);
        assert!(r.can_proceed);
        assert!(!r.hard_stop);
        assert_eq!(r.warnings, vec![question("anticoagulants").unwrap().stop_message.to_string()]);
    }

    #[test]
    fn missing_answer_is_the_question_text() {
        let mut answers = all_no(Brand::Barbering);
        answers.remove("skin_condition");
        let r = validate_legal_consent(&signed(answers), &ctx(Brand::Barbering));
        assert_eq!(r.errors, vec![question("skin_condition").unwrap().text.to_string()]);
    }

    #[test]
    fn each_missing_signature_item_is_its_own_error() {
        let data = LegalConsentData {
            answers: all_no(Brand::Grooming),
            ..Default::default()
        };
        let r = validate_legal_consent(&data, &ctx(Brand::Grooming));
        assert_eq!(r.errors.len(), 3);
        assert!(r.errors.iter().all(|e| is_signature_error(e)));
    }

    #[test]
    fn trigger_match_is_exact() {
        let mut answers = all_no(Brand::Aesthetics);
        answers.insert("blood_disorder".into(), "yes".into());
        let r = validate_legal_consent(&signed(answers), &ctx(Brand::Aesthetics));
        assert!(!r.hard_stop);
        assert!(r.is_valid);
    }

    #[test]
    fn pom_flag_adds_pom_questions_for_other_brand() {
        let mut c = ctx(Brand::Group);
        c.is_pom = true;
        let r = validate_legal_consent(&signed(all_no(Brand::Group)), &c);
        assert!(!r.is_valid);
        assert_eq!(r.errors.len(), pom_questions().len());
    }

    #[test]
    fn pom_flag_off_does_not_drop_brand_questions() {
        let mut c = ctx(Brand::Aesthetics);
        c.is_pom = false;
        let r = validate_legal_consent(&signed(BTreeMap::new()), &c);
        assert_eq!(r.errors.len(), applicable_questions(Brand::Aesthetics).len());
    }

    // ── Phase 3 ────────────────────────────────────────────

    fn clinical() -> ClinicalRecordData {
        ClinicalRecordData {
            treatment_type: Some("Botulinum toxin".into()),
            treatment_areas: vec!["Forehead".into()],
            product_used: Some("Azzalure".into()),
            batch_number: Some("LOT-2291".into()),
            before_photos: vec!["photos/before-1.jpg".into()],
        }
    }

    #[test]
    fn complete_clinical_record_is_valid() {
        let r = validate_clinical_record(&clinical());
        assert!(r.is_valid);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn missing_batch_is_single_traceability_error() {
        let mut data = clinical();
        data.batch_number = None;
        let r = validate_clinical_record(&data);
        assert_eq!(r.errors.len(), 1);
        assert!(r.errors[0].contains("traceability"));
    }

    #[test]
    fn missing_before_photos_is_warning() {
        let mut data = clinical();
        data.before_photos.clear();
        let r = validate_clinical_record(&data);
        assert!(r.is_valid);
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn blank_treatment_areas_do_not_count() {
        let mut data = clinical();
        data.treatment_areas = vec![" ".into()];
        let r = validate_clinical_record(&data);
        assert!(!r.is_valid);
    }

    // ── Phase 4 ────────────────────────────────────────────

    #[test]
    fn aftercare_not_provided_is_error() {
        let r = validate_close_out(&CloseOutData {
            after_photos: vec!["after.jpg".into()],
            ..Default::default()
        });
        assert!(!r.is_valid);
        assert_eq!(r.errors.len(), 1);
    }

    #[test]
    fn email_without_template_warns() {
        let r = validate_close_out(&CloseOutData {
            aftercare_provided: true,
            after_photos: vec!["after.jpg".into()],
            send_aftercare_email: true,
            aftercare_template_id: None,
        });
        assert!(r.is_valid);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].contains("template"));
    }

    #[test]
    fn close_out_missing_photos_warns() {
        let r = validate_close_out(&CloseOutData {
            aftercare_provided: true,
            ..Default::default()
        });
        assert!(r.is_valid);
        assert_eq!(r.warnings, vec!["No after photos recorded".to_string()]);
    }

    // ── Purity ─────────────────────────────────────────────

    #[test]
    fn validators_are_idempotent() {
        let c = ctx(Brand::Aesthetics);
        let mut answers = all_no(Brand::Aesthetics);
        answers.insert("blood_disorder".into(), "Yes".into());
        let consent = signed(answers);
        assert_eq!(validate_legal_consent(&consent, &c), validate_legal_consent(&consent, &c));

        let triage = pom(None, Some("12"), Some(days_ago(400)));
        assert_eq!(validate_pom_triage(&triage, &c), validate_pom_triage(&triage, &c));

        let record = ClinicalRecordData::default();
        assert_eq!(validate_clinical_record(&record), validate_clinical_record(&record));
    }
}
