use serde::{Deserialize, Serialize};

use crate::journey::JourneyError;

/// Application-level constants
pub const APP_NAME: &str = "treatment-journey";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// "name vX.Y.Z", for startup logs.
pub fn app_banner() -> String {
    format!("{APP_NAME} v{APP_VERSION}")
}

/// Maximum days between the face-to-face consultation and a POM treatment.
pub const DEFAULT_MAX_CONSULTATION_AGE_DAYS: i64 = 365;

/// Past this age a consultation still passes but a review is suggested.
pub const DEFAULT_CONSULTATION_REVIEW_DAYS: i64 = 180;

const ENV_MAX_CONSULTATION_DAYS: &str = "JOURNEY_MAX_CONSULTATION_DAYS";
const ENV_CONSULTATION_REVIEW_DAYS: &str = "JOURNEY_CONSULTATION_REVIEW_DAYS";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,treatment_journey=debug"
}

/// POM gate thresholds. Loaded once at startup, read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_consultation_age_days: i64,
    pub consultation_review_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_consultation_age_days: DEFAULT_MAX_CONSULTATION_AGE_DAYS,
            consultation_review_days: DEFAULT_CONSULTATION_REVIEW_DAYS,
        }
    }
}

impl EngineConfig {
    /// Read overrides from the environment. Unparseable values fall back to
    /// the defaults; an inconsistent pair is rejected.
    pub fn from_env() -> Result<Self, JourneyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, JourneyError> {
        let defaults = Self::default();
        let config = Self {
            max_consultation_age_days: read_days(
                &lookup,
                ENV_MAX_CONSULTATION_DAYS,
                defaults.max_consultation_age_days,
            ),
            consultation_review_days: read_days(
                &lookup,
                ENV_CONSULTATION_REVIEW_DAYS,
                defaults.consultation_review_days,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), JourneyError> {
        if self.max_consultation_age_days <= 0 || self.consultation_review_days <= 0 {
            return Err(JourneyError::Config(
                "consultation thresholds must be positive".into(),
            ));
        }
        if self.consultation_review_days >= self.max_consultation_age_days {
            return Err(JourneyError::Config(format!(
                "review threshold ({}) must be below the maximum consultation age ({})",
                self.consultation_review_days, self.max_consultation_age_days
            )));
        }
        Ok(())
    }
}

fn read_days(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: i64) -> i64 {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(days) => days,
            Err(_) => {
                tracing::warn!(key, default, "Ignoring unparseable day threshold");
                default
            }
        },
    }
}
