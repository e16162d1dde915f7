use serde::{Deserialize, Serialize};

use crate::journey::JourneyError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = JourneyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(JourneyError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Brand {
    Aesthetics => "medical_aesthetics",
    Barbering => "barbering",
    Grooming => "grooming",
    Group => "group",
});

impl Brand {
    /// Every brand, for exhaustive iteration.
    pub const ALL: [Brand; 4] = [
        Brand::Aesthetics,
        Brand::Barbering,
        Brand::Grooming,
        Brand::Group,
    ];
}

str_enum!(StopType {
    Hard => "hard",
    Soft => "soft",
});

/// Which brands a catalog entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandScope {
    All,
    Only(&'static [Brand]),
}

impl BrandScope {
    pub fn contains(&self, brand: Brand) -> bool {
        match self {
            Self::All => true,
            Self::Only(brands) => brands.contains(&brand),
        }
    }
}

/// The five journey phases. Discriminants are the phase ids and define the
/// default ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    Identification = 0,
    PomTriage = 1,
    LegalConsent = 2,
    ClinicalRecord = 3,
    CloseOut = 4,
}

impl PhaseId {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Identification),
            1 => Some(Self::PomTriage),
            2 => Some(Self::LegalConsent),
            3 => Some(Self::ClinicalRecord),
            4 => Some(Self::CloseOut),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Identification => "Identification",
            Self::PomTriage => "POM Triage",
            Self::LegalConsent => "Legal Consent",
            Self::ClinicalRecord => "Clinical Record",
            Self::CloseOut => "Close-out",
        }
    }
}
